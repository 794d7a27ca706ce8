//! # 工具函数模块
//!
//! 提供美化输出、进度条和数值格式化工具。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `parsers/` 模块使用
//! - 子模块: format, output, progress

pub mod format;
pub mod output;
pub mod progress;
