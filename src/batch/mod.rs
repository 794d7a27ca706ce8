//! # 批量处理模块
//!
//! 选择计算文件夹、逐个转换并汇总结果。
//!
//! ## 功能
//! - 按数字范围和步长选择子目录
//! - 顺序处理，每个文件夹得到明确结果
//! - 汇总表格与 CSV 报告
//!
//! ## 依赖关系
//! - 被 `commands/collect.rs` 使用
//! - 使用 `walkdir` 列出目录
//! - 使用 `indicatif` 显示进度

pub mod report;
pub mod runner;
pub mod selector;

pub use runner::{BatchResult, BatchRunner, ConversionSettings};
pub use selector::{FolderOrder, FolderRange, FolderSelector};
