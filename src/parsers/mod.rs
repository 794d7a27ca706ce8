//! # 解析器模块
//!
//! 提供 CP2K 输出日志、XYZ 坐标文件和 extxyz 轨迹的读写。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: cp2k_log, xyz, extxyz

pub mod cp2k_log;
pub mod extxyz;
pub mod xyz;
