//! # count 子命令 CLI 定义
//!
//! 统计 extxyz 轨迹文件中的帧数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/count.rs`

use clap::Args;
use std::path::PathBuf;

/// count 子命令参数
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Extended XYZ file to read
    pub file: PathBuf,

    /// Print a per-frame table (atoms, formula, energy)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
