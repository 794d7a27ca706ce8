//! # collect 子命令 CLI 定义
//!
//! 将每个计算文件夹中的坐标文件与 CP2K 日志合并为一个 extxyz 轨迹。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/collect.rs`

use clap::Args;
use std::path::PathBuf;

/// 默认输出文件名
pub const DEFAULT_OUTPUT: &str = "combined_coordinates_forces.xyz";

/// collect 子命令参数
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Base directory containing one subdirectory per calculation
    pub path: PathBuf,

    /// Name of the coordinates file in each subdirectory (e.g. coordinates.xyz)
    #[arg(short, long)]
    pub coordinates: String,

    /// Name of the CP2K output log in each subdirectory (e.g. output)
    #[arg(short, long, alias = "sp-output")]
    pub log: String,

    /// Orthorhombic cell lengths "a b c" in Å
    #[arg(long, default_value = "15.0 15.0 15.0")]
    pub lattice: String,

    /// First folder number of the range (requires --to)
    #[arg(long, requires = "to")]
    pub from: Option<u64>,

    /// Last folder number of the range, inclusive (requires --from)
    #[arg(long, requires = "from")]
    pub to: Option<u64>,

    /// Take every n-th folder of the range
    #[arg(long, default_value_t = 1)]
    pub step: usize,

    /// Keep filesystem listing order instead of sorting folders numerically
    #[arg(long, default_value_t = false)]
    pub listing_order: bool,

    /// Energy unit conversion (supported: au2eV)
    #[arg(long)]
    pub convert_energy: Option<String>,

    /// Force unit conversion (supported: au2eVA)
    #[arg(long)]
    pub convert_forces: Option<String>,

    /// Output file name, created inside PATH
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Write a per-folder CSV report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip re-reading the output file to count frames
    #[arg(long, default_value_t = false)]
    pub no_count: bool,
}
