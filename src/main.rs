//! # cp2k-extxyz - CP2K 结果到 extxyz 轨迹的批量转换
//!
//! 遍历基础目录下的计算文件夹，从每个文件夹的坐标文件和 CP2K 输出日志中
//! 提取原子坐标、总能量和原子受力，合并为一个多帧 extxyz 文件，
//! 供 ASE、OVITO 或机器学习势训练使用。
//!
//! ## 子命令
//! - `collect` - 合并计算文件夹为 extxyz 轨迹
//! - `count`   - 统计 extxyz 文件中的帧数
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (文件夹选择、顺序处理、结果汇总)
//!   │     ├── parsers/   (CP2K 日志、XYZ、extxyz)
//!   │     └── models/    (帧与单位换算)
//!   ├── utils/      (输出、进度条、数值格式化)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
