//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `collect`: 将 CP2K 计算文件夹合并为 extxyz 轨迹
//! - `count`: 统计 extxyz 文件中的帧数
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: collect, count

pub mod collect;
pub mod count;

use clap::{Parser, Subcommand};

/// cp2k-extxyz - CP2K 结果到 extxyz 轨迹的批量转换
#[derive(Parser)]
#[command(name = "cp2k-extxyz")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Collect CP2K single-point energies and forces into an extended XYZ trajectory",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Merge CP2K calculation folders into one extended XYZ file
    Collect(collect::CollectArgs),

    /// Count the frames of an extended XYZ file
    Count(count::CountArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_collect_minimal() {
        let cli = Cli::try_parse_from([
            "cp2k-extxyz",
            "collect",
            "/data/sims",
            "--coordinates",
            "coordinates.xyz",
            "--log",
            "output",
        ])
        .unwrap();

        match cli.command {
            Commands::Collect(args) => {
                assert_eq!(args.coordinates, "coordinates.xyz");
                assert_eq!(args.log, "output");
                assert_eq!(args.lattice, "15.0 15.0 15.0");
                assert_eq!(args.step, 1);
                assert!(args.from.is_none());
            }
            _ => panic!("expected collect"),
        }
    }

    #[test]
    fn test_parse_collect_full() {
        let cli = Cli::try_parse_from([
            "cp2k-extxyz",
            "collect",
            "/data/sims",
            "--coordinates",
            "coordinates.xyz",
            "--sp-output",
            "output",
            "--lattice",
            "12.0 13.0 14.0",
            "--from",
            "1",
            "--to",
            "100",
            "--step",
            "5",
            "--convert-energy",
            "au2eV",
            "--convert-forces",
            "au2eVA",
            "--listing-order",
        ])
        .unwrap();

        match cli.command {
            Commands::Collect(args) => {
                assert_eq!(args.log, "output");
                assert_eq!(args.from, Some(1));
                assert_eq!(args.to, Some(100));
                assert_eq!(args.step, 5);
                assert_eq!(args.convert_energy.as_deref(), Some("au2eV"));
                assert_eq!(args.convert_forces.as_deref(), Some("au2eVA"));
                assert!(args.listing_order);
            }
            _ => panic!("expected collect"),
        }
    }

    #[test]
    fn test_missing_required_options() {
        let result = Cli::try_parse_from(["cp2k-extxyz", "collect", "/data/sims"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_requires_to() {
        let result = Cli::try_parse_from([
            "cp2k-extxyz",
            "collect",
            "/data/sims",
            "--coordinates",
            "coordinates.xyz",
            "--log",
            "output",
            "--from",
            "1",
        ]);
        assert!(result.is_err());
    }
}
