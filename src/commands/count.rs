//! # count 命令实现
//!
//! 读取 extxyz 轨迹并统计帧数，可选逐帧列出原子数、化学式和能量。
//!
//! ## 依赖关系
//! - 使用 `cli/count.rs` 定义的参数
//! - 使用 `parsers/extxyz.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::count::CountArgs;
use crate::error::{ConverterError, Result};
use crate::models::Frame;
use crate::parsers::extxyz;
use crate::utils::format::format_float;
use crate::utils::{output, progress};

use tabled::{Table, Tabled};

/// 逐帧表格中的一行
#[derive(Debug, Clone, Tabled)]
struct FrameRow {
    #[tabled(rename = "Frame")]
    index: usize,
    #[tabled(rename = "Atoms")]
    atoms: usize,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Energy")]
    energy: String,
    #[tabled(rename = "Volume (Å³)")]
    volume: String,
}

/// 执行 count 命令
pub fn execute(args: CountArgs) -> Result<()> {
    if !args.file.is_file() {
        return Err(ConverterError::FileNotFound {
            path: args.file.display().to_string(),
        });
    }

    let spinner = progress::create_spinner(&format!("Reading {}", args.file.display()));
    let frames = extxyz::read_extxyz_file(&args.file);
    spinner.finish_and_clear();
    let frames = frames?;

    if args.verbose && !frames.is_empty() {
        println!("{}", Table::new(frame_rows(&frames)));
    }

    output::print_info(&format!(
        "The total number of frames: {} ({} atoms in total)",
        frames.len(),
        frames.iter().map(Frame::atom_count).sum::<usize>()
    ));

    let missing_energy = frames.iter().filter(|f| f.energy.is_none()).count();
    if missing_energy > 0 {
        output::print_warning(&format!(
            "{} frame(s) have no energy (written as energy=None)",
            missing_energy
        ));
    }

    Ok(())
}

fn frame_rows(frames: &[Frame]) -> Vec<FrameRow> {
    frames
        .iter()
        .enumerate()
        .map(|(i, f)| FrameRow {
            index: i + 1,
            atoms: f.atom_count(),
            formula: f.formula(),
            energy: f
                .energy
                .map(format_float)
                .unwrap_or_else(|| extxyz::MISSING_VALUE.to_string()),
            volume: format!("{:.3}", f.lattice.volume().abs()),
        })
        .collect()
}
