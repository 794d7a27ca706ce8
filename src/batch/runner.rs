//! # 批量执行器
//!
//! 依次处理每个计算文件夹：读取日志与坐标、配对、换算单位、追加写出一帧。
//!
//! ## 功能
//! - 单线程顺序处理，输出顺序与文件夹顺序一致
//! - 每个文件夹得到明确的处理结果（写出 / 部分写出 / 跳过 / 失败）
//! - 单个文件夹出错不会中断整个批次
//! - 进度条显示与结果汇总
//!
//! ## 依赖关系
//! - 被 `commands/collect.rs` 调用
//! - 使用 `parsers/cp2k_log.rs`, `parsers/xyz.rs`, `parsers/extxyz.rs`
//! - 使用 `utils/progress.rs` 创建进度条

use crate::error::{ConverterError, Result};
use crate::models::units::convert;
use crate::models::{AtomRecord, Frame, Lattice, UnitConversion};
use crate::parsers::{cp2k_log, extxyz, xyz};
use crate::utils::{output, progress};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// 单个文件夹处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum FolderOutcome {
    /// 完整写出一帧
    Written(usize),
    /// 写出一帧，但带有警告（原子数, 警告列表）
    Partial(usize, Vec<String>),
    /// 输入文件缺失或不可读，未写出
    Skipped(String),
    /// 数据不完整或不一致，未写出
    Failed(String),
}

impl FolderOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            FolderOutcome::Written(_) => "written",
            FolderOutcome::Partial(_, _) => "partial",
            FolderOutcome::Skipped(_) => "skipped",
            FolderOutcome::Failed(_) => "failed",
        }
    }

    fn atoms(&self) -> Option<usize> {
        match self {
            FolderOutcome::Written(n) | FolderOutcome::Partial(n, _) => Some(*n),
            _ => None,
        }
    }

    fn detail(&self) -> String {
        match self {
            FolderOutcome::Written(_) => String::new(),
            FolderOutcome::Partial(_, warnings) => warnings.join("; "),
            FolderOutcome::Skipped(reason) | FolderOutcome::Failed(reason) => reason.clone(),
        }
    }
}

/// 汇总表与 CSV 报告中的一行
#[derive(Debug, Clone, Serialize)]
pub struct FolderReport {
    pub folder: String,
    pub status: String,
    pub atoms: Option<usize>,
    pub detail: String,
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    pub written: usize,
    pub partial: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 按处理顺序排列的逐文件夹记录
    pub reports: Vec<FolderReport>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, folder: &str, outcome: &FolderOutcome) {
        match outcome {
            FolderOutcome::Written(_) => self.written += 1,
            FolderOutcome::Partial(_, _) => self.partial += 1,
            FolderOutcome::Skipped(_) => self.skipped += 1,
            FolderOutcome::Failed(_) => self.failed += 1,
        }

        self.reports.push(FolderReport {
            folder: folder.to_string(),
            status: outcome.status().to_string(),
            atoms: outcome.atoms(),
            detail: outcome.detail(),
        });
    }

    /// 写出的帧数
    pub fn frames(&self) -> usize {
        self.written + self.partial
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.written + self.partial + self.skipped + self.failed
    }

    /// 非完整写出的记录
    pub fn problems(&self) -> impl Iterator<Item = &FolderReport> {
        self.reports.iter().filter(|r| r.status != "written")
    }
}

/// 每帧共用的转换设置
#[derive(Debug, Clone)]
pub struct ConversionSettings {
    /// 每个文件夹中的坐标文件名
    pub coordinates_name: String,
    /// 每个文件夹中的 CP2K 日志文件名
    pub log_name: String,
    pub lattice: Lattice,
    pub energy_conversion: Option<UnitConversion>,
    pub force_conversion: Option<UnitConversion>,
}

/// 批量执行器
pub struct BatchRunner {
    settings: ConversionSettings,
    output: PathBuf,
}

impl BatchRunner {
    pub fn new(settings: ConversionSettings, output: PathBuf) -> Self {
        Self { settings, output }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// 清空输出文件，然后顺序处理所有文件夹
    ///
    /// 只有输出文件写入失败会返回错误，单个文件夹的问题记录在结果中。
    pub fn run(&self, base: &Path, folders: &[String]) -> Result<BatchResult> {
        extxyz::truncate_output(&self.output)?;

        let pb = progress::create_progress_bar(folders.len() as u64, "Collecting frames");
        let mut batch_result = BatchResult::default();

        for folder in folders {
            let outcome = self.process_folder(&base.join(folder))?;

            match &outcome {
                FolderOutcome::Written(_) => {}
                FolderOutcome::Partial(_, warnings) => pb.suspend(|| {
                    for w in warnings {
                        output::print_warning(&format!("{}: {}", folder, w));
                    }
                }),
                FolderOutcome::Skipped(reason) => {
                    pb.suspend(|| output::print_skip(&format!("{}: {}", folder, reason)))
                }
                FolderOutcome::Failed(reason) => {
                    pb.suspend(|| output::print_error(&format!("{}: {}", folder, reason)))
                }
            }

            batch_result.merge(folder, &outcome);
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(batch_result)
    }

    /// 处理单个文件夹，成功时追加一帧到输出文件
    pub fn process_folder(&self, dir: &Path) -> Result<FolderOutcome> {
        match assemble_frame(dir, &self.settings) {
            Ok((frame, warnings)) => {
                extxyz::append_frame(&self.output, &frame)?;
                let n = frame.atom_count();
                if warnings.is_empty() {
                    Ok(FolderOutcome::Written(n))
                } else {
                    Ok(FolderOutcome::Partial(n, warnings))
                }
            }
            Err(outcome) => Ok(outcome),
        }
    }
}

/// 读取并配对一个文件夹中的数据
///
/// 返回帧和警告；无法组成一帧时返回 `Skipped`/`Failed`。
pub fn assemble_frame(
    dir: &Path,
    settings: &ConversionSettings,
) -> std::result::Result<(Frame, Vec<String>), FolderOutcome> {
    let coord_path = dir.join(&settings.coordinates_name);
    let log_path = dir.join(&settings.log_name);

    if !coord_path.is_file() {
        return Err(FolderOutcome::Skipped(format!(
            "missing coordinates file '{}'",
            settings.coordinates_name
        )));
    }
    if !log_path.is_file() {
        return Err(FolderOutcome::Skipped(format!(
            "missing log file '{}'",
            settings.log_name
        )));
    }

    let log = cp2k_log::parse_cp2k_log(&log_path).map_err(into_outcome)?;

    let n_atoms = log.atom_count.ok_or_else(|| {
        FolderOutcome::Failed(format!(
            "atom count marker '{}' not found in log",
            cp2k_log::ATOMS_MARKER
        ))
    })?;

    let forces = log.forces.ok_or_else(|| {
        FolderOutcome::Failed(format!(
            "force table header '{}' not found in log",
            cp2k_log::FORCES_MARKER
        ))
    })?;

    let coords = xyz::read_coordinates(&coord_path, n_atoms).map_err(into_outcome)?;

    if coords.records.len() != n_atoms || forces.len() != n_atoms {
        return Err(FolderOutcome::Failed(format!(
            "atom count mismatch: log declares {}, coordinates provide {}, force table provides {}",
            n_atoms,
            coords.records.len(),
            forces.len()
        )));
    }

    let mut warnings = Vec::new();

    if log.energy.is_none() {
        warnings.push("total energy not found in log, written as None".to_string());
    }

    if let Some(declared) = coords.declared_count {
        if declared != n_atoms {
            warnings.push(format!(
                "coordinates header declares {} atoms, log declares {}",
                declared, n_atoms
            ));
        }
    }

    let mismatched: Vec<usize> = coords
        .records
        .iter()
        .zip(&forces)
        .enumerate()
        .filter(|(_, (c, f))| f.element.as_ref().is_some_and(|el| *el != c.species))
        .map(|(i, _)| i + 1)
        .collect();
    if !mismatched.is_empty() {
        warnings.push(format!(
            "element labels differ between coordinates and force table at atom(s) {:?}",
            mismatched
        ));
    }

    let atoms = coords
        .records
        .into_iter()
        .zip(forces)
        .map(|(c, f)| {
            let force = match settings.force_conversion {
                Some(conv) => conv.apply_vec3(f.force),
                None => f.force,
            };
            AtomRecord::new(c.species, c.position, force).with_position_text(c.position_text)
        })
        .collect();

    let energy = log
        .energy
        .map(|e| convert(settings.energy_conversion, e));

    Ok((Frame::new(settings.lattice.clone(), energy, atoms), warnings))
}

/// 读取失败视为跳过，解析失败视为失败
fn into_outcome(err: ConverterError) -> FolderOutcome {
    match err {
        ConverterError::FileReadError { path, source } => {
            FolderOutcome::Skipped(format!("cannot read {}: {}", path, source))
        }
        ConverterError::ParseError { reason, .. } => FolderOutcome::Failed(reason),
        other => FolderOutcome::Failed(other.to_string()),
    }
}
