//! # collect 命令实现
//!
//! 将 CP2K 单点计算文件夹合并为一个 extxyz 轨迹文件。
//!
//! ## 功能
//! - 校验参数（晶胞、范围、单位换算）
//! - 选择计算文件夹
//! - 顺序处理并追加写出每一帧
//! - 汇总表格、可选 CSV 报告、重新读取输出文件统计帧数
//!
//! ## 依赖关系
//! - 使用 `cli/collect.rs` 定义的参数
//! - 使用 `batch/`, `parsers/extxyz.rs`, `models/`
//! - 使用 `utils/output.rs`

use crate::batch::report;
use crate::batch::{
    BatchResult, BatchRunner, ConversionSettings, FolderOrder, FolderRange, FolderSelector,
};
use crate::cli::collect::CollectArgs;
use crate::error::Result;
use crate::models::units::known_keys;
use crate::models::{Lattice, Quantity, UnitConversion};
use crate::parsers::extxyz;
use crate::utils::format::format_float;
use crate::utils::output;

use std::path::PathBuf;

/// 校验后的运行配置
pub struct CollectConfig {
    pub selector: FolderSelector,
    pub settings: ConversionSettings,
    pub output: PathBuf,
    pub report: Option<PathBuf>,
    pub count_frames: bool,
    /// 不影响运行的参数问题（未知换算键名等）
    pub notes: Vec<String>,
}

impl CollectConfig {
    /// 从命令行参数构建配置，任何处理开始前完成校验
    pub fn from_args(args: &CollectArgs) -> Result<Self> {
        let mut notes = Vec::new();

        let lattice = Lattice::parse_lengths(&args.lattice)?;

        let range = match (args.from, args.to) {
            (Some(start), Some(end)) => {
                let range = FolderRange::new(start, end, args.step)?;
                if start > end {
                    notes.push(format!(
                        "--from {} is greater than --to {}, no folder will be selected",
                        start, end
                    ));
                }
                Some(range)
            }
            _ => {
                if args.step != 1 {
                    notes.push("--step is ignored without --from/--to".to_string());
                }
                None
            }
        };

        let order = if args.listing_order {
            FolderOrder::Listing
        } else {
            FolderOrder::Numeric
        };

        let energy_conversion =
            resolve_conversion(args.convert_energy.as_deref(), Quantity::Energy, &mut notes);
        let force_conversion =
            resolve_conversion(args.convert_forces.as_deref(), Quantity::Force, &mut notes);

        let settings = ConversionSettings {
            coordinates_name: args.coordinates.clone(),
            log_name: args.log.clone(),
            lattice,
            energy_conversion,
            force_conversion,
        };

        Ok(CollectConfig {
            selector: FolderSelector::new(&args.path)
                .with_range(range)
                .with_order(order),
            settings,
            output: args.path.join(&args.output),
            report: args.report.clone(),
            count_frames: !args.no_count,
            notes,
        })
    }
}

/// 按键名查找换算；未知键名记一条提示并视为不换算
fn resolve_conversion(
    key: Option<&str>,
    quantity: Quantity,
    notes: &mut Vec<String>,
) -> Option<UnitConversion> {
    let key = key?;
    let conversion = UnitConversion::lookup(key, quantity);
    if conversion.is_none() {
        notes.push(format!(
            "Unknown {} conversion '{}' (supported: {}), values are left unconverted",
            quantity,
            key,
            known_keys(quantity).join(", ")
        ));
    }
    conversion
}

/// 执行 collect 命令
pub fn execute(args: CollectArgs) -> Result<()> {
    output::print_header("Collecting CP2K Frames into Extended XYZ");

    let config = CollectConfig::from_args(&args)?;
    for note in &config.notes {
        output::print_warning(note);
    }
    print_settings(&config);

    let folders = config.selector.select()?;
    if folders.is_empty() {
        output::print_warning(&format!(
            "No calculation folders selected under {}",
            config.selector.base().display()
        ));
    } else {
        output::print_info(&format!("Selected {} folder(s)", folders.len()));
    }

    let runner = BatchRunner::new(config.settings.clone(), config.output.clone());
    let result = runner.run(config.selector.base(), &folders)?;

    print_summary(&result);

    if let Some(ref report_path) = config.report {
        report::to_csv(&result, report_path)?;
        output::print_success(&format!(
            "Per-folder report saved to '{}'",
            report_path.display()
        ));
    }

    if config.count_frames {
        let n_frames = extxyz::count_frames(runner.output())?;
        output::print_info(&format!("The total number of frames: {}", n_frames));
        if n_frames != result.frames() {
            output::print_warning(&format!(
                "Expected {} frame(s) from this run but read back {}",
                result.frames(),
                n_frames
            ));
        }
    }

    output::print_done(&format!(
        "All data appended to the combined file: {}",
        runner.output().display()
    ));

    Ok(())
}

fn print_settings(config: &CollectConfig) {
    let s = &config.settings;
    let m = s.lattice.matrix;

    output::print_setting("Coordinates file", &s.coordinates_name);
    output::print_setting("Log file", &s.log_name);
    output::print_setting(
        "Lattice (Å)",
        &format!(
            "{} {} {}",
            format_float(m[0][0]),
            format_float(m[1][1]),
            format_float(m[2][2])
        ),
    );
    output::print_setting(
        "Energy conversion",
        &s.energy_conversion
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string()),
    );
    output::print_setting(
        "Force conversion",
        &s.force_conversion
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string()),
    );
    output::print_setting("Output", &config.output.display().to_string());
    output::print_separator();
}

fn print_summary(result: &BatchResult) {
    output::print_info(&format!(
        "Processed {} folder(s): {} written, {} with warnings, {} skipped, {} failed",
        result.total(),
        result.written,
        result.partial,
        result.skipped,
        result.failed
    ));

    if let Some(table) = report::problems_table(result) {
        output::print_header("Folders Not Fully Written");
        println!("{}", table);
    }
}
