//! # 处理结果报告
//!
//! 运行结束后以表格形式显示未完整写出的文件夹，并可导出全部记录为 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/collect.rs` 调用
//! - 使用 `batch/runner.rs` 的 BatchResult
//! - 使用 `tabled` 渲染表格，`csv` + `serde` 写入 CSV 文件

use crate::batch::runner::{BatchResult, FolderReport};
use crate::error::{ConverterError, Result};

use std::path::Path;
use tabled::{Table, Tabled};

/// 汇总表中的一行
#[derive(Debug, Clone, Tabled)]
struct ProblemRow {
    #[tabled(rename = "Folder")]
    folder: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&FolderReport> for ProblemRow {
    fn from(report: &FolderReport) -> Self {
        ProblemRow {
            folder: report.folder.clone(),
            status: report.status.clone(),
            detail: report.detail.clone(),
        }
    }
}

/// 渲染问题文件夹表格；全部成功时返回 `None`
pub fn problems_table(result: &BatchResult) -> Option<String> {
    let rows: Vec<ProblemRow> = result.problems().map(ProblemRow::from).collect();
    if rows.is_empty() {
        return None;
    }
    Some(Table::new(&rows).to_string())
}

/// 导出全部记录为 CSV
pub fn to_csv(result: &BatchResult, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(ConverterError::CsvError)?;

    for report in &result.reports {
        wtr.serialize(report).map_err(ConverterError::CsvError)?;
    }

    wtr.flush().map_err(|e| ConverterError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
