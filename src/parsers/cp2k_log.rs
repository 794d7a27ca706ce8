//! # CP2K 输出日志解析器
//!
//! 从 CP2K 单点计算的输出日志中提取原子数、总能量和原子受力表。
//!
//! ## 日志片段
//! ```text
//!  - Atoms:                                                                   3
//!  ENERGY| Total FORCE_EVAL ( QS ) energy [a.u.]:              -17.167380925296
//!  ATOMIC FORCES in [a.u.]
//!
//!  # Atom   Kind   Element          X              Y              Z
//!       1      1      O          -0.00078125     0.00000000    -0.01146542
//!       2      2      H           0.00043115     0.00000000     0.00573271
//! ```
//!
//! 三个锚点各自独立查找，均取第一次出现。缺失的锚点不会报错，对应字段保持
//! `None`，由调用方决定如何处理。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 无外部模块依赖

use crate::error::{ConverterError, Result};
use std::fs;
use std::path::Path;

/// 原子数锚点
pub const ATOMS_MARKER: &str = "- Atoms:";

/// 总能量锚点（旧版与新版 CP2K 的写法）
pub const ENERGY_MARKERS: [&str; 2] = [
    "ENERGY| Total FORCE_EVAL ( QS ) energy [a.u.]:",
    "ENERGY| Total FORCE_EVAL ( QS ) energy [hartree]:",
];

/// 受力表表头锚点
pub const FORCES_MARKER: &str = "# Atom   Kind   Element";

/// 受力表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct ForceRow {
    /// `Element` 列；行格式不标准时为 `None`
    pub element: Option<String>,
    pub force: [f64; 3],
}

/// 日志中提取的数据（原子单位，未换算）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogData {
    pub atom_count: Option<usize>,
    pub energy: Option<f64>,
    /// 表头缺失时为 `None`；表体行数可能少于原子数
    pub forces: Option<Vec<ForceRow>>,
}

/// 解析 CP2K 日志文件
pub fn parse_cp2k_log(path: &Path) -> Result<LogData> {
    let content = fs::read_to_string(path).map_err(|e| ConverterError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_cp2k_log_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 CP2K 日志
pub fn parse_cp2k_log_content(content: &str, source_name: &str) -> Result<LogData> {
    let lines: Vec<&str> = content.lines().collect();
    let parse_err = |reason: String| ConverterError::ParseError {
        format: "cp2k log".to_string(),
        path: source_name.to_string(),
        reason,
    };

    let mut data = LogData::default();

    if let Some((idx, line)) = find_anchor(&lines, &[ATOMS_MARKER]) {
        let count = last_token(line)
            .and_then(|t| t.parse::<usize>().ok())
            .ok_or_else(|| parse_err(format!("Invalid atom count at line {}", idx + 1)))?;
        data.atom_count = Some(count);
    }

    if let Some((idx, line)) = find_anchor(&lines, &ENERGY_MARKERS) {
        let energy = last_token(line)
            .and_then(|t| t.parse::<f64>().ok())
            .ok_or_else(|| parse_err(format!("Invalid total energy at line {}", idx + 1)))?;
        data.energy = Some(energy);
    }

    if let Some((idx, _)) = find_anchor(&lines, &[FORCES_MARKER]) {
        let n = data.atom_count.unwrap_or(0);
        let mut forces = Vec::with_capacity(n);

        for (offset, row) in lines.iter().skip(idx + 1).take(n).enumerate() {
            let force = parse_force_row(row).ok_or_else(|| {
                parse_err(format!("Invalid force row at line {}", idx + offset + 2))
            })?;
            forces.push(force);
        }

        data.forces = Some(forces);
    }

    Ok(data)
}

/// 查找第一行包含任一锚点的行
fn find_anchor<'a>(lines: &[&'a str], markers: &[&str]) -> Option<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .find(|(_, line)| markers.iter().any(|m| line.contains(m)))
        .map(|(i, line)| (i, *line))
}

fn last_token(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}

/// 取行末三个字段作为受力分量
///
/// 标准行为 `Atom Kind Element X Y Z` 六列，此时同时记录元素符号。
fn parse_force_row(row: &str) -> Option<ForceRow> {
    let tokens: Vec<&str> = row.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let tail = &tokens[tokens.len() - 3..];
    let fx = tail[0].parse().ok()?;
    let fy = tail[1].parse().ok()?;
    let fz = tail[2].parse().ok()?;

    let element = if tokens.len() == 6 {
        Some(tokens[2].to_string())
    } else {
        None
    };

    Some(ForceRow {
        element,
        force: [fx, fy, fz],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_LOG: &str = r#"
 TOTAL NUMBERS AND MAXIMUM NUMBERS

  Total number of            - Atomic kinds:                                   2
                             - Atoms:                                          3
                             - Shell sets:                                     6

 ENERGY| Total FORCE_EVAL ( QS ) energy [a.u.]:              -17.167380925296

 ATOMIC FORCES in [a.u.]

 # Atom   Kind   Element          X              Y              Z
      1      1      O          -0.00078125     0.00000000    -0.01146542
      2      2      H           0.00043115     0.00000000     0.00573271
      3      2      H           0.00035010     0.00000000     0.00573271
 SUM OF ATOMIC FORCES          -0.00000000     0.00000000     0.00000000     0.00000000
"#;

    #[test]
    fn test_parse_water_log() {
        let data = parse_cp2k_log_content(WATER_LOG, "water").unwrap();
        assert_eq!(data.atom_count, Some(3));
        assert_eq!(data.energy, Some(-17.167380925296));

        let forces = data.forces.unwrap();
        assert_eq!(forces.len(), 3);
        assert_eq!(forces[0].force, [-0.00078125, 0.0, -0.01146542]);
        assert_eq!(forces[0].element.as_deref(), Some("O"));
        assert_eq!(forces[2].force, [0.00035010, 0.0, 0.00573271]);
        assert_eq!(forces[2].element.as_deref(), Some("H"));
    }

    #[test]
    fn test_first_match_wins() {
        let content = "\
 - Atoms: 2
 - Atoms: 5
 ENERGY| Total FORCE_EVAL ( QS ) energy [a.u.]: -1.0
 ENERGY| Total FORCE_EVAL ( QS ) energy [a.u.]: -2.0
";
        let data = parse_cp2k_log_content(content, "test").unwrap();
        assert_eq!(data.atom_count, Some(2));
        assert_eq!(data.energy, Some(-1.0));
        assert_eq!(data.forces, None);
    }

    #[test]
    fn test_hartree_energy_marker() {
        let content = " ENERGY| Total FORCE_EVAL ( QS ) energy [hartree]:     -34.5\n";
        let data = parse_cp2k_log_content(content, "test").unwrap();
        assert_eq!(data.energy, Some(-34.5));
    }

    #[test]
    fn test_missing_anchors_leave_fields_unset() {
        let data = parse_cp2k_log_content("nothing useful here\n", "test").unwrap();
        assert_eq!(data, LogData::default());
    }

    #[test]
    fn test_missing_atom_count_reads_no_force_rows() {
        let content = "\
 # Atom   Kind   Element          X              Y              Z
      1      1      O          -0.1     0.2    -0.3
";
        let data = parse_cp2k_log_content(content, "test").unwrap();
        assert_eq!(data.atom_count, None);
        assert_eq!(data.forces, Some(vec![]));
    }

    #[test]
    fn test_short_force_table_truncates() {
        let content = "\
 - Atoms: 3
 # Atom   Kind   Element          X              Y              Z
      1      1      O          -0.1     0.2    -0.3
";
        let data = parse_cp2k_log_content(content, "test").unwrap();
        assert_eq!(data.forces.unwrap().len(), 1);
    }

    #[test]
    fn test_nonstandard_force_row_keeps_last_three() {
        let content = "\
 - Atoms: 1
 # Atom   Kind   Element          X              Y              Z
   extra  1  1  O  -0.1  0.2  -0.3
";
        let forces = parse_cp2k_log_content(content, "test")
            .unwrap()
            .forces
            .unwrap();
        assert_eq!(forces[0].force, [-0.1, 0.2, -0.3]);
        assert_eq!(forces[0].element, None);
    }

    #[test]
    fn test_malformed_force_row_is_error() {
        let content = "\
 - Atoms: 1
 # Atom   Kind   Element          X              Y              Z
      1      1      O          -0.1     abc    -0.3
";
        let result = parse_cp2k_log_content(content, "test");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_energy_is_error() {
        let content = " ENERGY| Total FORCE_EVAL ( QS ) energy [a.u.]: NaNish\n";
        assert!(parse_cp2k_log_content(content, "test").is_err());
    }
}
