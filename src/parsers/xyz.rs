//! # XYZ 坐标文件读取
//!
//! ## XYZ 格式说明
//! ```text
//! 3                      # 原子数
//! comment                # 注释行
//! O  0.000  0.000  0.119 # 元素 x y z [其他列]
//! H  0.000  0.763 -0.477
//! H  0.000 -0.763 -0.477
//! ```
//!
//! 只读取表头之后的前 `n` 行；第四列之后的内容被忽略。
//! 坐标在解析校验的同时保留原始文本，写出时不改变其精度和写法。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 无外部模块依赖

use crate::error::{ConverterError, Result};
use std::fs;
use std::path::Path;

/// 坐标文件中一个原子
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRecord {
    pub species: String,
    pub position: [f64; 3],
    /// x y z 的原始文本
    pub position_text: [String; 3],
}

/// 坐标文件读取结果
#[derive(Debug, Clone, Default)]
pub struct Coordinates {
    /// 第一行声明的原子数，无法解析时为 `None`
    pub declared_count: Option<usize>,
    pub records: Vec<CoordinateRecord>,
}

/// 读取坐标文件中的前 `n_atoms` 个原子
pub fn read_coordinates(path: &Path, n_atoms: usize) -> Result<Coordinates> {
    let content = fs::read_to_string(path).map_err(|e| ConverterError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_coordinates_content(&content, n_atoms, &path.display().to_string())
}

/// 从字符串内容读取坐标
pub fn parse_coordinates_content(
    content: &str,
    n_atoms: usize,
    source_name: &str,
) -> Result<Coordinates> {
    let lines: Vec<&str> = content.lines().collect();

    let declared_count = lines.first().and_then(|l| l.trim().parse::<usize>().ok());

    let mut records = Vec::with_capacity(n_atoms);
    for (i, line) in lines.iter().enumerate().skip(2).take(n_atoms) {
        let record = parse_atom_line(line).ok_or_else(|| ConverterError::ParseError {
            format: "xyz".to_string(),
            path: source_name.to_string(),
            reason: format!("Invalid atom line {}: '{}'", i + 1, line.trim()),
        })?;
        records.push(record);
    }

    Ok(Coordinates {
        declared_count,
        records,
    })
}

fn parse_atom_line(line: &str) -> Option<CoordinateRecord> {
    let mut tokens = line.split_whitespace();
    let species = tokens.next()?.to_string();

    let text = [
        tokens.next()?.to_string(),
        tokens.next()?.to_string(),
        tokens.next()?.to_string(),
    ];

    let x = text[0].parse().ok()?;
    let y = text[1].parse().ok()?;
    let z = text[2].parse().ok()?;

    Some(CoordinateRecord {
        species,
        position: [x, y, z],
        position_text: text,
    })
}
