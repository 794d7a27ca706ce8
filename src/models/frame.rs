//! # 轨迹帧数据模型
//!
//! 一帧对应一次 CP2K 单点计算：晶胞、能量和逐原子的位置与受力。
//!
//! ## 依赖关系
//! - 被 `parsers/extxyz.rs`, `batch/runner.rs` 使用
//! - 无外部模块依赖

use crate::error::{ConverterError, Result};

/// 晶格表示
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    pub matrix: [[f64; 3]; 3],

    /// 用户给出的 a b c 原文，写出时原样保留
    pub lengths_text: Option<[String; 3]>,
}

impl Lattice {
    /// 正交晶胞（对角矩阵）
    pub fn diagonal(a: f64, b: f64, c: f64) -> Self {
        Lattice {
            matrix: [[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]],
            lengths_text: None,
        }
    }

    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice {
            matrix,
            lengths_text: None,
        }
    }

    /// 从 "a b c" 形式的字符串解析正交晶胞
    pub fn parse_lengths(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let values: Vec<f64> = tokens
            .iter()
            .map(|t| t.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| ConverterError::InvalidLattice(s.to_string()))?;

        if values.len() != 3 || values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ConverterError::InvalidLattice(s.to_string()));
        }

        let mut lattice = Lattice::diagonal(values[0], values[1], values[2]);
        lattice.lengths_text = Some([
            tokens[0].to_string(),
            tokens[1].to_string(),
            tokens[2].to_string(),
        ]);
        Ok(lattice)
    }

    /// 按行展开的 9 个分量
    pub fn flatten(&self) -> [f64; 9] {
        let m = self.matrix;
        [
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        ]
    }

    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }
}

impl Default for Lattice {
    /// 未指定晶胞时使用 15 Å 立方盒子
    fn default() -> Self {
        let mut lattice = Lattice::diagonal(15.0, 15.0, 15.0);
        lattice.lengths_text = Some(["15.0".to_string(), "15.0".to_string(), "15.0".to_string()]);
        lattice
    }
}

/// 单个原子的位置和受力
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// 元素符号
    pub species: String,

    /// 笛卡尔坐标 (Å)
    pub position: [f64; 3],

    /// 坐标文件中的原始坐标文本
    pub position_text: Option<[String; 3]>,

    /// 受力分量
    pub force: [f64; 3],
}

impl AtomRecord {
    pub fn new(species: impl Into<String>, position: [f64; 3], force: [f64; 3]) -> Self {
        AtomRecord {
            species: species.into(),
            position,
            position_text: None,
            force,
        }
    }

    pub fn with_position_text(mut self, text: [String; 3]) -> Self {
        self.position_text = Some(text);
        self
    }
}

/// 轨迹中的一帧
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub lattice: Lattice,

    /// 总能量；日志中缺失时为 `None`
    pub energy: Option<f64>,

    pub atoms: Vec<AtomRecord>,
}

impl Frame {
    pub fn new(lattice: Lattice, energy: Option<f64>, atoms: Vec<AtomRecord>) -> Self {
        Frame {
            lattice,
            energy,
            atoms,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// 化学式（按元素符号排序）
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.species.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
