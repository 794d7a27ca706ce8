//! # 单位换算表
//!
//! CP2K 输出使用原子单位，下游工具（ASE、MLIP 训练）一般使用 eV 和 eV/Å。
//! 换算系数取自 NIST CODATA (https://physics.nist.gov/cuu/Constants/)。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `commands/collect.rs` 使用
//! - 无外部模块依赖

use std::fmt;

/// 换算作用的物理量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Energy,
    Force,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Energy => write!(f, "energy"),
            Quantity::Force => write!(f, "force"),
        }
    }
}

/// 支持的单位换算
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitConversion {
    /// Hartree -> eV
    HartreeToEv,
    /// Hartree/Bohr -> eV/Å
    HartreePerBohrToEvPerAngstrom,
}

/// 换算表：(命令行键名, 换算, 系数)
const CONVERSION_TABLE: [(&str, UnitConversion, f64); 2] = [
    ("au2eV", UnitConversion::HartreeToEv, 27.21138625),
    (
        "au2eVA",
        UnitConversion::HartreePerBohrToEvPerAngstrom,
        51.42206771,
    ),
];

impl UnitConversion {
    /// 按键名查找换算，要求其作用于指定物理量
    ///
    /// 未知键名或物理量不匹配时返回 `None`，即不做换算。
    pub fn lookup(key: &str, quantity: Quantity) -> Option<Self> {
        CONVERSION_TABLE
            .iter()
            .find(|(k, conv, _)| *k == key && conv.quantity() == quantity)
            .map(|(_, conv, _)| *conv)
    }

    pub fn key(&self) -> &'static str {
        match self {
            UnitConversion::HartreeToEv => "au2eV",
            UnitConversion::HartreePerBohrToEvPerAngstrom => "au2eVA",
        }
    }

    pub fn quantity(&self) -> Quantity {
        match self {
            UnitConversion::HartreeToEv => Quantity::Energy,
            UnitConversion::HartreePerBohrToEvPerAngstrom => Quantity::Force,
        }
    }

    pub fn factor(&self) -> f64 {
        CONVERSION_TABLE
            .iter()
            .find(|(_, conv, _)| conv == self)
            .map(|(_, _, factor)| *factor)
            .unwrap_or(1.0)
    }

    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor()
    }

    pub fn apply_vec3(&self, v: [f64; 3]) -> [f64; 3] {
        [self.apply(v[0]), self.apply(v[1]), self.apply(v[2])]
    }
}

impl fmt::Display for UnitConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitConversion::HartreeToEv => write!(f, "{} (Hartree -> eV)", self.key()),
            UnitConversion::HartreePerBohrToEvPerAngstrom => {
                write!(f, "{} (Hartree/Bohr -> eV/Å)", self.key())
            }
        }
    }
}

/// 所有已知键名，用于提示信息
pub fn known_keys(quantity: Quantity) -> Vec<&'static str> {
    CONVERSION_TABLE
        .iter()
        .filter(|(_, conv, _)| conv.quantity() == quantity)
        .map(|(k, _, _)| *k)
        .collect()
}

/// 对可选换算求值，`None` 表示原样返回
pub fn convert(conversion: Option<UnitConversion>, value: f64) -> f64 {
    conversion.map_or(value, |c| c.apply(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_keys() {
        assert_eq!(
            UnitConversion::lookup("au2eV", Quantity::Energy),
            Some(UnitConversion::HartreeToEv)
        );
        assert_eq!(
            UnitConversion::lookup("au2eVA", Quantity::Force),
            Some(UnitConversion::HartreePerBohrToEvPerAngstrom)
        );
    }

    #[test]
    fn test_lookup_unknown_or_mismatched_key() {
        assert_eq!(UnitConversion::lookup("kcal", Quantity::Energy), None);
        assert_eq!(UnitConversion::lookup("au2eVA", Quantity::Energy), None);
        assert_eq!(UnitConversion::lookup("au2eV", Quantity::Force), None);
        assert_eq!(UnitConversion::lookup("", Quantity::Force), None);
    }

    #[test]
    fn test_energy_conversion() {
        let conv = UnitConversion::HartreeToEv;
        assert_eq!(conv.apply(-1.5), -1.5 * 27.21138625);
    }

    #[test]
    fn test_conversion_is_invertible() {
        for conv in [
            UnitConversion::HartreeToEv,
            UnitConversion::HartreePerBohrToEvPerAngstrom,
        ] {
            for value in [-17.1673, 0.0, 3.2e-5, 1234.5] {
                let back = conv.apply(value) / conv.factor();
                assert!((back - value).abs() < 1e-12 * value.abs().max(1.0));
            }
        }
    }

    #[test]
    fn test_convert_optional() {
        assert_eq!(convert(None, 2.0), 2.0);
        let f = convert(Some(UnitConversion::HartreePerBohrToEvPerAngstrom), 2.0);
        assert!((f - 102.84413542).abs() < 1e-9);
    }

    #[test]
    fn test_known_keys() {
        assert_eq!(known_keys(Quantity::Energy), vec!["au2eV"]);
        assert_eq!(known_keys(Quantity::Force), vec!["au2eVA"]);
    }
}
