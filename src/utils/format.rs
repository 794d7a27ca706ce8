//! # 浮点数格式化
//!
//! 输出文件中的所有数值使用同一种约定：最短可往返表示，整数值保留 `.0`，
//! 绝对值小于 1e-4 或不小于 1e16 时使用指数形式（如 `1.5e-05`、`1e+16`）。
//! 这与 ASE 等 Python 工具默认的浮点数字符串一致。
//!
//! ## 依赖关系
//! - 被 `parsers/extxyz.rs` 使用
//! - 无外部模块依赖

/// 按上述约定格式化 f64
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let abs = value.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        return format_exponent(value);
    }

    let s = format!("{}", value);
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// 指数形式：尾数最短表示，指数至少两位并带符号
fn format_exponent(value: f64) -> String {
    // Rust 的 `{:e}` 输出形如 "1.5e-5"
    let s = format!("{:e}", value);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}
