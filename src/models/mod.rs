//! # 数据模型模块
//!
//! 定义轨迹帧和单位换算表。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `batch/` 和 `commands/` 使用
//! - 子模块: frame, units

pub mod frame;
pub mod units;

pub use frame::{AtomRecord, Frame, Lattice};
pub use units::{Quantity, UnitConversion};
