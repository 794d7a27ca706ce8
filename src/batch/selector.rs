//! # 计算文件夹选择器
//!
//! 决定基础目录下哪些子目录需要处理，以及处理顺序。
//!
//! ## 功能
//! - 数字范围筛选 `[start, end]` 并按步长抽取
//! - 无范围时选取全部子目录
//! - 两种排序：按数字排序（默认）或保持文件系统列出顺序
//!
//! ## 依赖关系
//! - 被 `commands/collect.rs` 调用
//! - 使用 `walkdir` 列出子目录

use crate::error::{ConverterError, Result};

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件夹处理顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderOrder {
    /// 数字文件夹按数值排序，其余按名称排序
    #[default]
    Numeric,
    /// 保持目录列出顺序，步长作用于未排序的列表
    Listing,
}

/// 数字文件夹范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderRange {
    pub start: u64,
    pub end: u64,
    pub step: usize,
}

impl FolderRange {
    pub fn new(start: u64, end: u64, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(ConverterError::InvalidRange(
                "step must be a positive integer".to_string(),
            ));
        }
        Ok(FolderRange { start, end, step })
    }

    fn contains(&self, value: u64) -> bool {
        self.start <= value && value <= self.end
    }
}

/// 文件夹选择器
pub struct FolderSelector {
    base: PathBuf,
    range: Option<FolderRange>,
    order: FolderOrder,
}

impl FolderSelector {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            range: None,
            order: FolderOrder::default(),
        }
    }

    pub fn with_range(mut self, range: Option<FolderRange>) -> Self {
        self.range = range;
        self
    }

    pub fn with_order(mut self, order: FolderOrder) -> Self {
        self.order = order;
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// 列出并筛选子目录名
    pub fn select(&self) -> Result<Vec<String>> {
        if !self.base.is_dir() {
            return Err(ConverterError::DirectoryNotFound {
                path: self.base.display().to_string(),
            });
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.base).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                ConverterError::Other(format!("Failed to list {}: {}", self.base.display(), e))
            })?;
            // 跟随指向目录的符号链接
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(self.select_from(names))
    }

    /// 对已列出的目录名应用筛选、排序与步长
    pub fn select_from(&self, names: Vec<String>) -> Vec<String> {
        let mut names: Vec<String> = match self.range {
            Some(range) => names
                .into_iter()
                .filter(|name| numeric_value(name).is_some_and(|v| range.contains(v)))
                .collect(),
            None => names,
        };

        if self.order == FolderOrder::Numeric {
            names.sort_by(|a, b| compare_folder_names(a, b));
        }

        match self.range {
            Some(range) => names.into_iter().step_by(range.step).collect(),
            None => names,
        }
    }
}

/// 纯数字目录名的数值
fn numeric_value(name: &str) -> Option<u64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// 数字名在前并按数值排序，其余按字典序
fn compare_folder_names(a: &str, b: &str) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_range_with_step_numeric_order() {
        let listing = names(&["7", "3", "10", "1", "5", "2", "9", "4", "8", "6"]);
        let selector =
            FolderSelector::new("base").with_range(Some(FolderRange::new(1, 10, 5).unwrap()));

        assert_eq!(selector.select_from(listing), names(&["1", "6"]));
    }

    #[test]
    fn test_range_with_step_listing_order() {
        let listing = names(&["7", "3", "10", "1", "5", "2", "9", "4", "8", "6"]);
        let selector = FolderSelector::new("base")
            .with_range(Some(FolderRange::new(1, 10, 5).unwrap()))
            .with_order(FolderOrder::Listing);

        assert_eq!(selector.select_from(listing), names(&["7", "2"]));
    }

    #[test]
    fn test_range_selection_count_and_bounds() {
        let listing = names(&["4", "9", "1", "10", "2", "8", "3", "7", "6", "5"]);
        for order in [FolderOrder::Numeric, FolderOrder::Listing] {
            let selector = FolderSelector::new("base")
                .with_range(Some(FolderRange::new(1, 10, 5).unwrap()))
                .with_order(order);
            let picked = selector.select_from(listing.clone());

            assert_eq!(picked.len(), 10 / 5);
            for name in &picked {
                let v: u64 = name.parse().unwrap();
                assert!((1..=10).contains(&v));
            }
        }
    }

    #[test]
    fn test_range_filters_non_numeric() {
        let listing = names(&["1", "run_2", "3", "-4", "+5", "11", "03"]);
        let selector =
            FolderSelector::new("base").with_range(Some(FolderRange::new(1, 10, 1).unwrap()));

        assert_eq!(selector.select_from(listing), names(&["1", "03", "3"]));
    }

    #[test]
    fn test_no_range_keeps_everything() {
        let listing = names(&["b", "10", "a", "2"]);
        let selector = FolderSelector::new("base");
        assert_eq!(selector.select_from(listing.clone()), names(&["2", "10", "a", "b"]));

        let selector = FolderSelector::new("base").with_order(FolderOrder::Listing);
        assert_eq!(selector.select_from(listing.clone()), listing);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let selector =
            FolderSelector::new("base").with_range(Some(FolderRange::new(10, 1, 1).unwrap()));
        assert!(selector.select_from(names(&["1", "5", "10"])).is_empty());
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(FolderRange::new(1, 10, 0).is_err());
    }

    #[test]
    fn test_select_lists_only_directories() {
        let dir = tempfile::tempdir().unwrap();
        for d in ["1", "2", "3"] {
            std::fs::create_dir(dir.path().join(d)).unwrap();
        }
        std::fs::write(dir.path().join("4"), "not a folder").unwrap();

        let selector = FolderSelector::new(dir.path());
        assert_eq!(selector.select().unwrap(), names(&["1", "2", "3"]));
    }

    #[test]
    fn test_select_missing_base() {
        let dir = tempfile::tempdir().unwrap();
        let selector = FolderSelector::new(dir.path().join("missing"));
        assert!(selector.select().is_err());
    }
}
