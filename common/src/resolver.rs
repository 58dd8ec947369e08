//! 列定位
//!
//! 多级表头合并后的列名形如 `项目主要成本情况_劳务费_结算`，
//! 不同文件间空格写法也不统一，因此按规范化后的名称做
//! 完全匹配或 `_<逻辑列名>` 后缀匹配。

use crate::error::{Error, Result};
use crate::types::Table;

/// 报错时展示的候选列数量
const SAMPLE_COLUMNS: usize = 5;

/// 规范化列名：去除首尾空白，并删除其中的半角/全角空格
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{3000}')
        .collect()
}

/// 判断物理列名是否对应逻辑列名（两者都应已规范化）
fn matches_logical(physical: &str, logical: &str) -> bool {
    if physical == logical {
        return true;
    }
    physical
        .strip_suffix(logical)
        .is_some_and(|prefix| prefix.ends_with('_'))
}

/// 在表中定位逻辑列，返回列下标
pub fn resolve_column(table: &Table, logical_name: &str) -> Result<usize> {
    resolve_in(table.columns(), logical_name)
}

/// 在列名列表中定位逻辑列
pub fn resolve_in(columns: &[String], logical_name: &str) -> Result<usize> {
    let target = normalize_name(logical_name);
    let matches: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, col)| matches_logical(&normalize_name(col), &target))
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [] => Err(Error::ColumnNotFound {
            column: logical_name.to_string(),
            available: columns.iter().take(SAMPLE_COLUMNS).cloned().collect(),
        }),
        [index] => Ok(*index),
        _ => Err(Error::AmbiguousColumn {
            column: logical_name.to_string(),
            matches: matches.iter().map(|&i| columns[i].clone()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  亏损 金额 "), "亏损金额");
        assert_eq!(normalize_name("\u{3000}合同\u{3000}金额"), "合同金额");
        assert_eq!(normalize_name("\n项目名称\t"), "项目名称");
    }

    #[test]
    fn test_resolve_exact_match() {
        let cols = columns(&["序号", "项目名称", "亏损金额"]);
        assert_eq!(resolve_in(&cols, "亏损金额").unwrap(), 2);
    }

    #[test]
    fn test_resolve_suffix_match() {
        let cols = columns(&["序号", "项目主要成本情况_劳务费_结算", "项目主要成本情况_劳务费_预算"]);
        assert_eq!(resolve_in(&cols, "劳务费_结算").unwrap(), 1);
        assert_eq!(resolve_in(&cols, "项目主要成本情况_劳务费_结算").unwrap(), 1);
    }

    #[test]
    fn test_resolve_ignores_spacing() {
        let cols = columns(&["基本情况_亏损 金额", "合同\u{3000}金额"]);
        assert_eq!(resolve_in(&cols, "亏损金额").unwrap(), 0);
        assert_eq!(resolve_in(&cols, " 合同金额 ").unwrap(), 1);
    }

    #[test]
    fn test_resolve_suffix_requires_underscore() {
        // 「实际亏损金额」不是「亏损金额」的层级后缀
        let cols = columns(&["实际亏损金额"]);
        let err = resolve_in(&cols, "亏损金额").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { .. }));
    }

    #[test]
    fn test_resolve_not_found_lists_sample() {
        let cols = columns(&["a", "b", "c", "d", "e", "f", "g"]);
        match resolve_in(&cols, "亏损金额").unwrap_err() {
            Error::ColumnNotFound { column, available } => {
                assert_eq!(column, "亏损金额");
                assert_eq!(available, columns(&["a", "b", "c", "d", "e"]));
            }
            other => panic!("意外的错误: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_ambiguous() {
        let cols = columns(&["本年_亏损金额", "上年_亏损金额", "合同金额"]);
        match resolve_in(&cols, "亏损金额").unwrap_err() {
            Error::AmbiguousColumn { matches, .. } => {
                assert_eq!(matches, columns(&["本年_亏损金额", "上年_亏损金额"]));
            }
            other => panic!("意外的错误: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_is_position_independent_and_idempotent() {
        let a = columns(&["序号", "基本情况_亏损金额", "合同金额"]);
        let b = columns(&["合同金额", "序号", "基本情况_亏损金额"]);

        let first = resolve_in(&a, "亏损金额").unwrap();
        let second = resolve_in(&a, "亏损金额").unwrap();
        assert_eq!(first, second);
        assert_eq!(a[first], b[resolve_in(&b, "亏损金额").unwrap()]);
    }
}
