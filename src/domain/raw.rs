// ==========================================
// 生产工单追踪 - 原始行/批次结构
// ==========================================
// 职责: 文件解析层与归一化层之间的中间表示
// 说明: 单元格为弱类型（文本/数值）,允许缺失尾列
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RawCell - 原始单元格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
}

impl RawCell {
    /// 空单元格或仅含空白的文本
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Int(_) | RawCell::Float(_) => false,
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Text(s) => write!(f, "{}", s),
            RawCell::Int(i) => write!(f, "{}", i),
            RawCell::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value.to_string())
        }
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        if value.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value)
        }
    }
}

impl From<i64> for RawCell {
    fn from(value: i64) -> Self {
        RawCell::Int(value)
    }
}

// ==========================================
// RawRow - 原始行（固定列序,见 RecordNormalizer）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self { cells }
    }

    /// 按列取单元格,缺失尾列视为空
    pub fn cell(&self, idx: usize) -> &RawCell {
        self.cells.get(idx).unwrap_or(&RawCell::Empty)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(RawCell::is_blank)
    }
}

impl<T: Into<RawCell>> FromIterator<T> for RawRow {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ==========================================
// RawGroup - 多分组源中的一组（通常为一个工作表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGroup {
    // 分组标签 → 工单 process 字段（归一化时 trim）
    pub label: String,
    pub has_header: bool,
    pub rows: Vec<RawRow>,
}

// ==========================================
// RawBatch - 一个源文件的原始批次
// ==========================================
// 带标签的变体,归一化器据此分派,不做运行时类型探测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawBatch {
    /// 分隔文本（CSV）: 单组,使用固定 process 标签
    Delimited {
        source: String,
        date: String,
        has_header: bool,
        rows: Vec<RawRow>,
    },
    /// 结构化多分组（多工作表）: 每组标签即 process
    Grouped {
        source: String,
        date: String,
        groups: Vec<RawGroup>,
    },
}

impl RawBatch {
    /// 来源标识（文件名）,用于报告
    pub fn source(&self) -> &str {
        match self {
            RawBatch::Delimited { source, .. } | RawBatch::Grouped { source, .. } => source,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            RawBatch::Delimited { date, .. } | RawBatch::Grouped { date, .. } => date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_trailing_cells_are_empty() {
        let row: RawRow = vec!["1", "JOB-A"].into_iter().collect();
        assert_eq!(row.cell(1), &RawCell::Text("JOB-A".to_string()));
        assert_eq!(row.cell(9), &RawCell::Empty);
    }

    #[test]
    fn test_blank_row_detection() {
        let row: RawRow = vec!["", "  ", ""].into_iter().collect();
        assert!(row.is_blank());

        let row = RawRow::new(vec![RawCell::Empty, RawCell::Int(0)]);
        assert!(!row.is_blank());
    }
}
