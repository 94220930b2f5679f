// ==========================================
// 生产工单追踪 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 前导整数解析
// ==========================================

use crate::domain::raw::RawCell;
use crate::importer::job_importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, cell: &RawCell) -> Option<String> {
        let text = match cell {
            RawCell::Empty => return None,
            RawCell::Text(s) => strip_quotes(s.trim()).trim().to_string(),
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(v) if v.is_finite() && v.fract() == 0.0 => format!("{}", *v as i64),
            RawCell::Float(v) => v.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn parse_integer(&self, cell: &RawCell) -> Option<i64> {
        match cell {
            RawCell::Empty => None,
            RawCell::Int(i) => Some(*i),
            RawCell::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            RawCell::Float(_) => None,
            RawCell::Text(s) => parse_leading_int(strip_quotes(s.trim())),
        }
    }

    fn parse_quantity(&self, cell: &RawCell) -> u64 {
        self.parse_integer(cell)
            .map(|n| n.max(0) as u64)
            .unwrap_or(0)
    }
}

/// 去掉成对的外层引号
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// 解析前导整数: "12abc" → 12, "1.5" → 1, "-3" → -3, "abc" → None
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let digit_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }

    rest[..digit_len].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.clean_text(&RawCell::from("  Line 3 ")),
            Some("Line 3".to_string())
        );
        assert_eq!(cleaner.clean_text(&RawCell::from("   ")), None);
        assert_eq!(cleaner.clean_text(&RawCell::Empty), None);
        assert_eq!(
            cleaner.clean_text(&RawCell::from("\"JOB-1\"")),
            Some("JOB-1".to_string())
        );
        assert_eq!(cleaner.clean_text(&RawCell::Float(42.0)), Some("42".to_string()));
        assert_eq!(cleaner.clean_text(&RawCell::Int(7)), Some("7".to_string()));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int("1.5"), Some(1));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("  8"), Some(8));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn test_parse_integer_from_cells() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_integer(&RawCell::Int(5)), Some(5));
        assert_eq!(cleaner.parse_integer(&RawCell::Float(5.9)), Some(5));
        assert_eq!(cleaner.parse_integer(&RawCell::Float(f64::NAN)), None);
        assert_eq!(cleaner.parse_integer(&RawCell::from("\"17\"")), Some(17));
        assert_eq!(cleaner.parse_integer(&RawCell::Empty), None);
    }

    #[test]
    fn test_parse_quantity_never_negative() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_quantity(&RawCell::from("150")), 150);
        assert_eq!(cleaner.parse_quantity(&RawCell::from("-20")), 0);
        assert_eq!(cleaner.parse_quantity(&RawCell::from("n/a")), 0);
        assert_eq!(cleaner.parse_quantity(&RawCell::Empty), 0);
    }
}
