// ==========================================
// 生产工单追踪 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsm/.ods) / CSV (.csv)
// 输出: RawBatch（CSV → Delimited,Excel → Grouped,每个工作表一组）
// ==========================================

use crate::domain::raw::{RawBatch, RawCell, RawGroup, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::job_importer_trait::FileParser;
use crate::config::MINUTES_PER_DAY;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, Local};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// calamine 可识别的工作簿扩展名
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsm", "ods"];

// ==========================================
// 辅助函数
// ==========================================

/// 来源标识（文件名,不含目录）
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// 批次导入日期: 文件修改时间的本地日期,取不到时使用今天
pub fn file_ingestion_date(path: &Path) -> String {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).date_naive())
        .unwrap_or_else(|_| Local::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_batch(&self, file_path: &Path, date: &str) -> ImportResult<RawBatch> {
        ensure_exists(file_path)?;

        // 无扩展名（如临时文件）放行
        let ext = extension_of(file_path);
        if !ext.is_empty() && ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头作为首行保留,由归一化器跳过
            .flexible(true) // 允许行长度不一致
            .trim(Trim::All)
            .from_reader(file);

        // 按字节读取,非 UTF-8 单元格以替换字符降级,不拖垮整个文件
        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            let row: RawRow = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).trim().to_string())
                .collect();

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        debug!(file = %file_path.display(), rows = rows.len(), "CSV 解析完成");

        Ok(RawBatch::Delimited {
            source: source_name(file_path),
            date: date.to_string(),
            has_header: true,
            rows,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_batch(&self, file_path: &Path, date: &str) -> ImportResult<RawBatch> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let mut groups = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name)?;

            let rows: Vec<RawRow> = range
                .rows()
                .map(|cells| cells.iter().map(data_to_raw_cell).collect::<RawRow>())
                .filter(|row| !row.is_blank())
                .collect();

            debug!(sheet = %sheet_name, rows = rows.len(), "工作表解析完成");

            groups.push(RawGroup {
                label: sheet_name,
                has_header: true,
                rows,
            });
        }

        Ok(RawBatch::Grouped {
            source: source_name(file_path),
            date: date.to_string(),
            groups,
        })
    }
}

/// calamine 单元格 → RawCell（日期时间单元格渲染为 HH:MM）
fn data_to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(v) => RawCell::Float(*v),
        Data::String(s) => RawCell::from(s.trim()),
        Data::DateTime(dt) => RawCell::Text(serial_time_of_day(dt.as_f64())),
        Data::DateTimeIso(s) => RawCell::from(iso_time_of_day(s)),
        other => RawCell::from(other.to_string()),
    }
}

/// Excel 序列值的小数部分为一天中的时刻
fn serial_time_of_day(serial: f64) -> String {
    let minutes = (serial.fract() * MINUTES_PER_DAY as f64).round() as i64 % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// "2026-01-01T08:30:00" → "08:30"; 无时间部分时原样返回
fn iso_time_of_day(value: &str) -> String {
    let time = value.split_once('T').map(|(_, t)| t).unwrap_or(value);
    match time.get(..5) {
        Some(hm) if hm.as_bytes().get(2) == Some(&b':') => hm.to_string(),
        _ => value.to_string(),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P, date: &str) -> ImportResult<RawBatch> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_batch(path, date),
            ext if WORKBOOK_EXTENSIONS.contains(&ext) => ExcelParser.parse_to_raw_batch(path, date),
            ext => Err(ImportError::UnsupportedFormat(ext.to_string())),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_to_raw_batch(&self, file_path: &Path, date: &str) -> ImportResult<RawBatch> {
        self.parse(file_path, date)
    }
}
