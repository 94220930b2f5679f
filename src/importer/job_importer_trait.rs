// ==========================================
// 生产工单追踪 - 工单导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::ingestion::IngestionReport;
use crate::domain::job::ProductionJob;
use crate::domain::raw::{RawBatch, RawCell};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// JobImporter Trait
// ==========================================
// 用途: 工单导入主接口
// 实现者: JobImporterImpl
#[async_trait]
pub trait JobImporter: Send + Sync {
    /// 导入单个文件
    ///
    /// # 返回
    /// - Ok(Vec<ProductionJob>): 该文件的全部工单
    /// - Err(EmptyBatch): 文件无可用数据行
    /// - Err: 文件读取错误、格式错误
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<Vec<ProductionJob>>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的,某个文件失败不影响其他文件
    /// - 结果按提交顺序拼接,与完成顺序无关
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> IngestionReport;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（文件 → 原始批次）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始批次
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - date: 该批次的导入日期（YYYY-MM-DD）
    fn parse_to_raw_batch(&self, file_path: &Path, date: &str) -> ImportResult<RawBatch>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 清洗文本（TRIM,空白 → None）
    fn clean_text(&self, cell: &RawCell) -> Option<String>;

    /// 解析整数（取前导整数部分,无数字 → None）
    fn parse_integer(&self, cell: &RawCell) -> Option<i64>;

    /// 解析数量（无法解析或为负 → 0）
    fn parse_quantity(&self, cell: &RawCell) -> u64;
}
