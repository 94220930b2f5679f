// ==========================================
// 生产工单追踪 - 导入层
// ==========================================
// 职责: 外部文件导入,生成工单集合
// 支持: Excel（多工作表）, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod job_importer;
pub mod job_importer_trait;
pub mod record_normalizer;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::{file_ingestion_date, CsvParser, ExcelParser, UniversalFileParser};
pub use job_importer::JobImporterImpl;
pub use record_normalizer::RecordNormalizer;

// 重导出 Trait 接口
pub use job_importer_trait::{DataCleaner, FileParser, JobImporter};
