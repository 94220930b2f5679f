// ==========================================
// 生产工单追踪 - 领域模型层
// ==========================================
// 职责: 定义工单实体、原始批次、筛选与分类类型
// 红线: 不含文件读取逻辑,不含指标计算逻辑
// ==========================================

pub mod ingestion;
pub mod job;
pub mod raw;
pub mod types;

// 重导出核心类型
pub use ingestion::{BatchOutcome, BatchReport, IngestionReport};
pub use job::{
    JobMetrics, ProcessSummary, ProductionJob, TimeWindow, TIME_SENTINEL, UNKNOWN_PROCESS,
};
pub use raw::{RawBatch, RawCell, RawGroup, RawRow};
pub use types::{DelayFilter, FilterState, GroupKey, ScoreBand, Selector, StatusClass, ALL};
