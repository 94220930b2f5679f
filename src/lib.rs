// ==========================================
// 生产工单追踪 - 核心库
// ==========================================
// 技术栈: Rust + SQLite（配置存储）
// 系统定位: 工单导入、时效评分、汇总与筛选
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 指标/汇总/筛选
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 性能统计
pub mod perf;

// 演示数据
pub mod sample;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DelayFilter, FilterState, GroupKey, ScoreBand, Selector, StatusClass};

// 领域实体
pub use domain::{
    BatchOutcome, BatchReport, IngestionReport, JobMetrics, ProcessSummary, ProductionJob,
    RawBatch,
};

// 引擎
pub use engine::{
    Aggregator, DashboardState, DashboardView, FilterEngine, MarkerStatusClassifier,
    TimeMetricsEngine,
};

// 导入
pub use importer::{ImportError, JobImporter, JobImporterImpl, RecordNormalizer};

// 配置
pub use config::{ConfigManager, MetricsPolicy, NormalizerDefaults, PolicyConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产工单追踪";
