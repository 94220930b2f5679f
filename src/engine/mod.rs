// ==========================================
// 生产工单追踪 - 引擎层
// ==========================================
// 职责: 时效指标、状态分类、汇总、筛选
// 红线: 纯计算,不做 I/O,不持有可变共享状态
// ==========================================

pub mod aggregator;
pub mod dashboard;
pub mod filter_engine;
pub mod status;
pub mod time_metrics;

// 重导出核心引擎
pub use aggregator::Aggregator;
pub use dashboard::{DashboardState, DashboardView};
pub use filter_engine::{FacetLists, FilterEngine};
pub use status::{MarkerStatusClassifier, StatusClassifier};
pub use time_metrics::{compute_metrics, efficiency_score, to_minutes, TimeMetricsEngine};
