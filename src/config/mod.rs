// ==========================================
// 生产工单追踪 - 配置层
// ==========================================
// 职责: 策略参数管理,支持 config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod policy;
pub mod policy_config_trait;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use policy::{MetricsPolicy, NormalizerDefaults, MINUTES_PER_DAY};
pub use policy_config_trait::PolicyConfigReader;
