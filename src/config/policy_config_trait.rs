// ==========================================
// 生产工单追踪 - 策略配置读取 Trait
// ==========================================
// 职责: 定义指标/导入所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::policy::{MetricsPolicy, NormalizerDefaults};
use async_trait::async_trait;

// ==========================================
// PolicyConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PolicyConfigReader: Send + Sync {
    /// 获取跨夜判定阈值（分钟）
    ///
    /// # 默认值
    /// - 720
    ///
    /// # 用途
    /// - 实际时刻早于计划开始超过该阈值时,视为已滚动到次日
    async fn get_overnight_threshold_minutes(&self) -> ConfigResult<i64>;

    /// 获取完工标记列表
    ///
    /// # 默认值
    /// - ["เสร็จแล้ว", "Completed"]
    async fn get_completed_markers(&self) -> ConfigResult<Vec<String>>;

    /// 获取生产中标记列表
    ///
    /// # 默认值
    /// - ["กำลัง", "In Progress"]
    async fn get_in_progress_markers(&self) -> ConfigResult<Vec<String>>;

    /// 获取平面源（CSV）的 process 标签
    ///
    /// # 默认值
    /// - "Imported CSV"
    async fn get_flat_process_label(&self) -> ConfigResult<String>;

    /// 组装指标策略
    async fn load_metrics_policy(&self) -> ConfigResult<MetricsPolicy> {
        Ok(MetricsPolicy {
            overnight_threshold_minutes: self.get_overnight_threshold_minutes().await?,
            completed_markers: self.get_completed_markers().await?,
            in_progress_markers: self.get_in_progress_markers().await?,
        })
    }

    /// 组装归一化缺省值
    async fn load_normalizer_defaults(&self) -> ConfigResult<NormalizerDefaults> {
        Ok(NormalizerDefaults {
            flat_process_label: self.get_flat_process_label().await?,
            ..NormalizerDefaults::default()
        })
    }
}
