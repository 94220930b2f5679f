// ==========================================
// 生产工单追踪 - 策略参数
// ==========================================
// 职责: 指标计算与归一化所需的可配置策略值
// 说明: 跨夜阈值为业务经验规则,需与业务方确认后方可用于审计
// ==========================================

use serde::{Deserialize, Serialize};

/// 一天的分钟数
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// 默认跨夜判定阈值（半天）
pub const DEFAULT_OVERNIGHT_THRESHOLD_MINUTES: i64 = 12 * 60;

/// 平面源（CSV）的默认 process 标签
pub const DEFAULT_FLAT_PROCESS_LABEL: &str = "Imported CSV";

// ==========================================
// MetricsPolicy - 指标策略
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsPolicy {
    // 实际时刻早于计划开始超过该值时,视为次日
    pub overnight_threshold_minutes: i64,
    // 完工标记（子串匹配,忽略大小写）
    pub completed_markers: Vec<String>,
    // 生产中标记
    pub in_progress_markers: Vec<String>,
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        Self {
            overnight_threshold_minutes: DEFAULT_OVERNIGHT_THRESHOLD_MINUTES,
            completed_markers: default_completed_markers(),
            in_progress_markers: default_in_progress_markers(),
        }
    }
}

pub fn default_completed_markers() -> Vec<String> {
    vec!["เสร็จแล้ว".to_string(), "Completed".to_string()]
}

pub fn default_in_progress_markers() -> Vec<String> {
    vec!["กำลัง".to_string(), "In Progress".to_string()]
}

// ==========================================
// NormalizerDefaults - 归一化缺省值
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerDefaults {
    pub flat_process_label: String,
    pub job_name: String,
    pub time_placeholder: String,
    pub line: String,
    pub status: String,
}

impl Default for NormalizerDefaults {
    fn default() -> Self {
        Self {
            flat_process_label: DEFAULT_FLAT_PROCESS_LABEL.to_string(),
            job_name: "Unknown".to_string(),
            time_placeholder: "-".to_string(),
            line: "Line 1".to_string(),
            status: "Pending".to_string(),
        }
    }
}
