// ==========================================
// 生产工单追踪 - 状态分类器
// ==========================================
// 职责: 把自由文本状态归类为 完工/生产中/其他
// 说明: 状态词汇随现场语言变化,匹配规则作为可替换策略注入
// ==========================================

use crate::config::MetricsPolicy;
use crate::domain::types::StatusClass;

// ==========================================
// StatusClassifier Trait
// ==========================================
pub trait StatusClassifier: Send + Sync {
    /// 状态文本是否表示已完工
    fn is_completed(&self, status: &str) -> bool;

    /// 状态文本是否表示生产中
    fn is_in_progress(&self, status: &str) -> bool;

    /// 三分类（完工优先）
    fn classify(&self, status: &str) -> StatusClass {
        if self.is_completed(status) {
            StatusClass::Completed
        } else if self.is_in_progress(status) {
            StatusClass::InProgress
        } else {
            StatusClass::Pending
        }
    }
}

// ==========================================
// MarkerStatusClassifier - 子串标记匹配（忽略大小写）
// ==========================================
#[derive(Debug, Clone)]
pub struct MarkerStatusClassifier {
    completed_markers: Vec<String>,
    in_progress_markers: Vec<String>,
}

impl MarkerStatusClassifier {
    pub fn new(completed_markers: Vec<String>, in_progress_markers: Vec<String>) -> Self {
        Self {
            completed_markers: normalize_markers(completed_markers),
            in_progress_markers: normalize_markers(in_progress_markers),
        }
    }

    pub fn from_policy(policy: &MetricsPolicy) -> Self {
        Self::new(
            policy.completed_markers.clone(),
            policy.in_progress_markers.clone(),
        )
    }
}

impl Default for MarkerStatusClassifier {
    fn default() -> Self {
        Self::from_policy(&MetricsPolicy::default())
    }
}

impl StatusClassifier for MarkerStatusClassifier {
    fn is_completed(&self, status: &str) -> bool {
        contains_any(status, &self.completed_markers)
    }

    fn is_in_progress(&self, status: &str) -> bool {
        contains_any(status, &self.in_progress_markers)
    }
}

fn normalize_markers(markers: Vec<String>) -> Vec<String> {
    markers
        .into_iter()
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}

fn contains_any(text: &str, markers: &[String]) -> bool {
    let lowered = text.to_lowercase();
    markers.iter().any(|m| lowered.contains(m.as_str()))
}
