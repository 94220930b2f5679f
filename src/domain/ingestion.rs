// ==========================================
// 生产工单追踪 - 导入结果
// ==========================================
// 职责: 描述一次导入调用中每个批次的结果
// 说明: 各批次相互独立,失败批次不回滚成功批次
// ==========================================

use crate::domain::job::ProductionJob;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// BatchOutcome - 单批次结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchOutcome {
    Loaded { job_count: usize },
    // 批次无任何可用数据行
    Empty,
    Failed { message: String },
}

// ==========================================
// BatchReport - 单批次报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub source: String,
    pub date: String,
    pub outcome: BatchOutcome,
}

impl BatchReport {
    pub fn new(source: impl Into<String>, date: impl Into<String>, outcome: BatchOutcome) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            source: source.into(),
            date: date.into(),
            outcome,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Loaded { .. })
    }

    pub fn is_empty_batch(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Empty)
    }
}

// ==========================================
// IngestionReport - 一次导入调用的汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionReport {
    // 按提交顺序拼接的工单
    pub jobs: Vec<ProductionJob>,
    // 与提交顺序一致
    pub batches: Vec<BatchReport>,
}

impl IngestionReport {
    pub fn has_data(&self) -> bool {
        !self.jobs.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.batches.iter().filter(|b| b.is_loaded()).count()
    }

    /// 未成功加载的批次（空批次 + 失败批次）
    pub fn failures(&self) -> impl Iterator<Item = &BatchReport> {
        self.batches.iter().filter(|b| !b.is_loaded())
    }

    pub fn empty_sources(&self) -> Vec<&str> {
        self.batches
            .iter()
            .filter(|b| b.is_empty_batch())
            .map(|b| b.source.as_str())
            .collect()
    }
}
