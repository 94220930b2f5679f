// ==========================================
// 生产工单追踪 - 工序汇总引擎
// ==========================================
// 职责: 按工序（可选再按日期）分组,汇总数量/完工/评分
// 输出: ProcessSummary 列表（按分组键稳定排序）
// ==========================================

use crate::domain::job::{JobMetrics, ProcessSummary, ProductionJob};
use crate::domain::types::{GroupKey, ALL};
use crate::engine::time_metrics::TimeMetricsEngine;
use std::collections::BTreeMap;
use tracing::instrument;

// ==========================================
// SummaryAccumulator - 单组累加器
// ==========================================
struct SummaryAccumulator {
    summary: ProcessSummary,
    score_total: i64,
}

impl SummaryAccumulator {
    fn new(process: &str, date: Option<String>) -> Self {
        Self {
            summary: ProcessSummary::new(process, date),
            score_total: 0,
        }
    }

    fn add(&mut self, job: &ProductionJob, metrics: &JobMetrics) {
        let s = &mut self.summary;
        s.count += 1;
        s.quantity += job.quantity;
        if metrics.is_completed {
            s.completed += 1;
        }
        if let Some(score) = metrics.score {
            self.score_total += score;
            s.scored_count += 1;
            if score == 100 {
                s.on_time_count += 1;
            } else {
                s.delayed_count += 1;
            }
        }
    }

    fn finish(mut self) -> ProcessSummary {
        self.summary.avg_score = rounded_average(self.score_total, self.summary.scored_count);
        self.summary
    }
}

/// round(total / count),count 为 0 时返回 None
fn rounded_average(total: i64, count: usize) -> Option<i64> {
    if count == 0 {
        return None;
    }
    let n = count as i64;
    Some((2 * total + n) / (2 * n))
}

// ==========================================
// Aggregator - 汇总引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    metrics_engine: TimeMetricsEngine,
}

impl Aggregator {
    pub fn new(metrics_engine: TimeMetricsEngine) -> Self {
        Self { metrics_engine }
    }

    /// 按分组键汇总
    ///
    /// 输出按 (process, date) 升序,保证相同输入得到相同顺序
    #[instrument(skip(self, jobs), fields(count = jobs.len()))]
    pub fn summarize(&self, jobs: &[ProductionJob], group_key: GroupKey) -> Vec<ProcessSummary> {
        let mut groups: BTreeMap<(String, Option<String>), SummaryAccumulator> = BTreeMap::new();

        for job in jobs {
            let process = job.process_key();
            let date = match group_key {
                GroupKey::Process => None,
                GroupKey::ProcessAndDate => Some(job.date.clone()),
            };
            let metrics = self.metrics_engine.evaluate(job);

            groups
                .entry((process.to_string(), date.clone()))
                .or_insert_with(|| SummaryAccumulator::new(process, date))
                .add(job, &metrics);
        }

        groups.into_values().map(SummaryAccumulator::finish).collect()
    }

    /// 全部工单汇总为一行（process = "ALL"）
    pub fn overall(&self, jobs: &[ProductionJob]) -> ProcessSummary {
        let mut acc = SummaryAccumulator::new(ALL, None);
        for job in jobs {
            acc.add(job, &self.metrics_engine.evaluate(job));
        }
        acc.finish()
    }

    /// 按数量降序排列的工序汇总（数量相同按工序名）
    pub fn rank_by_quantity(&self, jobs: &[ProductionJob]) -> Vec<ProcessSummary> {
        Self::rank_summaries(self.summarize(jobs, GroupKey::Process))
    }

    /// 对已有汇总按数量降序重排（数量相同按工序名、日期）
    pub fn rank_summaries(mut summaries: Vec<ProcessSummary>) -> Vec<ProcessSummary> {
        summaries.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then_with(|| a.process.cmp(&b.process))
                .then_with(|| a.date.cmp(&b.date))
        });
        summaries
    }

    /// 延迟工单（delay > 0）及其指标,保持输入顺序
    pub fn delayed_jobs<'a>(
        &self,
        jobs: &'a [ProductionJob],
    ) -> Vec<(&'a ProductionJob, JobMetrics)> {
        jobs.iter()
            .map(|job| (job, self.metrics_engine.evaluate(job)))
            .filter(|(_, m)| m.is_delayed())
            .collect()
    }
}
