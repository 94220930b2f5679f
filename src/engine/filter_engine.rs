// ==========================================
// 生产工单追踪 - 筛选引擎
// ==========================================
// 职责: 按 日期/工序/工单名/延迟状态 筛选工单,并计算级联选项列表
// 规则:
// - 各维度 AND 组合,纯函数,不修改输入
// - 工序选项基于"仅按日期筛选"的集合
// - 工单名选项基于"按日期+工序筛选"的集合
// - 已选值不在当前选项中时重置为 ALL
// ==========================================

use crate::domain::job::{JobMetrics, ProductionJob};
use crate::domain::types::{DelayFilter, FilterState, Selector};
use crate::engine::time_metrics::TimeMetricsEngine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

// ==========================================
// FacetLists - 级联选项列表（升序去重）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetLists {
    pub dates: Vec<String>,
    pub processes: Vec<String>,
    pub job_names: Vec<String>,
}

impl FacetLists {
    pub fn offers_process(&self, process: &str) -> bool {
        self.processes.iter().any(|p| p == process)
    }

    pub fn offers_job_name(&self, job_name: &str) -> bool {
        self.job_names.iter().any(|j| j == job_name)
    }
}

// ==========================================
// FilterEngine - 筛选引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    metrics_engine: TimeMetricsEngine,
}

impl FilterEngine {
    pub fn new(metrics_engine: TimeMetricsEngine) -> Self {
        Self { metrics_engine }
    }

    /// 应用全部筛选条件,保持原有顺序
    #[instrument(skip(self, jobs, filters), fields(count = jobs.len()))]
    pub fn apply(&self, jobs: &[ProductionJob], filters: &FilterState) -> Vec<ProductionJob> {
        if filters.is_unfiltered() {
            return jobs.to_vec();
        }

        let result: Vec<ProductionJob> = jobs
            .iter()
            .filter(|job| self.matches(job, filters))
            .cloned()
            .collect();

        debug!(matched = result.len(), "筛选完成");
        result
    }

    /// 单工单是否满足全部条件
    pub fn matches(&self, job: &ProductionJob, filters: &FilterState) -> bool {
        filters.date.matches(&job.date)
            && filters.process.matches(job.process_key())
            && filters.job_name.matches(&job.job_name)
            && (filters.delay == DelayFilter::All
                || delay_matches(filters.delay, &self.metrics_engine.evaluate(job)))
    }

    /// 计算级联选项
    pub fn facets(&self, jobs: &[ProductionJob], filters: &FilterState) -> FacetLists {
        let dates = distinct(jobs.iter().map(|j| j.date.as_str()));

        let processes = distinct(
            jobs.iter()
                .filter(|j| filters.date.matches(&j.date))
                .map(ProductionJob::process_key),
        );

        let job_names = distinct(
            jobs.iter()
                .filter(|j| {
                    filters.date.matches(&j.date) && filters.process.matches(j.process_key())
                })
                .map(|j| j.job_name.as_str()),
        );

        FacetLists {
            dates,
            processes,
            job_names,
        }
    }

    /// 校正筛选状态: 不再可选的日期/工序/工单名重置为 ALL
    ///
    /// 返回 (校正后的状态, 对应的选项列表)
    pub fn reconcile(
        &self,
        jobs: &[ProductionJob],
        filters: &FilterState,
    ) -> (FilterState, FacetLists) {
        let mut next = filters.clone();

        let dates = distinct(jobs.iter().map(|j| j.date.as_str()));
        let date_gone = next
            .date
            .as_exact()
            .is_some_and(|date| !dates.iter().any(|d| d == date));
        if date_gone {
            debug!(date = %next.date, "所选日期已不可用，重置为 ALL");
            next.date = Selector::All;
        }

        // 工序先校正,工单名选项依赖工序
        let facets = self.facets(jobs, &next);
        let process_gone = next
            .process
            .as_exact()
            .is_some_and(|process| !facets.offers_process(process));
        if process_gone {
            debug!(process = %next.process, "所选工序已不可用，重置为 ALL");
            next.process = Selector::All;
        }

        let facets = self.facets(jobs, &next);
        let job_name_gone = next
            .job_name
            .as_exact()
            .is_some_and(|job_name| !facets.offers_job_name(job_name));
        if job_name_gone {
            debug!(job_name = %next.job_name, "所选工单名已不可用，重置为 ALL");
            next.job_name = Selector::All;
        }

        (next, facets)
    }
}

/// 延迟条件: 未评分工单既不属于 DELAYED 也不属于 ON_TIME
fn delay_matches(filter: DelayFilter, metrics: &JobMetrics) -> bool {
    match (filter, metrics.score, metrics.delay) {
        (DelayFilter::All, _, _) => true,
        (_, None, _) | (_, _, None) => false,
        (DelayFilter::Delayed, Some(_), Some(delay)) => delay > 0,
        (DelayFilter::OnTime, Some(_), Some(delay)) => delay == 0,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
