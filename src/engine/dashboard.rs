// ==========================================
// 生产工单追踪 - 看板状态
// ==========================================
// 职责: 显式持有 工单集合 + 筛选状态,派生视图
// 红线: 状态不可变,每次变更返回新状态; 派生结果每次全量重算
// ==========================================

use crate::domain::job::{JobMetrics, ProcessSummary, ProductionJob};
use crate::domain::types::{DelayFilter, FilterState, GroupKey, Selector};
use crate::engine::aggregator::Aggregator;
use crate::engine::filter_engine::{FacetLists, FilterEngine};
use crate::engine::time_metrics::TimeMetricsEngine;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};

// ==========================================
// DashboardView - 交给报表/图表/导出等协作方的纯数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub filters: FilterState,
    pub facets: FacetLists,
    // 全部条件筛选后的工单（与 metrics 一一对应）
    pub jobs: Vec<ProductionJob>,
    pub metrics: Vec<JobMetrics>,
    // 日期/工序/工单名筛选后的工序汇总（不含延迟条件）
    pub summaries: Vec<ProcessSummary>,
    pub overall: ProcessSummary,
}

// ==========================================
// DashboardState - 看板状态
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    jobs: Vec<ProductionJob>,
    filters: FilterState,
}

impl DashboardState {
    pub fn new(jobs: Vec<ProductionJob>) -> Self {
        Self {
            jobs,
            filters: FilterState::default(),
        }
    }

    pub fn jobs(&self) -> &[ProductionJob] {
        &self.jobs
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// 追加新批次（拼接,不去重）
    pub fn with_jobs(&self, batch: Vec<ProductionJob>, engine: &FilterEngine) -> Self {
        let mut jobs = self.jobs.clone();
        jobs.extend(batch);
        Self::reconciled(jobs, self.filters.clone(), engine)
    }

    pub fn with_date(&self, date: Selector, engine: &FilterEngine) -> Self {
        let filters = FilterState {
            date,
            ..self.filters.clone()
        };
        Self::reconciled(self.jobs.clone(), filters, engine)
    }

    pub fn with_process(&self, process: Selector, engine: &FilterEngine) -> Self {
        let filters = FilterState {
            process,
            ..self.filters.clone()
        };
        Self::reconciled(self.jobs.clone(), filters, engine)
    }

    pub fn with_job_name(&self, job_name: Selector, engine: &FilterEngine) -> Self {
        let filters = FilterState {
            job_name,
            ..self.filters.clone()
        };
        Self::reconciled(self.jobs.clone(), filters, engine)
    }

    pub fn with_delay_filter(&self, delay: DelayFilter) -> Self {
        Self {
            jobs: self.jobs.clone(),
            filters: FilterState {
                delay,
                ..self.filters.clone()
            },
        }
    }

    pub fn reset_filters(&self) -> Self {
        Self::new(self.jobs.clone())
    }

    fn reconciled(jobs: Vec<ProductionJob>, filters: FilterState, engine: &FilterEngine) -> Self {
        let (filters, _) = engine.reconcile(&jobs, &filters);
        Self { jobs, filters }
    }

    /// 派生当前视图
    pub fn view(&self, metrics_engine: &TimeMetricsEngine) -> DashboardView {
        let _perf = PerfGuard::new("dashboard_view", self.jobs.len());

        let filter_engine = FilterEngine::new(metrics_engine.clone());
        let aggregator = Aggregator::new(metrics_engine.clone());

        let facets = filter_engine.facets(&self.jobs, &self.filters);

        let scoped_filters = FilterState {
            delay: DelayFilter::All,
            ..self.filters.clone()
        };
        let scoped = filter_engine.apply(&self.jobs, &scoped_filters);
        let summaries = aggregator.summarize(&scoped, GroupKey::Process);
        let overall = aggregator.overall(&scoped);

        let jobs = if self.filters.delay == DelayFilter::All {
            scoped
        } else {
            filter_engine.apply(&scoped, &FilterState {
                delay: self.filters.delay,
                ..FilterState::default()
            })
        };
        let metrics = metrics_engine.evaluate_all(&jobs);

        DashboardView {
            filters: self.filters.clone(),
            facets,
            jobs,
            metrics,
            summaries,
            overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_jobs;

    #[test]
    fn test_view_without_filters_keeps_everything() {
        let engine = TimeMetricsEngine::default();
        let state = DashboardState::new(sample_jobs("2026-01-01"));

        let view = state.view(&engine);
        assert_eq!(view.jobs, state.jobs());
        assert_eq!(view.metrics.len(), 3);
        assert_eq!(view.summaries.len(), 3);
        assert_eq!(view.overall.count, 3);
        assert_eq!(view.facets.processes, vec!["CTT", "STAMP", "STK"]);
    }

    #[test]
    fn test_process_change_resets_job_name() {
        let engine = TimeMetricsEngine::default();
        let filter_engine = FilterEngine::new(engine.clone());
        let state = DashboardState::new(sample_jobs("2026-01-01"))
            .with_process(Selector::exact("STAMP"), &filter_engine)
            .with_job_name(Selector::exact("SPTR-161268-R5"), &filter_engine);
        assert_eq!(state.filters().job_name, Selector::exact("SPTR-161268-R5"));

        let state = state.with_process(Selector::exact("STK"), &filter_engine);
        assert_eq!(state.filters().job_name, Selector::All);

        let view = state.view(&engine);
        assert_eq!(view.jobs.len(), 1);
        assert_eq!(view.jobs[0].process, "STK");
    }

    #[test]
    fn test_delay_filter_does_not_shrink_summaries() {
        let engine = TimeMetricsEngine::default();
        let state = DashboardState::new(sample_jobs("2026-01-01")).with_delay_filter(DelayFilter::OnTime);

        let view = state.view(&engine);
        // 仅 STAMP 已评分且准时
        assert_eq!(view.jobs.len(), 1);
        assert_eq!(view.summaries.len(), 3);
    }

    #[test]
    fn test_state_transitions_do_not_mutate_original() {
        let filter_engine = FilterEngine::default();
        let original = DashboardState::new(sample_jobs("2026-01-01"));
        let changed = original.with_date(Selector::exact("2026-01-01"), &filter_engine);

        assert!(original.filters().date.is_all());
        assert_eq!(changed.filters().date, Selector::exact("2026-01-01"));
        assert_eq!(changed.reset_filters(), original);
    }
}
