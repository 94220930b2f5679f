// ==========================================
// 生产工单追踪 - 时效指标引擎
// ==========================================
// 职责: 时刻字符串 → 分钟偏移; 派生单工单延迟与效率评分
// 输入: 计划开始/计划完成/实际完成（可选实际开始）+ 状态文本
// 输出: JobMetrics（纯函数,相同输入相同输出）
// ==========================================
// 跨夜规则（经验规则,审计前需与业务方确认）:
// 1) 计划完成 < 计划开始 → 计划完成 +1440
// 2) 实际时刻 < 计划开始 且 差值 > 阈值(默认 720) → 实际时刻 +1440
// ==========================================

use crate::config::{MetricsPolicy, MINUTES_PER_DAY};
use crate::domain::job::{JobMetrics, ProductionJob, TimeWindow, TIME_SENTINEL};
use crate::domain::types::StatusClass;
use crate::engine::status::{MarkerStatusClassifier, StatusClassifier};
use std::sync::Arc;
use tracing::instrument;

/// 时刻字符串 → 当日分钟偏移 [0, 1439]
///
/// "-"、空串、缺少 ':' 或越界时返回 None（表示"尚未记录",不是错误）。
/// 秒数部分（HH:MM:SS）被忽略。
pub fn to_minutes(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == TIME_SENTINEL {
        return None;
    }

    let mut parts = trimmed.split(':');
    let hour = parse_clock_part(parts.next()?, 24)?;
    let minute = parse_clock_part(parts.next()?, 60)?;
    Some(hour * 60 + minute)
}

fn parse_clock_part(part: &str, limit: i64) -> Option<i64> {
    let part = part.trim();
    if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: i64 = part.parse().ok()?;
    (value < limit).then_some(value)
}

/// 计划窗口: 完成早于开始时视为跨夜
pub fn plan_window(plan_start: i64, plan_finish: i64) -> TimeWindow {
    if plan_finish < plan_start {
        TimeWindow {
            start: plan_start,
            finish: plan_finish + MINUTES_PER_DAY,
            finish_rolled: true,
        }
    } else {
        TimeWindow {
            start: plan_start,
            finish: plan_finish,
            finish_rolled: false,
        }
    }
}

/// 实际时刻跨夜修正
///
/// 仅当实际时刻早于计划开始超过阈值时才滚动到次日。
/// 实际时刻晚于计划开始时从不回拨到前一日。
pub fn roll_actual(actual: i64, plan_start: i64, threshold_minutes: i64) -> i64 {
    if actual < plan_start && (plan_start - actual) > threshold_minutes {
        actual + MINUTES_PER_DAY
    } else {
        actual
    }
}

/// 计算时效指标（不含完工标志,见 TimeMetricsEngine::evaluate）
pub fn compute_metrics(
    plan_start: &str,
    plan_finish: &str,
    actual_finish: &str,
    actual_start: Option<&str>,
    policy: &MetricsPolicy,
) -> JobMetrics {
    let (start, finish, actual_end) = match (
        to_minutes(plan_start),
        to_minutes(plan_finish),
        to_minutes(actual_finish),
    ) {
        (Some(s), Some(f), Some(a)) => (s, f, a),
        _ => return JobMetrics::insufficient(),
    };

    let threshold = policy.overnight_threshold_minutes;
    let window = plan_window(start, finish);
    let actual_end = roll_actual(actual_end, window.start, threshold);

    let start_delay = actual_start
        .and_then(to_minutes)
        .map(|a| roll_actual(a, window.start, threshold))
        .map(|a| (a - window.start).max(0));

    let planned_duration = window.duration();
    let delay = (actual_end - window.finish).max(0);
    let is_on_time = actual_end <= window.finish;

    if is_on_time {
        return JobMetrics {
            planned_duration: Some(planned_duration),
            delay: Some(0),
            start_delay,
            is_on_time: true,
            score: Some(100),
            deducted: Some(0),
            is_completed: false,
        };
    }

    let score = efficiency_score(planned_duration, delay);
    JobMetrics {
        planned_duration: Some(planned_duration),
        delay: Some(delay),
        start_delay,
        is_on_time: false,
        score: Some(score),
        deducted: Some(100 - score),
        is_completed: false,
    }
}

/// 效率评分 = round(计划时长 / (计划时长 + 延迟) × 100),夹紧到 [0, 100]
///
/// 分母为 0 时取 1。
pub fn efficiency_score(planned_duration: i64, delay: i64) -> i64 {
    let total = (planned_duration + delay).max(1);
    // 整数四舍五入（非负数半数进位）
    let score = (200 * planned_duration + total) / (2 * total);
    score.clamp(0, 100)
}

// ==========================================
// TimeMetricsEngine - 注入策略与状态分类器
// ==========================================
#[derive(Clone)]
pub struct TimeMetricsEngine {
    policy: MetricsPolicy,
    classifier: Arc<dyn StatusClassifier>,
}

impl TimeMetricsEngine {
    /// 按策略创建（状态分类使用策略中的标记）
    pub fn new(policy: MetricsPolicy) -> Self {
        let classifier = Arc::new(MarkerStatusClassifier::from_policy(&policy));
        Self { policy, classifier }
    }

    /// 注入自定义状态分类器
    pub fn with_classifier(policy: MetricsPolicy, classifier: Arc<dyn StatusClassifier>) -> Self {
        Self { policy, classifier }
    }

    pub fn policy(&self) -> &MetricsPolicy {
        &self.policy
    }

    /// 单工单指标
    pub fn evaluate(&self, job: &ProductionJob) -> JobMetrics {
        let actual_start = job.has_actual_start().then_some(job.actual_start.as_str());
        let mut metrics = compute_metrics(
            &job.plan_start,
            &job.plan_finish,
            &job.actual_finish,
            actual_start,
            &self.policy,
        );
        metrics.is_completed = self.classifier.is_completed(&job.status);
        metrics
    }

    /// 批量计算（与输入同序）
    #[instrument(skip(self, jobs), fields(count = jobs.len()))]
    pub fn evaluate_all(&self, jobs: &[ProductionJob]) -> Vec<JobMetrics> {
        jobs.iter().map(|job| self.evaluate(job)).collect()
    }

    pub fn status_class(&self, job: &ProductionJob) -> StatusClass {
        self.classifier.classify(&job.status)
    }
}

impl Default for TimeMetricsEngine {
    fn default() -> Self {
        Self::new(MetricsPolicy::default())
    }
}

impl std::fmt::Debug for TimeMetricsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeMetricsEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
