// ==========================================
// 生产工单追踪 - 工单实体与派生记录
// ==========================================
// 职责: 定义规范化工单 (ProductionJob) 及其派生指标
// 红线: 派生记录只由纯函数计算,不单独存储
// ==========================================

use serde::{Deserialize, Serialize};

/// 时间缺失哨兵值（"尚未记录"）
pub const TIME_SENTINEL: &str = "-";

/// 工序为空时的分组/筛选标签
pub const UNKNOWN_PROCESS: &str = "Unknown";

// ==========================================
// ProductionJob - 规范化工单
// ==========================================
// 每个导入文件/工作表生成一次,之后不可变
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductionJob {
    // 批次内唯一（源数据缺失时由自增计数器合成）
    pub id: i64,
    pub job_name: String,
    // 时刻字符串或 "-"
    pub cut_time: String,
    // 非负,解析失败时为 0
    pub quantity: u64,
    pub line: String,
    // 工序/部门（工作表名或平面源的固定标签）
    pub process: String,
    // 自由文本,完工判定见 StatusClassifier
    pub status: String,
    pub plan_start: String,
    pub plan_finish: String,
    pub actual_start: String,
    pub actual_finish: String,
    // 导入日期 YYYY-MM-DD（每个源文件一个）
    pub date: String,
}

impl ProductionJob {
    /// 实际开始是否已记录（非哨兵、非空）
    pub fn has_actual_start(&self) -> bool {
        let v = self.actual_start.trim();
        !v.is_empty() && v != TIME_SENTINEL
    }

    /// 工序键: 去空白,为空时记为 "Unknown"
    ///
    /// 汇总分组、工序选项与工序筛选共用此键
    pub fn process_key(&self) -> &str {
        let p = self.process.trim();
        if p.is_empty() {
            UNKNOWN_PROCESS
        } else {
            p
        }
    }
}

// ==========================================
// TimeWindow - 分钟偏移窗口（派生,不存储）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub finish: i64,
    // finish 是否已滚动到次日（+1440）
    pub finish_rolled: bool,
}

impl TimeWindow {
    pub fn duration(&self) -> i64 {
        self.finish - self.start
    }
}

// ==========================================
// JobMetrics - 单工单时效指标
// ==========================================
// 不变量:
// - 计划开始/计划完成/实际完成任一无法解析 → score = None, delay = 0
// - is_on_time 为 true 时 delay = 0, score = 100, deducted = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetrics {
    pub planned_duration: Option<i64>,
    pub delay: Option<i64>,
    pub start_delay: Option<i64>,
    pub is_on_time: bool,
    pub score: Option<i64>,
    pub deducted: Option<i64>,
    pub is_completed: bool,
}

impl JobMetrics {
    /// 数据不足状态: 延迟记 0,但不评分（不是错误,也不是准时）
    pub fn insufficient() -> Self {
        Self {
            planned_duration: None,
            delay: Some(0),
            start_delay: None,
            is_on_time: false,
            score: None,
            deducted: None,
            is_completed: false,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }

    /// 展示用延迟（数据不足时为 0）
    pub fn delay_or_zero(&self) -> i64 {
        self.delay.unwrap_or(0)
    }

    /// 是否延迟（仅对已评分工单成立）
    pub fn is_delayed(&self) -> bool {
        self.is_scored() && matches!(self.delay, Some(d) if d > 0)
    }
}

// ==========================================
// ProcessSummary - 工序汇总（可按日期再分区）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub process: String,
    // 仅在按日期分区时存在
    pub date: Option<String>,
    pub count: usize,
    pub quantity: u64,
    pub completed: usize,
    // score == 100
    pub on_time_count: usize,
    // score 已定义且 < 100
    pub delayed_count: usize,
    pub scored_count: usize,
    // 组内无任何评分时为 None
    pub avg_score: Option<i64>,
}

impl ProcessSummary {
    pub fn new(process: impl Into<String>, date: Option<String>) -> Self {
        Self {
            process: process.into(),
            date,
            count: 0,
            quantity: 0,
            completed: 0,
            on_time_count: 0,
            delayed_count: 0,
            scored_count: 0,
            avg_score: None,
        }
    }
}
