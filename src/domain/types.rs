// ==========================================
// 生产工单追踪 - 领域类型定义
// ==========================================
// 职责: 筛选器、状态分类、评分等级等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// "全部" 选择器字面量
pub const ALL: &str = "ALL";

// ==========================================
// 选择器 (Selector)
// ==========================================
// "ALL" 或精确匹配值
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Selector {
    #[default]
    All,
    Exact(String),
}

impl Selector {
    pub fn exact(value: impl Into<String>) -> Self {
        Selector::Exact(value.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Exact(v) => v == value,
        }
    }

    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Selector::All => None,
            Selector::Exact(v) => Some(v.as_str()),
        }
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        if value == ALL {
            Selector::All
        } else {
            Selector::Exact(value.to_string())
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => write!(f, "{}", ALL),
            Selector::Exact(v) => write!(f, "{}", v),
        }
    }
}

// ==========================================
// 延迟筛选 (Delay Filter)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayFilter {
    #[default]
    All,
    Delayed, // delay > 0
    OnTime,  // delay == 0
}

impl fmt::Display for DelayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayFilter::All => write!(f, "ALL"),
            DelayFilter::Delayed => write!(f, "DELAYED"),
            DelayFilter::OnTime => write!(f, "ON_TIME"),
        }
    }
}

// ==========================================
// 筛选状态 (Filter State)
// ==========================================
// 各维度独立,逻辑 AND 组合
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub date: Selector,
    pub process: Selector,
    pub job_name: Selector,
    pub delay: DelayFilter,
}

impl FilterState {
    pub fn is_unfiltered(&self) -> bool {
        self.date.is_all()
            && self.process.is_all()
            && self.job_name.is_all()
            && self.delay == DelayFilter::All
    }
}

// ==========================================
// 状态分类 (Status Class)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusClass {
    Completed,
    InProgress,
    Pending, // 其他（等待/未开始等）
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusClass::Completed => write!(f, "COMPLETED"),
            StatusClass::InProgress => write!(f, "IN_PROGRESS"),
            StatusClass::Pending => write!(f, "PENDING"),
        }
    }
}

// ==========================================
// 评分等级 (Score Band)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreBand {
    Unscored,
    Poor,       // < 80
    Acceptable, // 80..95
    Excellent,  // >= 95
}

impl ScoreBand {
    pub fn from_score(score: Option<i64>) -> Self {
        match score {
            None => ScoreBand::Unscored,
            Some(s) if s >= 95 => ScoreBand::Excellent,
            Some(s) if s >= 80 => ScoreBand::Acceptable,
            Some(_) => ScoreBand::Poor,
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Unscored => write!(f, "UNSCORED"),
            ScoreBand::Poor => write!(f, "POOR"),
            ScoreBand::Acceptable => write!(f, "ACCEPTABLE"),
            ScoreBand::Excellent => write!(f, "EXCELLENT"),
        }
    }
}

// ==========================================
// 汇总分组键 (Group Key)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupKey {
    #[default]
    Process,
    ProcessAndDate,
}
