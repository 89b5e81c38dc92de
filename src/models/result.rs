use serde::{Deserialize, Serialize};

use super::TableRow;

/// 比较结局 (match / ambiguous / different)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Match,
    Ambiguous,
    Different,
}

/// 置信等级 - 显式全序 (different < ambiguous < high < synonym < exact),
/// 替代源系统按字符串隐式排序的做法
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Different,
    Ambiguous,
    High,
    Synonym,
    Exact,
}

/// 单次字段比较结果 (MatchResult) - 纯值, 每次比较新建, 不跨调用缓存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl MatchResult {
    pub fn new(outcome: MatchOutcome, confidence: Confidence) -> Self {
        Self {
            outcome,
            confidence,
            similarity: None,
        }
    }

    pub fn with_similarity(outcome: MatchOutcome, confidence: Confidence, similarity: f64) -> Self {
        Self {
            outcome,
            confidence,
            similarity: Some(similarity),
        }
    }

    pub fn is_match(&self) -> bool {
        self.outcome == MatchOutcome::Match
    }
}

/// 行配对方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Content,
    Position,
    Unmatched,
}

/// 行对齐结果 (RowAlignment) - 每个表名每次比较构建一次, 下游只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowAlignment {
    pub row1: Option<TableRow>,
    pub row2: Option<TableRow>,
    pub match_type: MatchType,
    pub similarity: f64,
}

/// 汇总统计 (ComparisonStats)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonStats {
    pub matches: usize,
    pub diffs: usize,
    pub missing: usize,
    pub total: usize,
}

/// 单字段在调用方视角下的分类 - "missing" 由调用方从非对称空值推导,
/// 引擎本身不产生 missing 结局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    Match,
    Diff,
    Missing,
}
