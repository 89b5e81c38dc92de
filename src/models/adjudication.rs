use serde::{Deserialize, Serialize};

use super::MatchResult;

/// 结果来源 - 区分规则引擎、外部裁决与失败回退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    RuleBased,
    Adjudicator,
    Fallback,
}

/// 待裁决的字段值对
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPair {
    pub field_name: String,
    pub val1: String,
    pub val2: String,
}

/// 裁决后的比较结果 - 外部结果仅作参考, 校验失败时回落到同步结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjudicatedMatch {
    #[serde(flatten)]
    pub result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub source: MatchSource,
}

impl AdjudicatedMatch {
    /// 包装规则引擎的同步结果
    pub fn rule_based(result: MatchResult) -> Self {
        Self {
            result,
            reasoning: None,
            source: MatchSource::RuleBased,
        }
    }

    /// 外部裁决失败后的回退结果
    pub fn fallback(result: MatchResult) -> Self {
        Self {
            result,
            reasoning: None,
            source: MatchSource::Fallback,
        }
    }
}
