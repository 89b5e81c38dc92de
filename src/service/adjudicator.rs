use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;

use crate::config::{AdjudicatorConfig, MatchConfig};
use crate::models::{
    AdjudicatedMatch, Confidence, FieldPair, MatchOutcome, MatchResult, MatchSource,
};

use super::keywords::is_critical_field;
use super::matcher::FieldMatcher;

/// 裁决结果缓存 - 由调用方持有并显式传入, 不做模块级全局状态。
/// 容量策略: 写满即整体清空 (结果可随时由同步引擎重算, 不值得精细淘汰)。
#[derive(Debug)]
pub struct AdjudicationCache {
    entries: DashMap<String, AdjudicatedMatch>,
    capacity: usize,
}

impl AdjudicationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, key: &str) -> Option<AdjudicatedMatch> {
        self.entries.get(key).map(|e| e.clone())
    }

    pub fn insert(&self, key: String, value: AdjudicatedMatch) {
        if self.entries.len() >= self.capacity {
            tracing::debug!("[Adjudicator] 缓存达到容量 {}, 整体清空", self.capacity);
            self.entries.clear();
        }
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 发给外部裁决服务的请求体
#[derive(Debug, Serialize)]
struct AdjudicationRequest<'a> {
    field_name: &'a str,
    value_1: &'a str,
    value_2: &'a str,
}

/// 外部裁决装饰器 - 包在同步匹配引擎外面的异步层。
/// 只对本地 Ambiguous 或关键字段发起远程调用; 任何失败
/// (超时/配额/响应不合法) 都静默回退到同步结果, 不重试、不向上抛。
pub struct Adjudicator {
    config: AdjudicatorConfig,
    matcher: FieldMatcher,
    client: Option<reqwest::Client>,
}

impl Adjudicator {
    pub fn new(config: AdjudicatorConfig, match_config: MatchConfig) -> Self {
        let client = if config.endpoint.is_some() {
            reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .ok()
        } else {
            None
        };
        if client.is_none() {
            tracing::info!("[Adjudicator] 未配置 endpoint, 裁决层停用, 全部走同步引擎");
        }
        Self {
            config,
            matcher: FieldMatcher::new(match_config),
            client,
        }
    }

    pub fn enabled(&self) -> bool {
        self.client.is_some()
    }

    /// 单对裁决: 先出同步结果, 需要时再问外部服务
    pub async fn adjudicate(&self, cache: &AdjudicationCache, pair: &FieldPair) -> AdjudicatedMatch {
        let local = self.matcher.compare(&pair.val1, &pair.val2);
        if !self.should_adjudicate(&local, &pair.field_name) {
            return AdjudicatedMatch::rule_based(local);
        }

        let key = cache_key(pair);
        if let Some(hit) = cache.get(&key) {
            return hit;
        }

        match self.call_remote(pair).await {
            Ok(remote) => {
                cache.insert(key, remote.clone());
                remote
            }
            Err(e) => {
                tracing::warn!(
                    "[Adjudicator] 字段 {} 远程裁决失败, 回退同步结果: {}",
                    pair.field_name,
                    e
                );
                AdjudicatedMatch::fallback(local)
            }
        }
    }

    /// 批量裁决: 按 batch_size 分块并发, 块间停顿以尊重外部限流
    pub async fn compare_batch(
        &self,
        cache: &AdjudicationCache,
        pairs: &[FieldPair],
    ) -> Vec<AdjudicatedMatch> {
        let batch_size = self.config.batch_size.max(1);
        let mut results = Vec::with_capacity(pairs.len());

        for (idx, chunk) in pairs.chunks(batch_size).enumerate() {
            if idx > 0 && self.enabled() {
                tokio::time::sleep(Duration::from_millis(self.config.batch_delay_ms)).await;
            }
            let batch = join_all(chunk.iter().map(|pair| self.adjudicate(cache, pair))).await;
            results.extend(batch);

            if self.enabled() {
                tracing::info!(
                    "[Adjudicator] 批次进度: {}/{}",
                    results.len(),
                    pairs.len()
                );
            }
        }

        results
    }

    fn should_adjudicate(&self, local: &MatchResult, field_name: &str) -> bool {
        self.enabled()
            && (local.confidence == Confidence::Ambiguous || is_critical_field(field_name))
    }

    async fn call_remote(
        &self,
        pair: &FieldPair,
    ) -> Result<AdjudicatedMatch, Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.as_ref().ok_or("adjudicator disabled")?;
        let endpoint = self.config.endpoint.as_deref().ok_or("adjudicator disabled")?;

        let mut request = client.post(endpoint).json(&AdjudicationRequest {
            field_name: &pair.field_name,
            value_1: &pair.val1,
            value_2: &pair.val2,
        });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let text = request.send().await?.error_for_status()?.text().await?;
        shape_response(&text).ok_or_else(|| "裁决响应不合法".into())
    }
}

fn cache_key(pair: &FieldPair) -> String {
    format!("{}:{}:{}", pair.field_name, pair.val1, pair.val2)
}

/// 响应整形: 外部结果只作参考, 必须校验后才能采信。
/// 依次尝试: 裸/围栏/夹杂文本中的 JSON 对象 -> 关键词文本分析;
/// 都失败返回 None, 由调用方回退同步结果。
pub fn shape_response(text: &str) -> Option<AdjudicatedMatch> {
    if let Some(value) = extract_json_object(text) {
        if let Some(shaped) = shape_structured(&value) {
            return Some(shaped);
        }
    }
    shape_text_fallback(text)
}

/// 从任意文本中抠出第一个配平的 JSON 对象
fn extract_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..start + offset + ch.len_utf8()];
                    return serde_json::from_str(candidate).ok();
                }
            }
            _ => {}
        }
    }
    None
}

fn shape_structured(value: &Value) -> Option<AdjudicatedMatch> {
    let outcome = match value.get("match")? {
        Value::Bool(true) => MatchOutcome::Match,
        Value::Bool(false) => MatchOutcome::Different,
        Value::String(s) if s == "ambiguous" => MatchOutcome::Ambiguous,
        _ => return None,
    };

    let confidence = match outcome {
        MatchOutcome::Match => match value.get("confidence").and_then(Value::as_str) {
            Some("exact") => Confidence::Exact,
            _ => Confidence::High,
        },
        MatchOutcome::Ambiguous => Confidence::Ambiguous,
        MatchOutcome::Different => Confidence::Different,
    };

    let similarity = value
        .get("similarity")
        .and_then(Value::as_f64)
        .filter(|s| (0.0..=1.0).contains(s));
    let reasoning = value
        .get("reasoning")
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    Some(AdjudicatedMatch {
        result: MatchResult {
            outcome,
            confidence,
            similarity,
        },
        reasoning,
        source: MatchSource::Adjudicator,
    })
}

const MATCH_INDICATORS: &[&str] = &["same", "equal", "identical", "match", "equivalent"];
const NO_MATCH_INDICATORS: &[&str] = &["different", "not equal", "not the same", "no match", "distinct"];

/// JSON 拿不到时的文本分析: 指示词只出现一边才采信
fn shape_text_fallback(text: &str) -> Option<AdjudicatedMatch> {
    let lower = text.to_lowercase();
    let has_match = MATCH_INDICATORS.iter().any(|w| lower.contains(w));
    let has_no_match = NO_MATCH_INDICATORS.iter().any(|w| lower.contains(w));

    let (outcome, confidence) = match (has_match, has_no_match) {
        (true, false) => (MatchOutcome::Match, Confidence::High),
        (false, true) => (MatchOutcome::Different, Confidence::Different),
        _ => return None,
    };

    Some(AdjudicatedMatch {
        result: MatchResult::new(outcome, confidence),
        reasoning: Some(format!("文本分析: {}", text.chars().take(100).collect::<String>())),
        source: MatchSource::Adjudicator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(field: &str, v1: &str, v2: &str) -> FieldPair {
        FieldPair {
            field_name: field.to_string(),
            val1: v1.to_string(),
            val2: v2.to_string(),
        }
    }

    #[tokio::test]
    async fn disabled_adjudicator_returns_rule_based_results() {
        let adjudicator = Adjudicator::new(AdjudicatorConfig::default(), MatchConfig::default());
        assert!(!adjudicator.enabled());

        let cache = AdjudicationCache::new(16);
        let result = adjudicator.adjudicate(&cache, &pair("Premium", "$1M", "1000000")).await;
        assert_eq!(result.source, MatchSource::RuleBased);
        assert!(result.result.is_match());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn batch_preserves_order_and_falls_back_synchronously() {
        let adjudicator = Adjudicator::new(AdjudicatorConfig::default(), MatchConfig::default());
        let cache = AdjudicationCache::new(16);
        let pairs = vec![
            pair("Premium", "$1,000", "$2,000"),
            pair("Carrier", "Acme", "Acme"),
            pair("Notes", "building", "builders"),
        ];

        let results = adjudicator.compare_batch(&cache, &pairs).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].result.outcome, MatchOutcome::Different);
        assert_eq!(results[1].result.outcome, MatchOutcome::Match);
        assert_eq!(results[2].result.outcome, MatchOutcome::Ambiguous);
        for r in &results {
            assert_eq!(r.source, MatchSource::RuleBased);
        }
    }

    #[test]
    fn shapes_clean_json_response() {
        let shaped = shape_response(
            r#"{"match": true, "confidence": "exact", "reasoning": "same amount", "similarity": 0.98}"#,
        )
        .unwrap();
        assert_eq!(shaped.result.outcome, MatchOutcome::Match);
        assert_eq!(shaped.result.confidence, Confidence::Exact);
        assert_eq!(shaped.result.similarity, Some(0.98));
        assert_eq!(shaped.source, MatchSource::Adjudicator);
    }

    #[test]
    fn shapes_fenced_and_noisy_json() {
        let fenced = "```json\n{\"match\": \"ambiguous\", \"similarity\": 0.6}\n```";
        let shaped = shape_response(fenced).unwrap();
        assert_eq!(shaped.result.outcome, MatchOutcome::Ambiguous);
        assert_eq!(shaped.result.confidence, Confidence::Ambiguous);

        let noisy = "Here is my analysis: {\"match\": false} hope that helps";
        let shaped = shape_response(noisy).unwrap();
        assert_eq!(shaped.result.outcome, MatchOutcome::Different);
    }

    #[test]
    fn out_of_range_similarity_is_dropped() {
        let shaped = shape_response(r#"{"match": true, "similarity": 7.5}"#).unwrap();
        assert_eq!(shaped.result.similarity, None);
    }

    #[test]
    fn keyword_text_fallback() {
        let shaped = shape_response("The two values are equivalent.").unwrap();
        assert_eq!(shaped.result.outcome, MatchOutcome::Match);

        let shaped = shape_response("These are clearly distinct entries.").unwrap();
        assert_eq!(shaped.result.outcome, MatchOutcome::Different);
    }

    #[test]
    fn garbage_response_is_rejected() {
        assert!(shape_response("").is_none());
        assert!(shape_response("???").is_none());
        // 指示词两边都出现, 不采信
        assert!(shape_response("equal but also different").is_none());
        assert!(shape_response(r#"{"verdict": "yes"}"#).is_none());
    }

    #[test]
    fn cache_clears_when_full() {
        let cache = AdjudicationCache::new(2);
        let entry = AdjudicatedMatch::rule_based(MatchResult::new(
            MatchOutcome::Match,
            Confidence::Exact,
        ));
        cache.insert("a".to_string(), entry.clone());
        cache.insert("b".to_string(), entry.clone());
        assert_eq!(cache.len(), 2);

        cache.insert("c".to_string(), entry);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
    }
}
