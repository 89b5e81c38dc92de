use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::normalize::normalize;

/// 保险行业同义词表 (term -> 变体), 静态封闭集合。
/// 查找是集合成员测试, 无层级、无方向。
pub static INSURANCE_SYNONYMS: &[(&str, &[&str])] = &[
    // 保障类术语
    ("coverage", &["covered", "protection", "insured"]),
    ("limit", &["maximum", "cap", "ceiling"]),
    ("deductible", &["retention", "self-insured retention", "sir"]),
    ("premium", &["cost", "price", "rate"]),
    ("exclusion", &["excluded", "not covered", "exception"]),
    ("endorsement", &["rider", "amendment", "addendum", "form"]),
    ("aggregate", &["total", "combined", "cumulative"]),
    ("occurrence", &["incident", "event", "claim"]),
    ("insured", &["policyholder", "named insured", "assured"]),
    ("carrier", &["insurer", "insurance company", "underwriter"]),
    ("effective date", &["inception date", "start date", "commencement date"]),
    ("expiration date", &["end date", "termination date", "expiry date"]),
    ("sublimit", &["sub-limit", "per item limit", "specific limit"]),
    ("liability", &["legal liability", "third party liability"]),
    ("property", &["physical damage", "property damage"]),
    // 常见缩写
    ("gl", &["general liability", "cgl", "commercial general liability"]),
    ("wc", &["workers compensation", "workers comp"]),
    ("auto", &["automobile", "vehicle", "commercial auto"]),
    ("e&o", &["errors and omissions", "professional liability"]),
    ("bop", &["businessowners policy", "business owners"]),
    ("epl", &["employment practices liability"]),
    ("d&o", &["directors and officers"]),
    // 是/否 变体
    ("yes", &["y", "included", "covered", "applicable"]),
    ("no", &["n", "not included", "not covered", "not applicable", "n/a"]),
    ("included", &["yes", "covered", "attached"]),
    ("excluded", &["no", "not covered", "not attached"]),
];

/// 预构建的小写集合: term 本身也算自己集合的成员
static SYNONYM_SETS: Lazy<Vec<HashSet<&'static str>>> = Lazy::new(|| {
    INSURANCE_SYNONYMS
        .iter()
        .map(|(term, synonyms)| {
            let mut set: HashSet<&'static str> = synonyms.iter().copied().collect();
            set.insert(term);
            set
        })
        .collect()
});

/// 两个值是否共现于同一术语集合 (Synonym 置信), 对称
pub fn are_synonyms(val1: &str, val2: &str) -> bool {
    let lower1 = normalize(val1);
    let lower2 = normalize(val2);
    SYNONYM_SETS
        .iter()
        .any(|set| set.contains(lower1.as_str()) && set.contains(lower2.as_str()))
}
