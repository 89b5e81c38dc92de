/// 关键字段判定 - 仅供调用方做展示优先级/过滤, 不参与匹配决策本身。
const CRITICAL_KEYWORDS: &[&str] = &[
    "policy number",
    "premium",
    "limit",
    "deductible",
    "retention",
    "coverage",
    "insured",
    "effective date",
    "expiration",
    "carrier",
    "endorsement",
    "exclusion",
    "restriction",
    "sublimit",
    "aggregate",
];

const COVERAGE_KEYWORDS: &[&str] = &[
    "limit",
    "coverage",
    "deductible",
    "retention",
    "premium",
    "sublimit",
    "aggregate",
    "occurrence",
    "per claim",
];

const ENDORSEMENT_KEYWORDS: &[&str] = &[
    "endorsement",
    "form",
    "policy form",
    "coverage form",
    "exclusion",
    "limitation",
    "restriction",
];

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

/// 字段名是否属于高审阅优先级字段
pub fn is_critical_field(field_name: &str) -> bool {
    contains_any(field_name, CRITICAL_KEYWORDS)
}

/// 字段名是否为保障金额类字段
pub fn is_coverage_field(field_name: &str) -> bool {
    contains_any(field_name, COVERAGE_KEYWORDS)
}

/// 表名是否为批单/条款类表格
pub fn is_endorsement_table(table_name: &str) -> bool {
    contains_any(table_name, ENDORSEMENT_KEYWORDS)
}
