use crate::config::MatchConfig;
use crate::models::{Confidence, MatchOutcome, MatchResult};

use super::normalize::{
    currency_amounts_equal, normalize, parse_currency, parse_flexible_date, parse_percentage,
    percentages_equal,
};
use super::similarity::{is_expansion, string_similarity, token_overlap};
use super::synonyms::are_synonyms;

/// 字段匹配服务 - §纯函数决策链, 无 I/O, 对任意字符串输入全定义。
/// 决策顺序: 归一化精确 -> 空值规则 -> 类型化等值 (日期/金额/百分比)
/// -> 同义词 -> 词元重合/包含 -> 编辑距离兜底。
#[derive(Debug, Clone, Default)]
pub struct FieldMatcher {
    config: MatchConfig,
}

impl FieldMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// 比较一对字段值, 首个适用规则胜出
    pub fn compare(&self, val1: &str, val2: &str) -> MatchResult {
        let norm1 = normalize(val1);
        let norm2 = normalize(val2);

        // 1. 归一化后相同 (含双空)
        if norm1 == norm2 {
            return MatchResult::new(MatchOutcome::Match, Confidence::Exact);
        }

        // 2. 恰有一侧为空 - 调用方据此归类为 missing
        if norm1.is_empty() || norm2.is_empty() {
            return MatchResult::new(MatchOutcome::Different, Confidence::Exact);
        }

        // 3. 类型化等值: 两侧都解析成同一类型才适用, 否则跳过该类型。
        //    "2,500,000" 与 "$2.5M" 词面毫无关联, 必须先于模糊匹配判断。
        if let Some(equal) = dates_equal(&norm1, &norm2)
            .or_else(|| currencies_equal(&norm1, &norm2))
            .or_else(|| percents_equal(&norm1, &norm2))
        {
            return if equal {
                MatchResult::new(MatchOutcome::Match, Confidence::Exact)
            } else {
                MatchResult::new(MatchOutcome::Different, Confidence::Different)
            };
        }

        // 4. 行业同义词
        if are_synonyms(&norm1, &norm2) {
            return MatchResult::new(MatchOutcome::Match, Confidence::Synonym);
        }

        // 5. 词元重合 / 扩写包含
        let overlap = token_overlap(&norm1, &norm2);
        if overlap > self.config.high_similarity {
            return MatchResult::new(MatchOutcome::Match, Confidence::High);
        }
        if overlap > self.config.ambiguous_similarity {
            return MatchResult::with_similarity(
                MatchOutcome::Ambiguous,
                Confidence::Ambiguous,
                overlap,
            );
        }
        if is_expansion(
            &norm1,
            &norm2,
            self.config.containment_length_ratio,
            self.config.containment_token_ratio,
        ) {
            return MatchResult::new(MatchOutcome::Match, Confidence::High);
        }

        // 6. 编辑距离兜底
        let similarity = string_similarity(&norm1, &norm2);
        if similarity > self.config.high_similarity {
            return MatchResult::new(MatchOutcome::Match, Confidence::High);
        }
        if similarity > self.config.ambiguous_similarity {
            return MatchResult::with_similarity(
                MatchOutcome::Ambiguous,
                Confidence::Ambiguous,
                similarity,
            );
        }

        MatchResult::new(MatchOutcome::Different, Confidence::Different)
    }
}

/// 默认阈值下的单次比较
pub fn compare_values(val1: &str, val2: &str) -> MatchResult {
    FieldMatcher::default().compare(val1, val2)
}

fn dates_equal(norm1: &str, norm2: &str) -> Option<bool> {
    let d1 = parse_flexible_date(norm1)?;
    let d2 = parse_flexible_date(norm2)?;
    Some(d1 == d2)
}

fn currencies_equal(norm1: &str, norm2: &str) -> Option<bool> {
    let c1 = parse_currency(norm1)?;
    let c2 = parse_currency(norm2)?;
    Some(currency_amounts_equal(&c1, &c2))
}

fn percents_equal(norm1: &str, norm2: &str) -> Option<bool> {
    let p1 = parse_percentage(norm1)?;
    let p2 = parse_percentage(norm2)?;
    Some(percentages_equal(p1, p2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(a: &str, b: &str) -> MatchResult {
        compare_values(a, b)
    }

    #[test]
    fn reflexive_match_is_exact() {
        for v in ["", "Policy ABC-123", "$1,000,000", "  General  Liability "] {
            let r = compare(v, v);
            assert_eq!(r.outcome, MatchOutcome::Match);
            assert_eq!(r.confidence, Confidence::Exact);
        }
    }

    #[test]
    fn comparison_is_symmetric() {
        let pairs = [
            ("$1M", "1000000"),
            ("GL", "General Liability"),
            ("building", "builders"),
            ("01/15/2025", "January 15, 2025"),
            ("alpha", ""),
            ("something", "else entirely"),
        ];
        for (a, b) in pairs {
            assert_eq!(compare(a, b).outcome, compare(b, a).outcome, "{a} vs {b}");
        }
    }

    #[test]
    fn empty_pair_rules() {
        let both = compare("", "");
        assert_eq!(both.outcome, MatchOutcome::Match);
        assert_eq!(both.confidence, Confidence::Exact);

        let one = compare("x", "");
        assert_eq!(one.outcome, MatchOutcome::Different);
        assert_eq!(one.confidence, Confidence::Exact);

        // 纯空白等同于空
        let blank = compare("   ", "x");
        assert_eq!(blank.outcome, MatchOutcome::Different);
        assert_eq!(blank.confidence, Confidence::Exact);
    }

    #[test]
    fn date_equivalence() {
        assert!(compare("01/15/2025", "January 15, 2025").is_match());
        assert!(compare("2025-01-15", "15 Jan 2025").is_match());
        let diff = compare("01/15/2025", "01/16/2025");
        assert_eq!(diff.outcome, MatchOutcome::Different);
        assert_eq!(diff.confidence, Confidence::Different);
    }

    #[test]
    fn currency_equivalence() {
        assert!(compare("$2,500,000", "2500000").is_match());
        assert!(compare("$1M", "1000000").is_match());
        assert!(compare("one million", "$1,000,000").is_match());
        let diff = compare("$1,000", "$2,000");
        assert_eq!(diff.outcome, MatchOutcome::Different);
        assert_eq!(diff.confidence, Confidence::Different);
    }

    #[test]
    fn percentage_equivalence() {
        assert!(compare("2.5%", "0.025").is_match());
        assert!(compare("50%", "fifty percent").is_match());
        assert_eq!(compare("2.5%", "5%").outcome, MatchOutcome::Different);
    }

    #[test]
    fn synonym_match_carries_synonym_confidence() {
        let r = compare("GL", "General Liability");
        assert_eq!(r.outcome, MatchOutcome::Match);
        assert_eq!(r.confidence, Confidence::Synonym);

        let r = compare("Yes", "Included");
        assert_eq!(r.confidence, Confidence::Synonym);
    }

    #[test]
    fn token_reordering_is_high_confidence_match() {
        let r = compare(
            "commercial general liability coverage",
            "coverage commercial general liability",
        );
        assert_eq!(r.outcome, MatchOutcome::Match);
        assert_eq!(r.confidence, Confidence::High);
    }

    #[test]
    fn overlap_band_yields_ambiguous_with_similarity() {
        // 词元 Jaccard = 3/5 = 0.6, 落在 (0.55, 0.75]
        let r = compare(
            "commercial general liability coverage",
            "commercial general liability exclusion",
        );
        assert_eq!(r.outcome, MatchOutcome::Ambiguous);
        assert_eq!(r.confidence, Confidence::Ambiguous);
        let sim = r.similarity.expect("ambiguous carries similarity");
        assert!(sim > 0.55 && sim <= 0.75);
    }

    #[test]
    fn edit_distance_band_yields_ambiguous() {
        // 编辑距离相似度 = 1 - 3/8 = 0.625
        let r = compare("building", "builders");
        assert_eq!(r.outcome, MatchOutcome::Ambiguous);
        assert_eq!(r.confidence, Confidence::Ambiguous);
        assert!((r.similarity.unwrap() - 0.625).abs() < 1e-9);
    }

    #[test]
    fn truncated_clause_matches_via_containment() {
        let r = compare(
            "terrorism coverage",
            "terrorism coverage provided under terrorism risk insurance act program",
        );
        assert_eq!(r.outcome, MatchOutcome::Match);
        assert_eq!(r.confidence, Confidence::High);
    }

    #[test]
    fn unrelated_values_are_different() {
        let r = compare("Flood Sublimit", "Named Windstorm");
        assert_eq!(r.outcome, MatchOutcome::Different);
        assert_eq!(r.confidence, Confidence::Different);
    }

    // 分隔符差异没有同义词规则兜底; 现状是走编辑距离拿到 Match/High
    // (相似度 6/7 ≈ 0.857)。回归测试锁定该行为。
    #[test]
    fn policy_number_separator_variants_resolve_via_fuzzy_fallback() {
        let r = compare("ABC-123", "ABC 123");
        assert_eq!(r.outcome, MatchOutcome::Match);
        assert_eq!(r.confidence, Confidence::High);
    }

    #[test]
    fn total_over_hostile_inputs() {
        let nasty = ["", " ", "\t\n", "你好，世界", "émoji 🚀", "1/2/3/4", "%%%", "$", "-"];
        for a in nasty {
            for b in nasty {
                let _ = compare(a, b); // 不 panic 即可
            }
        }
    }
}
