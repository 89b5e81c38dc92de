use rayon::prelude::*;

use crate::config::MatchConfig;
use crate::models::{MatchOutcome, MatchType, RowAlignment, TableRow};

use super::matcher::FieldMatcher;

/// 列名带这些关键词时视为行标识列, 打分权重 ×2
const KEY_COLUMN_HINTS: &[&str] = &["description", "coverage", "name", "type", "form"];

fn is_key_column(column: &str) -> bool {
    let lower = column.to_lowercase();
    KEY_COLUMN_HINTS.iter().any(|hint| lower.contains(hint))
}

/// 表格行对齐服务 - 两遍贪心:
/// 先按内容相似度配对 (阈值偏低, 保召回; 错并可由人工纠正, 漏配会掩盖真实匹配),
/// 剩余行按相对位置配对, 最后落单行标记 Unmatched。
#[derive(Debug, Clone, Default)]
pub struct RowAligner {
    matcher: FieldMatcher,
}

impl RowAligner {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            matcher: FieldMatcher::new(config),
        }
    }

    /// 列级行相似度: 只比较两行共有且至少一侧非空的列;
    /// 匹配列贡献权重, ambiguous 列贡献 相似度×权重; 无可比列时为 0。
    pub fn row_similarity(&self, row1: &TableRow, row2: &TableRow) -> f64 {
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (column, field1) in &row1.columns {
            let Some(field2) = row2.columns.get(column) else {
                continue;
            };
            let val1 = field1.value.trim();
            let val2 = field2.value.trim();
            if val1.is_empty() && val2.is_empty() {
                continue;
            }

            let weight = if is_key_column(column) { 2.0 } else { 1.0 };
            let result = self.matcher.compare(val1, val2);
            match result.outcome {
                MatchOutcome::Match => numerator += weight,
                MatchOutcome::Ambiguous => {
                    numerator += result.similarity.unwrap_or(0.5) * weight;
                }
                MatchOutcome::Different => {}
            }
            denominator += weight;
        }

        if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        }
    }

    /// 对齐同名表的两组行, 每行在结果中恰好出现一次
    pub fn align(&self, table1: &[TableRow], table2: &[TableRow]) -> Vec<RowAlignment> {
        let mut alignments = Vec::new();
        let mut matched1 = vec![false; table1.len()];
        let mut unmatched2: Vec<usize> = (0..table2.len()).collect();

        // 第一遍: 内容配对。候选打分相互独立, 并行计算
        for (idx1, row1) in table1.iter().enumerate() {
            if unmatched2.is_empty() {
                break;
            }
            let scores: Vec<f64> = unmatched2
                .par_iter()
                .map(|&idx2| self.row_similarity(row1, &table2[idx2]))
                .collect();

            let mut best: Option<(usize, f64)> = None;
            for (pos, &score) in scores.iter().enumerate() {
                if score > self.matcher.config().row_similarity_threshold
                    && best.map_or(true, |(_, s)| score > s)
                {
                    best = Some((pos, score));
                }
            }

            if let Some((pos, score)) = best {
                let idx2 = unmatched2.remove(pos);
                matched1[idx1] = true;
                alignments.push(RowAlignment {
                    row1: Some(row1.clone()),
                    row2: Some(table2[idx2].clone()),
                    match_type: MatchType::Content,
                    similarity: score,
                });
            }
        }

        // 第二遍: 剩余行按相对位置配对
        let leftover1: Vec<usize> = (0..table1.len()).filter(|&i| !matched1[i]).collect();
        let paired = leftover1.len().min(unmatched2.len());
        for i in 0..paired {
            alignments.push(RowAlignment {
                row1: Some(table1[leftover1[i]].clone()),
                row2: Some(table2[unmatched2[i]].clone()),
                match_type: MatchType::Position,
                similarity: 0.0,
            });
        }

        // 落单行
        for &idx1 in leftover1.iter().skip(paired) {
            alignments.push(RowAlignment {
                row1: Some(table1[idx1].clone()),
                row2: None,
                match_type: MatchType::Unmatched,
                similarity: 0.0,
            });
        }
        for &idx2 in unmatched2.iter().skip(paired) {
            alignments.push(RowAlignment {
                row1: None,
                row2: Some(table2[idx2].clone()),
                match_type: MatchType::Unmatched,
                similarity: 0.0,
            });
        }

        alignments
    }
}

/// 默认阈值下的行对齐
pub fn align_rows(table1: &[TableRow], table2: &[TableRow]) -> Vec<RowAlignment> {
    RowAligner::default().align(table1, table2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;

    fn row(row_id: i64, columns: &[(&str, &str)]) -> TableRow {
        let mut r = TableRow::new(row_id);
        for (name, value) in columns {
            r.columns.insert(
                name.to_string(),
                FieldValue {
                    value: value.to_string(),
                    confidence: 0.9,
                    flag: "high".to_string(),
                },
            );
        }
        r
    }

    fn coverage_table() -> Vec<TableRow> {
        vec![
            row(1, &[("Description", "General Liability"), ("Limit", "$1,000,000")]),
            row(2, &[("Description", "Commercial Auto"), ("Limit", "$500,000")]),
            row(3, &[("Description", "Umbrella"), ("Limit", "$5,000,000")]),
        ]
    }

    #[test]
    fn self_alignment_is_all_content_matches() {
        let table = coverage_table();
        let alignments = align_rows(&table, &table);
        assert_eq!(alignments.len(), table.len());
        for a in &alignments {
            assert_eq!(a.match_type, MatchType::Content);
            assert_eq!(a.similarity, 1.0);
            assert_eq!(a.row1.as_ref().unwrap().row_id, a.row2.as_ref().unwrap().row_id);
        }
    }

    #[test]
    fn reordered_rows_align_by_content() {
        let table1 = coverage_table();
        let mut table2 = coverage_table();
        table2.reverse();

        let alignments = align_rows(&table1, &table2);
        assert_eq!(alignments.len(), 3);
        for a in &alignments {
            assert_eq!(a.match_type, MatchType::Content);
            assert_eq!(
                a.row1.as_ref().unwrap().column_value("Description"),
                a.row2.as_ref().unwrap().column_value("Description")
            );
        }
    }

    #[test]
    fn every_row_appears_exactly_once() {
        let table1 = coverage_table();
        let table2 = vec![
            row(1, &[("Description", "Umbrella"), ("Limit", "$5,000,000")]),
            row(2, &[("Description", "Workers Compensation"), ("Limit", "$1,000,000")]),
        ];

        let alignments = align_rows(&table1, &table2);
        let count1 = alignments.iter().filter(|a| a.row1.is_some()).count();
        let count2 = alignments.iter().filter(|a| a.row2.is_some()).count();
        assert_eq!(count1, table1.len());
        assert_eq!(count2, table2.len());
        assert!(alignments.len() >= table1.len().max(table2.len()));
    }

    #[test]
    fn dissimilar_rows_fall_back_to_position() {
        let table1 = vec![row(1, &[("Description", "Flood")])];
        let table2 = vec![row(1, &[("Description", "Ransom Demand Expense")])];

        let alignments = align_rows(&table1, &table2);
        assert_eq!(alignments.len(), 1);
        assert_eq!(alignments[0].match_type, MatchType::Position);
        assert_eq!(alignments[0].similarity, 0.0);
    }

    #[test]
    fn leftover_rows_become_unmatched_singletons() {
        let table1 = coverage_table();
        let alignments = align_rows(&table1, &[]);
        assert_eq!(alignments.len(), 3);
        for a in &alignments {
            assert_eq!(a.match_type, MatchType::Unmatched);
            assert!(a.row1.is_some());
            assert!(a.row2.is_none());
        }
    }

    #[test]
    fn key_column_weight_carries_row_despite_amount_change() {
        let aligner = RowAligner::default();
        let r1 = row(1, &[("Description", "General Liability"), ("Limit", "$1,000,000")]);
        let r2 = row(7, &[("Description", "General Liability"), ("Limit", "$2,000,000")]);
        // Description (×2) 匹配, Limit (×1) 不匹配: 2/3 ≈ 0.667
        let score = aligner.row_similarity(&r1, &r2);
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
        assert!(score > 0.4);
    }

    #[test]
    fn no_shared_columns_scores_zero() {
        let aligner = RowAligner::default();
        let r1 = row(1, &[("A", "x")]);
        let r2 = row(1, &[("B", "x")]);
        assert_eq!(aligner.row_similarity(&r1, &r2), 0.0);
    }
}
