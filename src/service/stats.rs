use indexmap::IndexSet;

use crate::config::MatchConfig;
use crate::models::{ComparisonStats, FieldStatus, MatchOutcome, ParsedFields, RowAlignment};

use super::aligner::RowAligner;
use super::matcher::FieldMatcher;

/// 汇总统计服务 - 遍历表头与对齐后的表格, 按字段/单元格计数。
/// 不变式: matches + diffs + missing == total。
#[derive(Debug, Clone, Default)]
pub struct StatsCalculator {
    config: MatchConfig,
    matcher: FieldMatcher,
    aligner: RowAligner,
}

impl StatsCalculator {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            matcher: FieldMatcher::new(config.clone()),
            aligner: RowAligner::new(config.clone()),
            config,
        }
    }

    /// 调用方视角的单字段分类: Match/Ambiguous 记 match,
    /// 非对称空值记 missing, 其余记 diff
    pub fn comparison_status(&self, val1: &str, val2: &str) -> FieldStatus {
        let result = self.matcher.compare(val1, val2);
        match result.outcome {
            MatchOutcome::Match | MatchOutcome::Ambiguous => FieldStatus::Match,
            MatchOutcome::Different => {
                if val1.trim().is_empty() || val2.trim().is_empty() {
                    FieldStatus::Missing
                } else {
                    FieldStatus::Diff
                }
            }
        }
    }

    pub fn compute_stats(&self, fields1: &ParsedFields, fields2: &ParsedFields) -> ComparisonStats {
        let mut stats = ComparisonStats::default();
        self.tally_headers(fields1, fields2, &mut stats);
        self.tally_tables(fields1, fields2, &mut stats);
        stats
    }

    fn tally_headers(
        &self,
        fields1: &ParsedFields,
        fields2: &ParsedFields,
        stats: &mut ComparisonStats,
    ) {
        let names: IndexSet<&String> = fields1.headers.keys().chain(fields2.headers.keys()).collect();

        for name in names {
            if self.config.should_ignore_field(name) {
                continue;
            }
            let val1 = fields1.header_value(name);
            let val2 = fields2.header_value(name);
            // 双侧皆空的字段不计入 total
            if val1.trim().is_empty() && val2.trim().is_empty() {
                continue;
            }

            stats.total += 1;
            if !fields1.headers.contains_key(name) || !fields2.headers.contains_key(name) {
                stats.missing += 1;
            } else {
                match self.matcher.compare(val1, val2).outcome {
                    MatchOutcome::Match | MatchOutcome::Ambiguous => stats.matches += 1,
                    MatchOutcome::Different => stats.diffs += 1,
                }
            }
        }
    }

    fn tally_tables(
        &self,
        fields1: &ParsedFields,
        fields2: &ParsedFields,
        stats: &mut ComparisonStats,
    ) {
        let empty: Vec<_> = Vec::new();
        let names: IndexSet<&String> = fields1.tables.keys().chain(fields2.tables.keys()).collect();

        for name in names {
            let table1 = fields1.tables.get(name).unwrap_or(&empty);
            let table2 = fields2.tables.get(name).unwrap_or(&empty);
            for alignment in self.aligner.align(table1, table2) {
                self.tally_alignment(&alignment, stats);
            }
        }
    }

    /// 对齐后的一对行: 两侧列名并集逐格计数, 缺行一侧按空值处理
    fn tally_alignment(&self, alignment: &RowAlignment, stats: &mut ComparisonStats) {
        let columns: IndexSet<&String> = alignment
            .row1
            .iter()
            .flat_map(|r| r.columns.keys())
            .chain(alignment.row2.iter().flat_map(|r| r.columns.keys()))
            .collect();

        for column in columns {
            let val1 = alignment
                .row1
                .as_ref()
                .map(|r| r.column_value(column))
                .unwrap_or("");
            let val2 = alignment
                .row2
                .as_ref()
                .map(|r| r.column_value(column))
                .unwrap_or("");

            stats.total += 1;
            if val1.trim().is_empty() || val2.trim().is_empty() {
                stats.missing += 1;
            } else {
                match self.matcher.compare(val1, val2).outcome {
                    MatchOutcome::Match | MatchOutcome::Ambiguous => stats.matches += 1,
                    MatchOutcome::Different => stats.diffs += 1,
                }
            }
        }
    }
}

/// 默认阈值下的汇总统计
pub fn compute_stats(fields1: &ParsedFields, fields2: &ParsedFields) -> ComparisonStats {
    StatsCalculator::default().compute_stats(fields1, fields2)
}

/// 默认阈值下的单字段分类
pub fn comparison_status(val1: &str, val2: &str) -> FieldStatus {
    StatsCalculator::default().comparison_status(val1, val2)
}
