pub mod adjudicator;
pub mod aligner;
pub mod keywords;
pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod similarity;
pub mod stats;
pub mod synonyms;

pub use adjudicator::{AdjudicationCache, Adjudicator};
pub use aligner::{align_rows, RowAligner};
pub use matcher::{compare_values, FieldMatcher};
pub use parser::parse_fields;
pub use stats::{comparison_status, compute_stats, StatsCalculator};
