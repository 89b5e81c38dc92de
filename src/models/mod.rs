pub mod adjudication;
pub mod field;
pub mod result;

pub use adjudication::{AdjudicatedMatch, FieldPair, MatchSource};
pub use field::{FieldValue, ParsedFields, RawRecord, TableRow};
pub use result::{
    ComparisonStats, Confidence, FieldStatus, MatchOutcome, MatchResult, MatchType, RowAlignment,
};
