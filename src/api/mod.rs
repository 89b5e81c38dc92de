pub mod handlers;

pub use handlers::{
    align, compare, compare_batch, compare_batch_v2, health_check, parse, stats, AppState,
};
