pub mod operations;
pub mod types;

pub use operations::aggregate;
pub use types::{StatusCounts, StatusTally, StatusTotals, TallyRow};
