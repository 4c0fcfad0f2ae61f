pub mod aggregation;
pub mod payload;
pub mod recency;
