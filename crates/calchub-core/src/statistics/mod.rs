pub mod descriptive;
pub mod probability;
pub mod zscore;
