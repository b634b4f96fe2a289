pub mod base_conversion;
pub mod ratio;
pub mod triangle;
