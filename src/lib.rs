pub mod data;
pub mod format;
