pub mod amount;
pub mod date_range;
pub mod edit_window;
pub mod error;
pub mod summary;
pub mod timestamp;
pub mod transaction;
