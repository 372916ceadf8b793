//! Utility modules.
//!
//! - [`datetime`] - Timestamp formatting for display

pub mod datetime;
