//! Utility functions shared across layers.
//!
//! - [`db_error`] - Mapping of unique constraint violations
//! - [`duration`] - Human-friendly duration parsing (`30d`, `12h`)
//! - [`sanitize`] - Free-text sanitizing and `LIKE` escaping

pub mod db_error;
pub mod duration;
pub mod sanitize;
