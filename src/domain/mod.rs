//! Core domain types and logic.

pub mod order;
pub mod grouper;
pub mod aggregate;
pub mod analytics;
pub mod query;
pub mod meta;
pub mod error;
