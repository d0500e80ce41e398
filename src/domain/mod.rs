//! Core domain types and logic.

pub mod asset;
pub mod batch;
pub mod catalog;
pub mod eligibility;
pub mod error;
pub mod investor;
pub mod portfolio;
pub mod report;
