//! DTO modules that bridge services with templates and APIs.

pub mod api;
pub mod dashboard;
pub mod inspections;
pub mod master;
pub mod trees;
pub mod volunteers;
