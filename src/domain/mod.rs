//! Domain entities and value objects of the tree tracking dashboard.

pub mod admin;
pub mod inspection;
pub mod tree;
pub mod types;
pub mod volunteer;
