//! Reusable view components for admin templates.

pub mod pagination;

pub use pagination::Pagination;
