//! Use cases (application services)

pub mod guardian;
