//! Aggregation layer between the vendor clients and the routes.

pub mod clients;
pub mod dashboard;
