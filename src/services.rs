pub mod aggregation;
pub mod auth;
pub mod listing;
pub mod report_service;
pub mod scope;
