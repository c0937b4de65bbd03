pub mod academic;
pub mod auth;
pub mod branch;
pub mod finance;
pub mod listing;
pub mod reports;
pub mod snapshot;
