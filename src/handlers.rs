pub mod listings;
pub mod reports;
pub mod session;
