pub mod auth;
pub mod branch;
pub mod i18n;
