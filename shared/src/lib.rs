pub mod account;
pub mod listing;
