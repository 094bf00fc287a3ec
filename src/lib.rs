pub mod account;
pub mod app;
pub mod auction;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod query;
pub mod scheduler;
pub mod templates;
