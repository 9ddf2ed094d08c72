pub mod config;
pub mod contracts;
pub mod filter;
pub mod outage;
