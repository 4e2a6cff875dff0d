pub mod cancel;
pub mod config;
pub mod context;
pub mod engine;
pub mod models;
pub mod monitor;
pub mod predicate;
pub mod rate;
pub mod source;
pub mod watch;
pub mod whitelist;
