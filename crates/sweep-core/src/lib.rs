pub mod config;
pub mod logging;

pub mod coordinator;
pub mod fetch;
pub mod identity;
pub mod outcome;
pub mod pool;
pub mod target;
