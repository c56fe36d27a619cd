pub mod context;
pub mod dump;
pub mod jobs;
pub mod log;
pub mod query;
pub mod repair;
pub mod session;
pub mod state;
