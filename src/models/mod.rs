pub mod job;
pub mod journal;
pub mod period;
pub mod session;
pub mod state;
