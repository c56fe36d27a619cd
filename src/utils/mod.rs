pub mod clock;
pub mod date;
pub mod formatting;
pub mod table;
pub mod time;

pub use formatting::seconds2hours;
