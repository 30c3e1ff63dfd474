//! Event logging for turn outcomes.

pub mod logger;

pub use logger::EventLogger;
