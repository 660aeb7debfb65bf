#![forbid(unsafe_code)]

pub mod countdown;
pub mod error;
pub mod model;
pub mod quiz;
pub mod slideshow;
pub mod stage;
pub mod time;

pub use error::SequenceError;
pub use time::Clock;
