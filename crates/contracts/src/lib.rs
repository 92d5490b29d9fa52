//! # Contracts
//!
//! Frozen interface contracts shared by every alog crate: the sink trait,
//! the error type, and the configuration model.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Wire format
//! One line per message: `[YYYY-MM-DD HH:MM:SS] - <message>\n`

mod config;
mod error;
mod sink;

pub use config::*;
pub use error::*;
pub use sink::*;
