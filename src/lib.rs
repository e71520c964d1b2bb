//! Versioned saves for Maya scene files.
//!
//! The heart of the crate is [`version::VersionIncrementer`], which turns a base
//! name such as `A01_Smith_John_wip_01` into the next free version in a
//! directory. [`fs`] wraps it into save, save-as and backup operations, and
//! [`history`] keeps a JSON log of every save.

pub mod config;
pub mod consts;
pub mod fs;
pub mod history;
pub mod name;
pub mod schedule;
pub mod types;
pub mod version;

pub use fs::increment;
pub use version::{IncrementError, VersionIncrementer};
