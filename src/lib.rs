//! Core of "Oops! I Missed": bird animation and flight, the shotgun, and the
//! per-frame round logic.  Terminal I/O lives in the binary.

pub mod assets;
pub mod audio;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod motion;
pub mod score_store;
pub mod sprite;
pub mod weapon;
