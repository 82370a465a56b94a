#![forbid(unsafe_code)]
//! Filesystem, hashing, and process helpers for nuwrap.

pub mod error;
pub mod fs;
pub mod hash;
pub mod process;
