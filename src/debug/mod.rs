// src/debug/mod.rs

//! The `debug` module is printer macros, and helpers for debug builds and
//! test builds.

#[cfg(test)]
pub mod helpers;

pub mod printers;
