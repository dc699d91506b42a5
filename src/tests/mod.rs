// src/tests/mod.rs

//! Tests for _utmplib_.
//!
//! Fixtures shared by the test modules are in [`common`].

pub mod common;
