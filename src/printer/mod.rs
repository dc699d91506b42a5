// src/printer/mod.rs

//! Export decoded records as text.

pub mod exporter;
