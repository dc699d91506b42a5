// src/lib.rs

//! _utmplib_ decodes utmp/wtmp user accounting records and exports them as
//! JSON or YAML.
//!
//! Data flow:
//!
//! raw bytes → [`UtmpReader`] (fixed-size blocks) → [`decode`] →
//! [`PosToEntry`] → [`Exporter`] → standard output or a file
//!
//! [`UtmpReader`]: crate::readers::utmpreader::UtmpReader
//! [`decode`]: crate::data::utmp::decode
//! [`PosToEntry`]: crate::readers::utmpreader::PosToEntry
//! [`Exporter`]: crate::printer::exporter::Exporter

pub mod common;
pub mod data;
pub mod debug;
pub mod error;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
