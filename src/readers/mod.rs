// src/readers/mod.rs

//! "Readers" for _utmplib_.
//!
//! ## Overview of readers
//!
//! * A [`UtmpReader`] reads fixed-size blocks from a file and drives the
//!   [`decode`] function to derive [`UtmpRecord`s].
//!
//! Also see [_Definitions of data_].
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [_Definitions of data_]: crate::data
//! [`Read`]: std::io::Read
//! [`UtmpReader`]: crate::readers::utmpreader::UtmpReader
//! [`decode`]: crate::data::utmp::decode
//! [`UtmpRecord`s]: crate::data::utmp::UtmpRecord

pub mod utmpreader;
