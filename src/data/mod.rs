// src/data/mod.rs

//! The `data` module is specialized data containers for decoded
//! [`UtmpRecord`]s and their datetimes.
//!
//! ## Definitions of data
//!
//! ### Record
//!
//! A "record" is a fixed-size sequence of bytes in a utmp/wtmp file that:
//!
//! * has the same length, [`UTMP_SZ`], as every other record in the file.
//! * begins at a file offset that is a multiple of `UTMP_SZ`.
//!
//! A record is sliced into a raw [`utmp`] and then interpreted as a
//! [`UtmpRecord`] by [`decode`]. Records are read from a file by a
//! [`UtmpReader`].
//!
//! [`UtmpRecord`]: crate::data::utmp::UtmpRecord
//! [`UTMP_SZ`]: crate::data::utmp::UTMP_SZ
//! [`utmp`]: crate::data::utmp::utmp
//! [`decode`]: crate::data::utmp::decode
//! [`UtmpReader`]: crate::readers::utmpreader::UtmpReader

pub mod datetime;
pub mod utmp;
