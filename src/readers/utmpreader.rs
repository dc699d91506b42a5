// src/readers/utmpreader.rs

//! Implements a [`UtmpReader`],
//! the driver of deriving [`UtmpRecord`s] from a [utmp format] file.
//!
//! A utmp file is a plain sequence of fixed-size records, [`UTMP_SZ`] bytes
//! each, with no header. The `UtmpReader` pulls one record-sized block at a
//! time, decodes it with [`decode`], and collects the results keyed by their
//! 1-based position in the file.
//!
//! Policies:
//!
//! * A block that fails to decode aborts the whole read; the error names the
//!   record position.
//! * A trailing partial block is discarded under [`Truncation::Lenient`]
//!   (the default) or is an error under [`Truncation::Strict`]. The count of
//!   discarded bytes is in the [`SummaryUtmpReader`].
//!
//! _XXX: not a rust "Reader"; does not implement trait [`Read`]._
//!
//! [`UtmpReader`]: self::UtmpReader
//! [`UtmpRecord`s]: crate::data::utmp::UtmpRecord
//! [`UTMP_SZ`]: crate::data::utmp::UTMP_SZ
//! [`decode`]: crate::data::utmp::decode
//! [utmp format]: https://en.wikipedia.org/wiki/Utmp
//! [`Read`]: std::io::Read

use crate::common::{
    Count,
    FPath,
    File,
    FileOffset,
    ResultS3,
};
use crate::data::datetime::{
    DateTimeL,
    DateTimeLOpt,
    TimeZoneSrc,
};
use crate::data::utmp::{
    decode,
    UtmpRecord,
    UTMP_SZ,
    UTMP_SZ_FO,
};
use crate::error::{Result, UtmpError};

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Error, ErrorKind, Read};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// UtmpReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Map 1-based record position To [`UtmpRecord`].
///
/// Iterates in file order.
///
/// [`UtmpRecord`]: crate::data::utmp::UtmpRecord
pub type PosToEntry = BTreeMap<Count, UtmpRecord>;

/// [`read_block`] result; `Found` holds the count of bytes read, which is
/// less than the buffer length only at the end of the source.
pub type ResultS3ReadBlock = ResultS3<usize, Error>;

/// How to handle trailing bytes too few to form a record.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Truncation {
    /// Discard the trailing bytes; the read succeeds.
    #[default]
    Lenient,
    /// Fail the read with [`UtmpError::Truncated`].
    Strict,
}

/// A specialized reader that reads [utmp] records from a file or any other
/// byte source and decodes them.
///
/// Each call to [`read`] or [`read_from`] returns a new collection; the
/// reader keeps only statistics about the last read.
///
/// [utmp]: https://en.wikipedia.org/wiki/Utmp
/// [`read`]: self::UtmpReader#method.read
/// [`read_from`]: self::UtmpReader#method.read_from
pub struct UtmpReader {
    path: FPath,
    /// Timezone in which record timestamps are rendered.
    tz: TimeZoneSrc,
    truncation: Truncation,
    /// `Count` of records decoded by the last read.
    entries_processed: Count,
    /// Bytes consumed by the last read, including discarded trailing bytes.
    bytes_read: FileOffset,
    /// Bytes of a trailing partial record discarded by the last read.
    trailing_bytes: usize,
    /// Soonest `time_seconds` datetime decoded by the last read.
    dt_first: DateTimeLOpt,
    /// Latest `time_seconds` datetime decoded by the last read.
    dt_last: DateTimeLOpt,
}

impl fmt::Debug for UtmpReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("UtmpReader")
            .field("Path", &self.path)
            .field("tz", &self.tz)
            .field("truncation", &self.truncation)
            .field("Entries", &self.entries_processed)
            .field("dt_first", &self.dt_first)
            .field("dt_last", &self.dt_last)
            .finish()
    }
}

/// Statistics of the last read of a [`UtmpReader`].
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct SummaryUtmpReader {
    pub utmpreader_path: FPath,
    pub utmpreader_entries: Count,
    pub utmpreader_bytes: FileOffset,
    pub utmpreader_trailing_bytes: usize,
    /// datetime soonest seen
    pub utmpreader_datetime_first: DateTimeLOpt,
    /// datetime latest seen
    pub utmpreader_datetime_last: DateTimeLOpt,
}

impl fmt::Display for SummaryUtmpReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        writeln!(f, "File: {:?}", self.utmpreader_path)?;
        writeln!(f, "   records   : {}", self.utmpreader_entries)?;
        writeln!(f, "   bytes     : {}", self.utmpreader_bytes)?;
        writeln!(f, "   discarded : {}", self.utmpreader_trailing_bytes)?;
        match &self.utmpreader_datetime_first {
            Some(dt) => writeln!(f, "   first     : {}", dt.to_rfc3339())?,
            None => writeln!(f, "   first     : None")?,
        }
        match &self.utmpreader_datetime_last {
            Some(dt) => write!(f, "   last      : {}", dt.to_rfc3339()),
            None => write!(f, "   last      : None"),
        }
    }
}

/// Implement the UtmpReader.
impl UtmpReader {
    /// Create a new `UtmpReader`. The file at `path` is not opened until
    /// [`read`](UtmpReader::read).
    pub fn new(
        path: FPath,
        tz: TimeZoneSrc,
        truncation: Truncation,
    ) -> UtmpReader {
        defñ!("({:?}, {:?}, {:?})", path, tz, truncation);
        UtmpReader {
            path,
            tz,
            truncation,
            entries_processed: 0,
            bytes_read: 0,
            trailing_bytes: 0,
            dt_first: DateTimeLOpt::None,
            dt_last: DateTimeLOpt::None,
        }
    }

    #[inline(always)]
    pub const fn path(&self) -> &FPath {
        &self.path
    }

    #[inline(always)]
    pub const fn tz(&self) -> &TimeZoneSrc {
        &self.tz
    }

    #[inline(always)]
    pub const fn truncation(&self) -> Truncation {
        self.truncation
    }

    /// `Count` of `UtmpRecord`s decoded by the last read.
    #[inline(always)]
    pub const fn count_entries_processed(&self) -> Count {
        self.entries_processed
    }

    /// Open the file at `self.path` and read all records from it.
    ///
    /// The file is closed before this returns, on success or failure.
    pub fn read(&mut self) -> Result<PosToEntry> {
        defn!("({:?})", self.path);
        let file: File = match File::open(&self.path) {
            Ok(val) => val,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                defx!("NotFound {:?}", self.path);
                return Err(UtmpError::SourceNotFound(self.path.clone()));
            }
            Err(err) => {
                defx!("File::open error {}", err);
                return Err(UtmpError::io(&self.path, err));
            }
        };
        // `file` is dropped, thus closed, when `read_from` returns
        let result = self.read_from(file);
        defx!("return is_ok {}", result.is_ok());

        result
    }

    /// Read all records from `source` until it is exhausted.
    ///
    /// Errors name `self.path` as their source.
    pub fn read_from<R: Read>(&mut self, mut source: R) -> Result<PosToEntry> {
        defn!();
        self.entries_processed = 0;
        self.bytes_read = 0;
        self.trailing_bytes = 0;
        self.dt_first = None;
        self.dt_last = None;

        let mut entries = PosToEntry::new();
        let mut buffer = [0u8; UTMP_SZ];
        loop {
            let fileoffset: FileOffset = self.bytes_read;
            match read_block(&mut source, &mut buffer) {
                ResultS3::Done => {
                    defo!("Done at fileoffset {}", fileoffset);
                    break;
                }
                ResultS3::Found(UTMP_SZ) => {
                    self.bytes_read += UTMP_SZ_FO;
                    let position: Count = self.entries_processed + 1;
                    let record: UtmpRecord = match decode(&buffer, &self.tz) {
                        Ok(val) => val,
                        Err(err) => {
                            defx!("decode failed for record {}: {}", position, err);
                            return Err(UtmpError::Decode {
                                path: self.path.clone(),
                                position,
                                fileoffset,
                                source: err,
                            });
                        }
                    };
                    self.dt_first_last_update(record.dt());
                    entries.insert(position, record);
                    self.entries_processed = position;
                }
                ResultS3::Found(len) => {
                    self.bytes_read += len as FileOffset;
                    self.trailing_bytes = len;
                    match self.truncation {
                        Truncation::Lenient => {
                            defo!("discarding {} trailing bytes at offset {}", len, fileoffset);
                            break;
                        }
                        Truncation::Strict => {
                            defx!("Truncated, {} trailing bytes", len);
                            return Err(UtmpError::Truncated {
                                path: self.path.clone(),
                                fileoffset,
                                len,
                            });
                        }
                    }
                }
                ResultS3::Err(err) => {
                    defx!("read_block error {}", err);
                    return Err(UtmpError::io(&self.path, err));
                }
            }
        }
        defx!("return {} entries", entries.len());

        Ok(entries)
    }

    /// Update the soonest and latest datetimes seen.
    fn dt_first_last_update(&mut self, dt: &DateTimeL) {
        match self.dt_first {
            Some(dt_first) if &dt_first <= dt => {}
            _ => self.dt_first = Some(*dt),
        }
        match self.dt_last {
            Some(dt_last) if &dt_last >= dt => {}
            _ => self.dt_last = Some(*dt),
        }
    }

    /// Statistics of the last read.
    pub fn summary(&self) -> SummaryUtmpReader {
        SummaryUtmpReader {
            utmpreader_path: self.path.clone(),
            utmpreader_entries: self.entries_processed,
            utmpreader_bytes: self.bytes_read,
            utmpreader_trailing_bytes: self.trailing_bytes,
            utmpreader_datetime_first: self.dt_first,
            utmpreader_datetime_last: self.dt_last,
        }
    }
}

/// Fill `buffer` from `source`.
///
/// Keeps reading until `buffer` is full or `source` reports end of data.
/// Returns `Done` if no bytes were read at all.
pub fn read_block<R: Read>(source: &mut R, buffer: &mut [u8]) -> ResultS3ReadBlock {
    let mut at: usize = 0;
    while at < buffer.len() {
        match source.read(&mut buffer[at..]) {
            Ok(0) => break,
            Ok(count) => at += count,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return ResultS3::Err(err),
        }
    }
    if at == 0 {
        return ResultS3::Done;
    }

    ResultS3::Found(at)
}

/// Read all records of the file at `path`.
pub fn read_records(
    path: &str,
    tz: TimeZoneSrc,
    truncation: Truncation,
) -> Result<PosToEntry> {
    UtmpReader::new(FPath::from(path), tz, truncation).read()
}
