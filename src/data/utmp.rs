// src/data/utmp.rs

//! Implement the Record Decoder for the Linux [`utmp`] C struct (the same
//! as the [`utmpx`] C struct on Linux) as found in files `/var/run/utmp`,
//! `/var/log/wtmp`, and `/var/log/btmp`.
//!
//! The on-disk record is described by an explicit byte-offset table,
//! [`UTMP_FIELDS`]. Each field is sliced from its offset and interpreted
//! per its type; integers are little-endian. No `repr(C)` struct is
//! overlaid on the bytes so layout and byte order do not depend on the
//! host.
//!
//! [`utmp`]: https://www.man7.org/linux/man-pages/man5/utmp.5.html
//! [`utmpx`]: https://elixir.bootlin.com/glibc/latest/source/sysdeps/gnu/bits/utmpx.h

use crate::common::FileOffset;
use crate::data::datetime::{
    convert_tvsec_datetime,
    datetime_to_string,
    tv_sec_type,
    tv_usec_type,
    DateTimeL,
    TimeZoneSrc,
};
use crate::error::DecodeError;

use std::fmt;
use std::fmt::Write as _;

use ::bstr::ByteSlice; // provides `to_str_lossy` on `[u8]`
use ::const_format::assertcp_eq;
#[allow(unused_imports)]
use ::more_asserts::debug_assert_le;
use ::serde::Serialize;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// record layout
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One field of the on-disk record; `size` bytes beginning at byte
/// `offset` of the record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldLayout {
    /// Name of the field in a decoded [`UtmpRecord`].
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
}

impl FieldLayout {
    pub const fn new(name: &'static str, offset: usize, size: usize) -> FieldLayout {
        FieldLayout { name, offset, size }
    }

    /// One byte past the last byte of this field.
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }

    /// The bytes of this field within `block`.
    ///
    /// `block` must be at least [`UTMP_SZ`] bytes.
    #[inline(always)]
    pub fn slice<'a>(&self, block: &'a [u8]) -> &'a [u8] {
        debug_assert_le!(self.end(), block.len(), "field {:?} beyond block", self.name);
        &block[self.offset..self.end()]
    }
}

pub const UT_LINESIZE: usize = 32;
pub const UT_IDSIZE: usize = 4;
pub const UT_NAMESIZE: usize = 32;
pub const UT_HOSTSIZE: usize = 256;
/// Count of 32-bit words in `ut_addr_v6`.
pub const UT_ADDRWORDS: usize = 4;
pub const UT_RESERVEDSIZE: usize = 20;

pub const UT_TYPE: FieldLayout = FieldLayout::new("type", 0, 2);
pub const UT_PID: FieldLayout = FieldLayout::new("pid", 4, 4);
pub const UT_LINE: FieldLayout = FieldLayout::new("line", 8, UT_LINESIZE);
pub const UT_ID: FieldLayout = FieldLayout::new("id", 40, UT_IDSIZE);
pub const UT_USER: FieldLayout = FieldLayout::new("user", 44, UT_NAMESIZE);
pub const UT_HOST: FieldLayout = FieldLayout::new("host", 76, UT_HOSTSIZE);
pub const UT_EXIT_TERMINATION: FieldLayout = FieldLayout::new("exit_termination", 332, 2);
pub const UT_EXIT_EXIT: FieldLayout = FieldLayout::new("exit_exit", 334, 2);
pub const UT_SESSION: FieldLayout = FieldLayout::new("session", 336, 4);
pub const UT_TV_SEC: FieldLayout = FieldLayout::new("time_seconds", 340, 4);
pub const UT_TV_USEC: FieldLayout = FieldLayout::new("time_microseconds", 344, 4);
pub const UT_ADDR_V6: FieldLayout = FieldLayout::new("address", 348, UT_ADDRWORDS * 4);
pub const UT_RESERVED: FieldLayout = FieldLayout::new("reserved", 364, UT_RESERVEDSIZE);

/// All fields of the record in on-disk order.
///
/// ```text
/// utmp                         sizeof 384
/// utmp.ut_type           @  0 sizeof   2
///                        @  2 sizeof   2 (alignment gap)
/// utmp.ut_pid            @  4 sizeof   4
/// utmp.ut_line           @  8 sizeof  32
/// utmp.ut_id             @ 40 sizeof   4
/// utmp.ut_user           @ 44 sizeof  32
/// utmp.ut_host           @ 76 sizeof 256
/// utmp.ut_exit.e_termination @332 sizeof 2
/// utmp.ut_exit.e_exit    @334 sizeof   2
/// utmp.ut_session        @336 sizeof   4
/// utmp.ut_tv.tv_sec      @340 sizeof   4
/// utmp.ut_tv.tv_usec     @344 sizeof   4
/// utmp.ut_addr_v6        @348 sizeof  16
/// utmp.__glibc_reserved  @364 sizeof  20
/// ```
pub const UTMP_FIELDS: [FieldLayout; 13] = [
    UT_TYPE,
    UT_PID,
    UT_LINE,
    UT_ID,
    UT_USER,
    UT_HOST,
    UT_EXIT_TERMINATION,
    UT_EXIT_EXIT,
    UT_SESSION,
    UT_TV_SEC,
    UT_TV_USEC,
    UT_ADDR_V6,
    UT_RESERVED,
];

/// Size in bytes of one record.
pub const UTMP_SZ: usize = 384;

/// [`UTMP_SZ`] as a [`FileOffset`].
///
/// [`FileOffset`]: crate::common::FileOffset
pub const UTMP_SZ_FO: FileOffset = UTMP_SZ as FileOffset;

// `ut_pid` is 4-byte aligned, everything after is packed
assertcp_eq!(UT_PID.offset, UT_TYPE.end() + 2);
assertcp_eq!(UT_LINE.offset, UT_PID.end());
assertcp_eq!(UT_ID.offset, UT_LINE.end());
assertcp_eq!(UT_USER.offset, UT_ID.end());
assertcp_eq!(UT_HOST.offset, UT_USER.end());
assertcp_eq!(UT_EXIT_TERMINATION.offset, UT_HOST.end());
assertcp_eq!(UT_EXIT_EXIT.offset, UT_EXIT_TERMINATION.end());
assertcp_eq!(UT_SESSION.offset, UT_EXIT_EXIT.end());
assertcp_eq!(UT_TV_SEC.offset, UT_SESSION.end());
assertcp_eq!(UT_TV_USEC.offset, UT_TV_SEC.end());
assertcp_eq!(UT_ADDR_V6.offset, UT_TV_USEC.end());
assertcp_eq!(UT_RESERVED.offset, UT_ADDR_V6.end());
assertcp_eq!(UT_RESERVED.end(), UTMP_SZ);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ut_type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The kind of a record, the `ut_type` field.
///
/// See [`man utmp`].
///
/// [`man utmp`]: https://man7.org/linux/man-pages/man5/utmp.5.html
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UtmpStatus {
    /// Record does not contain valid info
    Empty = 0,
    /// Change in system run-level
    RunLevel = 1,
    /// Time of system boot
    BootTime = 2,
    /// Time after system clock change
    NewTime = 3,
    /// Time before system clock change
    OldTime = 4,
    /// Process spawned by init
    Init = 5,
    /// Session leader process for user login
    Login = 6,
    /// Normal process
    User = 7,
    /// Terminated process
    Dead = 8,
    Accounting = 9,
}

/// Map a `ut_type` value, implied in the index offset, to a [`UtmpStatus`].
pub const UT_TYPE_VAL_TO_STATUS: [UtmpStatus; 10] = [
    UtmpStatus::Empty,
    UtmpStatus::RunLevel,
    UtmpStatus::BootTime,
    UtmpStatus::NewTime,
    UtmpStatus::OldTime,
    UtmpStatus::Init,
    UtmpStatus::Login,
    UtmpStatus::User,
    UtmpStatus::Dead,
    UtmpStatus::Accounting,
];

impl UtmpStatus {
    /// The raw `ut_type` value.
    pub const fn value(&self) -> i16 {
        *self as i16
    }

    /// The serialized name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            UtmpStatus::Empty => "empty",
            UtmpStatus::RunLevel => "run_level",
            UtmpStatus::BootTime => "boot_time",
            UtmpStatus::NewTime => "new_time",
            UtmpStatus::OldTime => "old_time",
            UtmpStatus::Init => "init",
            UtmpStatus::Login => "login",
            UtmpStatus::User => "user",
            UtmpStatus::Dead => "dead",
            UtmpStatus::Accounting => "accounting",
        }
    }
}

impl TryFrom<i16> for UtmpStatus {
    type Error = DecodeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match usize::try_from(value)
            .ok()
            .and_then(|index| UT_TYPE_VAL_TO_STATUS.get(index))
        {
            Some(status) => Ok(*status),
            None => Err(DecodeError::UnknownType(value)),
        }
    }
}

impl fmt::Display for UtmpStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// raw record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The raw values of one record, sliced out of a block per
/// [`UTMP_FIELDS`] but not yet interpreted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(non_camel_case_types)]
pub struct utmp {
    pub ut_type: i16,
    pub ut_pid: i32,
    pub ut_line: [u8; UT_LINESIZE],
    pub ut_id: [u8; UT_IDSIZE],
    pub ut_user: [u8; UT_NAMESIZE],
    pub ut_host: [u8; UT_HOSTSIZE],
    pub e_termination: i16,
    pub e_exit: i16,
    pub ut_session: i32,
    pub tv_sec: tv_sec_type,
    pub tv_usec: tv_usec_type,
    pub ut_addr_v6: [u32; UT_ADDRWORDS],
    pub reserved: [u8; UT_RESERVEDSIZE],
}

/// Copy the bytes of `field` into a fixed-size array.
#[inline(always)]
fn array_at<const N: usize>(block: &[u8], field: &FieldLayout) -> [u8; N] {
    debug_assert_eq!(field.size, N, "field {:?}", field.name);
    let mut array = [0u8; N];
    array.copy_from_slice(field.slice(block));

    array
}

/// Slice `buffer` into a [`utmp`].
///
/// `buffer` must be exactly [`UTMP_SZ`] bytes.
pub fn buffer_to_utmp(buffer: &[u8]) -> Result<utmp, DecodeError> {
    if buffer.len() != UTMP_SZ {
        defñ!("buffer len {} != UTMP_SZ {}", buffer.len(), UTMP_SZ);
        return Err(DecodeError::BlockSize(buffer.len()));
    }

    let addr: [u8; UT_ADDRWORDS * 4] = array_at(buffer, &UT_ADDR_V6);
    let mut ut_addr_v6 = [0u32; UT_ADDRWORDS];
    for (word, chunk) in ut_addr_v6.iter_mut().zip(addr.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    Ok(utmp {
        ut_type: i16::from_le_bytes(array_at(buffer, &UT_TYPE)),
        ut_pid: i32::from_le_bytes(array_at(buffer, &UT_PID)),
        ut_line: array_at(buffer, &UT_LINE),
        ut_id: array_at(buffer, &UT_ID),
        ut_user: array_at(buffer, &UT_USER),
        ut_host: array_at(buffer, &UT_HOST),
        e_termination: i16::from_le_bytes(array_at(buffer, &UT_EXIT_TERMINATION)),
        e_exit: i16::from_le_bytes(array_at(buffer, &UT_EXIT_EXIT)),
        ut_session: i32::from_le_bytes(array_at(buffer, &UT_SESSION)),
        tv_sec: tv_sec_type::from_le_bytes(array_at(buffer, &UT_TV_SEC)),
        tv_usec: tv_usec_type::from_le_bytes(array_at(buffer, &UT_TV_USEC)),
        ut_addr_v6,
        reserved: array_at(buffer, &UT_RESERVED),
    })
}

/// Strip the trailing run of NUL bytes then decode the remainder as UTF-8.
/// Invalid sequences become `U+FFFD`; NUL bytes before the final non-NUL
/// byte are kept.
pub fn nul_padded_to_string(field: &[u8]) -> String {
    let end: usize = match field.iter().rposition(|b| *b != 0) {
        Some(at) => at + 1,
        None => 0,
    };

    field[..end].to_str_lossy().into_owned()
}

/// Render the `ut_addr_v6` words joined by `.`, e.g. `16885952.0.0.0`.
///
/// Each word is printed as its unsigned decimal value, whether the address
/// is IPv4 (first word only) or IPv6.
pub fn addr_to_dotted(words: &[u32; UT_ADDRWORDS]) -> String {
    words
        .iter()
        .map(|word| word.to_string())
        .collect::<Vec<String>>()
        .join(".")
}

/// Lower-case hex rendering of `bytes`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes.iter() {
        // writing to a `String` cannot fail
        let _ = write!(s, "{:02x}", b);
    }

    s
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// decoded record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A decoded record. Serializes with the fields in on-disk order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UtmpRecord {
    #[serde(rename = "type")]
    pub ut_type: UtmpStatus,
    pub pid: i32,
    pub line: String,
    pub id: String,
    pub user: String,
    pub host: String,
    pub exit_termination: i16,
    pub exit_exit: i16,
    pub session: i32,
    /// `tv_sec` formatted per [`DATETIME_FORMAT`].
    ///
    /// [`DATETIME_FORMAT`]: crate::data::datetime::DATETIME_FORMAT
    pub time_seconds: String,
    pub time_microseconds: i32,
    /// See [`addr_to_dotted`].
    pub address: String,
    /// See [`bytes_to_hex`].
    pub reserved: String,
    /// The `tv_sec` as a datetime.
    #[serde(skip)]
    dt: DateTimeL,
}

impl UtmpRecord {
    /// Interpret a raw [`utmp`], rendering timestamps in `tz`.
    pub fn from_utmp(
        entry: &utmp,
        tz: &TimeZoneSrc,
    ) -> Result<UtmpRecord, DecodeError> {
        let ut_type = UtmpStatus::try_from(entry.ut_type)?;
        let dt = match convert_tvsec_datetime(entry.tv_sec, tz) {
            Some(dt) => dt,
            None => return Err(DecodeError::Timestamp(entry.tv_sec)),
        };

        Ok(UtmpRecord {
            ut_type,
            pid: entry.ut_pid,
            line: nul_padded_to_string(&entry.ut_line),
            id: nul_padded_to_string(&entry.ut_id),
            user: nul_padded_to_string(&entry.ut_user),
            host: nul_padded_to_string(&entry.ut_host),
            exit_termination: entry.e_termination,
            exit_exit: entry.e_exit,
            session: entry.ut_session,
            time_seconds: datetime_to_string(&dt),
            time_microseconds: entry.tv_usec,
            address: addr_to_dotted(&entry.ut_addr_v6),
            reserved: bytes_to_hex(&entry.reserved),
            dt,
        })
    }

    /// The datetime of `time_seconds`.
    pub const fn dt(&self) -> &DateTimeL {
        &self.dt
    }
}

/// Decode one record block of exactly [`UTMP_SZ`] bytes.
///
/// Pure; the result depends only on `block` and `tz`.
pub fn decode(
    block: &[u8],
    tz: &TimeZoneSrc,
) -> Result<UtmpRecord, DecodeError> {
    defn!("(block len {}, {:?})", block.len(), tz);
    let entry: utmp = buffer_to_utmp(block)?;
    defo!("entry {:?}", entry.ut_type);
    let record = UtmpRecord::from_utmp(&entry, tz);
    defx!("return is_ok {}", record.is_ok());

    record
}
