// src/tests/common.rs

//! Common fixtures for tests: timezone offsets and raw record blocks.

#![allow(non_upper_case_globals)]

use crate::data::datetime::{FixedOffset, TimeZoneSrc};
use crate::data::utmp::{
    FieldLayout,
    UT_ADDR_V6,
    UT_EXIT_EXIT,
    UT_EXIT_TERMINATION,
    UT_HOST,
    UT_ID,
    UT_LINE,
    UT_PID,
    UT_RESERVED,
    UT_SESSION,
    UT_TV_SEC,
    UT_TV_USEC,
    UT_TYPE,
    UT_USER,
    UTMP_SZ,
};

use ::lazy_static::lazy_static;

lazy_static! {
    pub static ref FO_0: FixedOffset = FixedOffset::east_opt(0).unwrap();
    pub static ref FO_P8: FixedOffset = FixedOffset::east_opt(3600 * 8).unwrap();
    pub static ref FO_M5: FixedOffset = FixedOffset::west_opt(3600 * 5).unwrap();
    pub static ref TZ_0: TimeZoneSrc = TimeZoneSrc::Fixed(*FO_0);
    pub static ref TZ_P8: TimeZoneSrc = TimeZoneSrc::Fixed(*FO_P8);
}

/// Builder of raw record blocks, writing little-endian values at the
/// offsets of the record layout. Unset bytes are zero.
#[derive(Clone, Copy)]
pub struct UtmpBlock {
    buffer: [u8; UTMP_SZ],
}

impl UtmpBlock {
    pub fn new() -> UtmpBlock {
        UtmpBlock {
            buffer: [0; UTMP_SZ],
        }
    }

    fn put(mut self, field: &FieldLayout, bytes: &[u8]) -> UtmpBlock {
        assert!(
            bytes.len() <= field.size,
            "{} bytes too large for field {:?} of size {}",
            bytes.len(), field.name, field.size
        );
        let end = field.offset + bytes.len();
        self.buffer[field.offset..end].copy_from_slice(bytes);

        self
    }

    pub fn ut_type(self, value: i16) -> UtmpBlock {
        self.put(&UT_TYPE, &value.to_le_bytes())
    }

    pub fn pid(self, value: i32) -> UtmpBlock {
        self.put(&UT_PID, &value.to_le_bytes())
    }

    pub fn line(self, value: &[u8]) -> UtmpBlock {
        self.put(&UT_LINE, value)
    }

    pub fn id(self, value: &[u8]) -> UtmpBlock {
        self.put(&UT_ID, value)
    }

    pub fn user(self, value: &[u8]) -> UtmpBlock {
        self.put(&UT_USER, value)
    }

    pub fn host(self, value: &[u8]) -> UtmpBlock {
        self.put(&UT_HOST, value)
    }

    pub fn exit(self, e_termination: i16, e_exit: i16) -> UtmpBlock {
        self.put(&UT_EXIT_TERMINATION, &e_termination.to_le_bytes())
            .put(&UT_EXIT_EXIT, &e_exit.to_le_bytes())
    }

    pub fn session(self, value: i32) -> UtmpBlock {
        self.put(&UT_SESSION, &value.to_le_bytes())
    }

    pub fn tv(self, tv_sec: i32, tv_usec: i32) -> UtmpBlock {
        self.put(&UT_TV_SEC, &tv_sec.to_le_bytes())
            .put(&UT_TV_USEC, &tv_usec.to_le_bytes())
    }

    pub fn addr(self, words: [u32; 4]) -> UtmpBlock {
        let mut bytes: Vec<u8> = Vec::with_capacity(16);
        for word in words.iter() {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        self.put(&UT_ADDR_V6, &bytes)
    }

    pub fn reserved(self, value: &[u8]) -> UtmpBlock {
        self.put(&UT_RESERVED, value)
    }

    pub const fn bytes(&self) -> [u8; UTMP_SZ] {
        self.buffer
    }
}

/// `ut_addr_v6[0]` of IPv4 address 192.168.1.1 as stored on little-endian
/// x86_64.
pub const ADDR_192_168_1_1: u32 = 0x0101A8C0;

/// `tv_sec` of 2023-02-28 06:41:15 UTC
pub const TV_SEC1: i32 = 1677566475;
/// `tv_sec` of 2020-01-01 12:00:02 UTC
pub const TV_SEC2: i32 = 1577880002;

lazy_static! {
    /// A `USER_PROCESS` record, a remote ssh login.
    pub static ref UTMP_BUFFER1: [u8; UTMP_SZ] = UtmpBlock::new()
        .ut_type(7)
        .pid(41908)
        .line(b"pts/1")
        .id(b"ts/1")
        .user(b"root")
        .host(b"192.168.1.1")
        .exit(0, 0)
        .session(41908)
        .tv(TV_SEC1, 1345)
        .addr([ADDR_192_168_1_1, 0, 0, 0])
        .bytes();

    /// A `BOOT_TIME` record.
    pub static ref UTMP_BUFFER2: [u8; UTMP_SZ] = UtmpBlock::new()
        .ut_type(2)
        .line(b"~")
        .id(b"~~")
        .user(b"reboot")
        .host(b"5.15.0-58-generic")
        .tv(TV_SEC2, 123636)
        .bytes();

    /// A `DEAD_PROCESS` record with an exit status.
    pub static ref UTMP_BUFFER3: [u8; UTMP_SZ] = UtmpBlock::new()
        .ut_type(8)
        .pid(1203)
        .line(b"pts/0")
        .id(b"ts/0")
        .exit(15, 1)
        .tv(TV_SEC1 + 60, 0)
        .bytes();

    /// A record with `ut_type` 42, which is not a known record type.
    pub static ref UTMP_BUFFER_BADTYPE: [u8; UTMP_SZ] = UtmpBlock::new()
        .ut_type(42)
        .pid(1)
        .tv(TV_SEC1, 0)
        .bytes();
}

/// Concatenate blocks into one byte sequence.
pub fn blocks_concat(blocks: &[&[u8]]) -> Vec<u8> {
    let mut data: Vec<u8> = Vec::with_capacity(blocks.len() * UTMP_SZ);
    for block in blocks.iter() {
        data.extend_from_slice(block);
    }

    data
}
