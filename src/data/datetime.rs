// src/data/datetime.rs

//! Datetime conversions for record timestamps.
//!
//! A utmp record stores its entry time as a Unix `tv_sec`/`tv_usec` pair.
//! Only `tv_sec` becomes a datetime; `tv_usec` is carried along untouched.

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    FixedOffset,
    Local,
    LocalResult,
    Offset,
    TimeZone,
    Utc,
};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// `DateTime` typing used throughout; always carries its offset.
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// Type of the `ut_tv.tv_sec` field on disk.
#[allow(non_camel_case_types)]
pub type tv_sec_type = i32;
/// Type of the `ut_tv.tv_usec` field on disk.
#[allow(non_camel_case_types)]
pub type tv_usec_type = i32;

/// strftime format of the `time_seconds` string of a decoded record,
/// e.g. `2023-02-28 06:41:15`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The timezone in which record timestamps are rendered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimeZoneSrc {
    /// The process-local timezone. The offset is resolved per timestamp so
    /// daylight-saving transitions are honored.
    #[default]
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

/// Convert a `tv_sec` value to a [`DateTimeL`] in the timezone `tz`.
///
/// Returns `None` if the value cannot be represented.
pub fn convert_tvsec_datetime(
    tv_sec: tv_sec_type,
    tz: &TimeZoneSrc,
) -> DateTimeLOpt {
    let secs = tv_sec as i64;
    let result: LocalResult<DateTimeL> = match tz {
        TimeZoneSrc::Local => Local
            .timestamp_opt(secs, 0)
            .map(|dt| dt.fixed_offset()),
        TimeZoneSrc::Fixed(tz_offset) => tz_offset.timestamp_opt(secs, 0),
    };
    match result {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => {
            defñ!("timestamp_opt({}, 0) returned None for {:?}", secs, tz);
            None
        }
    }
}

/// Render `dt` per [`DATETIME_FORMAT`].
pub fn datetime_to_string(dt: &DateTimeL) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse a numeric timezone offset, e.g. `"+09:00"`, `"-0800"`, `"+02"`,
/// or one of the UTC names `"Z"` and `"UTC"`.
pub fn parse_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    defn!("({:?})", tzo);
    if matches!(tzo, "Z" | "z" | "UTC" | "utc") {
        defx!("return UTC");
        return Ok(Utc.fix());
    }
    // transform the timezone string to a `FixedOffset` instance
    // using a dummy datetime
    let mut data: String = String::from("2000-01-02 03:04:05 ");
    data.push_str(tzo);
    for pattern in [
        "%Y-%m-%d %H:%M:%S %:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S %#z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(data.as_str(), pattern) {
            defx!("return {:?}", dt.offset());
            return Ok(*dt.offset());
        }
        defo!("pattern {:?} did not match {:?}", pattern, data);
    }
    defx!("no pattern matched");

    Err(format!("Unable to parse a timezone offset {:?}", tzo))
}
