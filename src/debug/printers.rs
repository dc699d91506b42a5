// src/debug/printers.rs

//! Printer macros for errors and warnings, and helpers to visualize raw
//! record bytes in test and debug builds.

#[cfg(any(debug_assertions, test))]
use crate::data::utmp::{utmp, UTMP_FIELDS};

#[cfg(any(debug_assertions, test))]
use ::bstr::ByteSlice; // provides `chars` on `[u8]`

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprintln!("ERROR: {}", format_args!($($args)*))
        }
    }
}
pub use e_err;

/// `e`println! a `w`a`rn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprintln!("WARNING: {}", format_args!($($args)*))
        }
    }
}
pub use e_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions - visualize record bytes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Replace C0 control characters and DEL with their Unicode "control
/// picture", e.g. `'\0'` becomes `'␀'`. Keeps each character one column
/// wide so padded text fields line up when printed.
#[cfg(any(debug_assertions, test))]
pub const fn char_to_char_noraw(c: char) -> char {
    match c as u32 {
        // U+2400 is '␀', the pictures are contiguous for 0x00..=0x1F
        n @ 0..=31 => match char::from_u32(0x2400 + n) {
            Some(p) => p,
            None => c,
        },
        127 => '␡',
        _ => c,
    }
}

/// Transform bytes, presumably UTF-8, to a printable `String`.
///
/// only intended for debugging
#[doc(hidden)]
#[allow(non_snake_case)]
#[cfg(any(debug_assertions, test))]
pub fn buffer_to_String_noraw(buffer: &[u8]) -> String {
    let mut s: String = String::with_capacity(buffer.len() + 1);
    for c in buffer.chars() {
        s.push(char_to_char_noraw(c));
    }

    s
}

/// One-line printable rendering of all raw fields of `entry`, including
/// the NUL padding of text fields. A field without a rendering prints `?`.
///
/// only intended for debugging
#[doc(hidden)]
#[allow(non_snake_case)]
#[cfg(any(debug_assertions, test))]
pub fn utmp_to_String_noraw(entry: &utmp) -> String {
    let mut s: String = String::with_capacity(512);
    for field in UTMP_FIELDS.iter() {
        let value: String = match field.name {
            "type" => entry.ut_type.to_string(),
            "pid" => entry.ut_pid.to_string(),
            "line" => format!("'{}'", buffer_to_String_noraw(&entry.ut_line)),
            "id" => format!("'{}'", buffer_to_String_noraw(&entry.ut_id)),
            "user" => format!("'{}'", buffer_to_String_noraw(&entry.ut_user)),
            "host" => format!("'{}'", buffer_to_String_noraw(&entry.ut_host)),
            "exit_termination" => entry.e_termination.to_string(),
            "exit_exit" => entry.e_exit.to_string(),
            "session" => entry.ut_session.to_string(),
            "time_seconds" => entry.tv_sec.to_string(),
            "time_microseconds" => entry.tv_usec.to_string(),
            "address" => format!("{:X?}", entry.ut_addr_v6),
            "reserved" => format!("{:02X?}", entry.reserved),
            _ => String::from("?"),
        };
        if !s.is_empty() {
            s.push(' ');
        }
        s.push_str(field.name);
        s.push(' ');
        s.push_str(value.as_str());
    }

    s
}
