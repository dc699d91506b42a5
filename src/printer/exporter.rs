// src/printer/exporter.rs

//! Render decoded records as JSON or YAML text and write the text to
//! standard output or a file.
//!
//! The whole text is rendered before anything is written so a rendering
//! failure leaves the destination untouched.

use crate::common::{
    FPath,
    File,
    FileOpenOptions,
    FPATH_STDOUT,
};
use crate::error::{Result, UtmpError};

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use ::serde::Serialize;
use ::serde_json::ser::PrettyFormatter;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Indentation of JSON output.
pub const JSON_INDENT: &[u8] = b"    ";

/// Names accepted by [`ExportFormat::from_str`].
pub const EXPORT_FORMAT_NAMES: [&str; 3] = ["json", "yaml", "yml"];

/// Text format of exported records.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ExportFormat {
    /// Indented JSON.
    #[default]
    Json,
    /// Block-style YAML.
    Yaml,
}

impl FromStr for ExportFormat {
    type Err = UtmpError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            _ => Err(UtmpError::UnsupportedFormat(String::from(s))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Yaml => f.write_str("yaml"),
        }
    }
}

/// Where exported text is written.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Destination {
    #[default]
    Stdout,
    /// A file, created if missing. Existing content is truncated unless
    /// `append`.
    File {
        path: FPath,
        append: bool,
    },
}

impl Destination {
    /// `None` or the name `"stdout"` is [`Destination::Stdout`].
    pub fn from_dst(dst: Option<&str>, append: bool) -> Destination {
        match dst {
            None | Some(FPATH_STDOUT) => Destination::Stdout,
            Some(path) => Destination::File {
                path: FPath::from(path),
                append,
            },
        }
    }
}

/// Render `data` as text in `format`.
///
/// JSON is indented by [`JSON_INDENT`]. YAML is block style and ends with
/// a newline. Non-string map keys are rendered by the serializer, e.g. an
/// integer key `1` becomes `"1"` in JSON and `1` in YAML.
pub fn format_data<T>(data: &T, format: ExportFormat) -> Result<String>
where
    T: Serialize + ?Sized,
{
    defn!("({:?})", format);
    let text: String = match format {
        ExportFormat::Json => {
            let mut buffer: Vec<u8> = Vec::with_capacity(4096);
            let formatter = PrettyFormatter::with_indent(JSON_INDENT);
            let mut serializer = ::serde_json::Serializer::with_formatter(&mut buffer, formatter);
            data.serialize(&mut serializer)?;
            // serde_json only writes UTF-8
            String::from_utf8_lossy(&buffer).into_owned()
        }
        ExportFormat::Yaml => ::serde_yaml::to_string(data)?,
    };
    defx!("return {} bytes", text.len());

    Ok(text)
}

/// Write `text` and one trailing newline to `writer`.
pub fn write_to<W: Write>(writer: &mut W, text: &str) -> std::io::Result<()> {
    writer.write_all(text.as_bytes())?;
    writer.write_all(b"\n")?;

    writer.flush()
}

/// Open `path` for writing, creating it if missing.
fn open_destination(path: &str, append: bool) -> Result<File> {
    let mut options = FileOpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    defñ!("open {:?} append {}", path, append);
    options
        .open(path)
        .map_err(|err| UtmpError::io(path, err))
}

/// Renders data in one [`ExportFormat`] to one [`Destination`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Exporter {
    format: ExportFormat,
    destination: Destination,
}

impl Exporter {
    pub fn new(format: ExportFormat, destination: Destination) -> Exporter {
        Exporter {
            format,
            destination,
        }
    }

    pub const fn format(&self) -> ExportFormat {
        self.format
    }

    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Render `data` then write it to the destination.
    pub fn export<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        defn!("({:?}, {:?})", self.format, self.destination);
        let text: String = format_data(data, self.format)?;
        match &self.destination {
            Destination::Stdout => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                write_to(&mut lock, &text)
                    .map_err(|err| UtmpError::io(FPATH_STDOUT, err))?;
            }
            Destination::File { path, append } => {
                // `file` is closed at the end of this scope
                let mut file: File = open_destination(path, *append)?;
                write_to(&mut file, &text)
                    .map_err(|err| UtmpError::io(path, err))?;
            }
        }
        defx!();

        Ok(())
    }
}
