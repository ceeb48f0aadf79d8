//! The reading/writing trait shared by resource documents and batch files.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for values that live in exactly one file on disk.
///
/// Implemented by [`crate::formats::AndroidStringsFormat`] (XML) and
/// [`crate::batch::Batch`] (JSON).
///
/// # Example
///
/// ```rust,no_run
/// use stringsync::traits::Parser;
/// let doc = stringsync::formats::AndroidStringsFormat::read_from("values/strings.xml")?;
/// doc.write_to("values/strings_copy.xml")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path, replacing whatever was there.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Serialize into an in-memory string.
    fn to_string_lossy(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
