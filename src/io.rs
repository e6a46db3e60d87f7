//! Line-oriented file input and output

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Read a whole text file into memory, one entry per line.
///
/// Both `\n` and `\r\n` endings are accepted; a trailing newline does not
/// produce an extra empty line.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(text.lines().map(str::to_owned).collect())
}

/// Write lines to `writer`, each terminated by `\n`
pub fn write_lines_to<W, S>(writer: &mut W, lines: &[S]) -> std::io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    for line in lines {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Create or truncate `path` and write `lines` to it
pub fn write_lines<S: AsRef<str>>(path: impl AsRef<Path>, lines: &[S]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_lines_to(&mut writer, lines).map_err(|e| Error::io(path, e))
}
