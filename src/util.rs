/*
 * Reading and writing the plain-text weight, input and reference files.
 */
use crate::error::{Error, Result};
use itertools::Itertools;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_owned(),
        source,
    }
}

/// Reads a file of newline-delimited floats into a Vec of f32s. Each line
/// holds either a single value or a comma-separated list of values; the
/// values are flattened in file order.
pub fn read_f32_lines<P: AsRef<Path>>(path: P) -> Result<Vec<f32>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_error(path))?;
    let reader = BufReader::new(file);

    let mut floats = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error(path))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        for token in line.split(',') {
            let token = token.trim();
            let value = token.parse::<f32>().map_err(|_| Error::Parse {
                path: path.to_owned(),
                line: line_idx + 1,
                token: token.to_owned(),
            })?;
            floats.push(value);
        }
    }
    trace!("read {} values from {}", floats.len(), path.display());
    Ok(floats)
}

/// Reads a file of newline-delimited floats and verifies that the amount of
/// values matches `expected_len`.
pub fn read_f32_lines_checked<P: AsRef<Path>>(path: P, expected_len: usize) -> Result<Vec<f32>> {
    let path = path.as_ref();
    let v = read_f32_lines(path)?;
    if v.len() != expected_len {
        return Err(Error::LengthMismatch {
            what: format!("\"{}\"", path.display()),
            expected: expected_len,
            actual: v.len(),
        });
    }
    Ok(v)
}

/// Writes `data` as lines of `per_line` comma-separated values.
pub fn write_f32_lines<P: AsRef<Path>>(path: P, data: &[f32], per_line: usize) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    for line in data.chunks(per_line.max(1)) {
        writeln!(writer, "{}", line.iter().join(",")).map_err(io_error(path))?;
    }
    writer.flush().map_err(io_error(path))
}
