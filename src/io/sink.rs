//! Line-oriented key/value output (the `GITHUB_OUTPUT` file format).
//!
//! Single-line values are written as `KEY=value`. Multi-line values use the
//! delimiter form:
//!
//! ```text
//! KEY<<EOF
//! line 1
//! line 2
//! EOF
//! ```
//!
//! The sink is a trait so the pipeline can be driven against an in-memory
//! buffer in tests and against the runner's output file in CI.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Environment variable naming the key/value output file.
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

pub const KEY_IMAGE_DATES: &str = "IMAGE_DATES";
pub const KEY_MATRIX: &str = "MATRIX_PARAMS_COMBINATIONS";
pub const KEY_PAIR_COUNT: &str = "PAIR_COUNT";

/// Destination for named report values.
pub trait ReportSink {
    fn write_value(&mut self, key: &str, value: &str) -> Result<(), AppError>;
}

/// `ReportSink` over any writer.
pub struct KeyValueSink<W: Write> {
    writer: W,
}

impl<W: Write> KeyValueSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl KeyValueSink<File> {
    /// Open `path` for appending (the runner may already have written to it).
    pub fn append_to(path: &Path) -> Result<Self, AppError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::output(format!("Failed to open output file '{}': {e}", path.display())))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> ReportSink for KeyValueSink<W> {
    fn write_value(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        validate_key(key)?;

        let result = if value.contains('\n') || value.contains('\r') {
            let delimiter = choose_delimiter(value);
            writeln!(self.writer, "{key}<<{delimiter}")
                .and_then(|_| writeln!(self.writer, "{value}"))
                .and_then(|_| writeln!(self.writer, "{delimiter}"))
        } else {
            writeln!(self.writer, "{key}={value}")
        };

        result
            .and_then(|_| self.writer.flush())
            .map_err(|e| AppError::output(format!("Failed to write output `{key}`: {e}")))
    }
}

/// Resolve the sink path: explicit flag first, then `GITHUB_OUTPUT` (after loading `.env`).
pub fn resolve_output_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    dotenvy::dotenv().ok();
    std::env::var_os(GITHUB_OUTPUT_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn validate_key(key: &str) -> Result<(), AppError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(AppError::output(format!("Invalid output key `{key}`.")))
    }
}

/// Pick a heredoc delimiter that does not appear as a line of `value`.
fn choose_delimiter(value: &str) -> String {
    let mut delimiter = "EOF".to_string();
    let mut n = 0usize;
    while value.lines().any(|line| line == delimiter) {
        n += 1;
        delimiter = format!("EOF_{n}");
    }
    delimiter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(values: &[(&str, &str)]) -> String {
        let mut sink = KeyValueSink::new(Vec::new());
        for (k, v) in values {
            sink.write_value(k, v).unwrap();
        }
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn single_line_value() {
        assert_eq!(render(&[("PAIR_COUNT", "3")]), "PAIR_COUNT=3\n");
    }

    #[test]
    fn multi_line_value_uses_delimiter() {
        assert_eq!(
            render(&[("IMAGE_DATES", "2023-06-01\n2023-06-13")]),
            "IMAGE_DATES<<EOF\n2023-06-01\n2023-06-13\nEOF\n"
        );
    }

    #[test]
    fn delimiter_avoids_collisions() {
        assert_eq!(choose_delimiter("a\nEOF\nb"), "EOF_1");
        assert_eq!(choose_delimiter("EOF\nEOF_1"), "EOF_2");
        assert_eq!(choose_delimiter("EOFX\nb"), "EOF");
    }

    #[test]
    fn empty_value_is_written() {
        assert_eq!(render(&[("IMAGE_DATES", "")]), "IMAGE_DATES=\n");
    }

    #[test]
    fn rejects_bad_keys() {
        let mut sink = KeyValueSink::new(Vec::new());
        assert!(sink.write_value("", "x").is_err());
        assert!(sink.write_value("A=B", "x").is_err());
    }

    #[test]
    fn appends_to_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "EXISTING=1\n").unwrap();

        let mut sink = KeyValueSink::append_to(file.path()).unwrap();
        sink.write_value("PAIR_COUNT", "0").unwrap();
        drop(sink);

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "EXISTING=1\nPAIR_COUNT=0\n");
    }

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/explicit-output");
        assert_eq!(resolve_output_path(Some(path)), Some(path.to_path_buf()));
    }
}
