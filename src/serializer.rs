// C array literal serializer
//
// Renders a table as `{ v0, v1, ..., };` for pasting into firmware source,
// and reads the same literal back.

use core::fmt;

use libm::round;
use thiserror::Error;

use crate::config::output::ENTRIES_PER_LINE;

/// Render values as a bracketed, line-wrapped C array initializer
///
/// A newline precedes every block of 256 entries (including the first).
/// Each entry is rounded half away from zero and followed by `", "`.
pub fn table_to_c_array<I, V>(values: I) -> String
where
    I: IntoIterator<Item = V>,
    V: Into<f64>,
{
    let mut out = String::from("{ ");
    for (n, value) in values.into_iter().enumerate() {
        if n % ENTRIES_PER_LINE == 0 {
            out.push('\n');
        }
        let rounded = round(value.into()) as i64;
        out.push_str(&rounded.to_string());
        out.push_str(", ");
    }
    out.push_str("};");
    out
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseArrayError {
    #[error("array literal must start with '{{' and end with '}};'")]
    Delimiters,
    #[error("invalid entry {index}: {text:?}")]
    Entry { index: usize, text: String },
}

/// Parse a literal produced by [`table_to_c_array`] back into integers
pub fn parse_c_array(literal: &str) -> Result<Vec<i64>, ParseArrayError> {
    let body = literal
        .trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix("};"))
        .ok_or(ParseArrayError::Delimiters)?;

    body.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(index, text)| {
            text.parse::<i64>().map_err(|_| ParseArrayError::Entry {
                index,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Size and range of a table, for a quick look before pasting it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    /// First and last value of the axis the table is indexed by
    pub domain: Option<(f64, f64)>,
}

impl TableSummary {
    pub fn new<I, V>(values: I, domain: Option<&[f64]>) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<f64>,
    {
        let (count, min, max) = values.into_iter().map(Into::into).fold(
            (0usize, f64::INFINITY, f64::NEG_INFINITY),
            |(count, min, max), v: f64| (count + 1, min.min(v), max.max(v)),
        );
        let domain = domain.and_then(|d| Some((*d.first()?, *d.last()?)));
        Self {
            count,
            min,
            max,
            domain,
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "0 entries");
        }
        write!(
            f,
            "{} entries, {} .. {}",
            self.count,
            round(self.min) as i64,
            round(self.max) as i64
        )?;
        if let Some((first, last)) = self.domain {
            write!(f, ", {} -> {}", round(first) as i64, round(last) as i64)?;
        }
        Ok(())
    }
}
