//! Delimiter detection for delimited-text inputs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::UTF_8;
use tracing::{debug, warn};

use crate::error::{GridcheckError, Result};

/// Candidate delimiters, in tie-break order.
pub const CANDIDATE_DELIMITERS: &[u8] = &[b',', b';', b'|', b'/', b'\t', b':', b'-'];

/// Delimiter used when nothing else qualifies.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Infers the field separator of a delimited-text file.
#[derive(Debug, Clone)]
pub struct Sniffer {
    sample_bytes: usize,
    sample_rows: usize,
}

impl Sniffer {
    /// Create a sniffer reading `sample_bytes` and trial-parsing `sample_rows` rows.
    pub fn new(sample_bytes: usize, sample_rows: usize) -> Self {
        Self {
            sample_bytes: sample_bytes.max(1),
            sample_rows: sample_rows.max(1),
        }
    }

    /// Detect the delimiter of a file from its leading bytes.
    pub fn detect(&self, path: impl AsRef<Path>) -> Result<u8> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GridcheckError::io(path, e))?;

        let mut sample = Vec::with_capacity(self.sample_bytes);
        file.take(self.sample_bytes as u64)
            .read_to_end(&mut sample)
            .map_err(|e| GridcheckError::io(path, e))?;

        Ok(self.detect_bytes(&sample))
    }

    /// Detect the delimiter of an in-memory sample.
    ///
    /// Only the first `sample_bytes` bytes are considered.
    pub fn detect_bytes(&self, bytes: &[u8]) -> u8 {
        let sample = &bytes[..bytes.len().min(self.sample_bytes)];
        let (text, _) = UTF_8.decode_with_bom_removal(sample);

        if text.trim().is_empty() {
            warn!("Empty sample, using default delimiter ','");
            return DEFAULT_DELIMITER;
        }

        // A truncated sample can cut the last line short.
        let truncated = bytes.len() > sample.len();

        if let Some(delimiter) = quick_sniff(&text, truncated) {
            debug!(delimiter = %char::from(delimiter).escape_debug(), "Delimiter sniffed");
            return delimiter;
        }

        match self.brute_force(&text) {
            Some(delimiter) => {
                debug!(delimiter = %char::from(delimiter).escape_debug(), "Delimiter found by trial parse");
                delimiter
            }
            None => {
                warn!("No delimiter candidate qualified, using default delimiter ','");
                DEFAULT_DELIMITER
            }
        }
    }

    /// Trial-parse the sample with every candidate and keep the best.
    ///
    /// Candidates rank by column count, then by row consistency; the first
    /// candidate wins an exact tie. A candidate needs more than one column.
    fn brute_force(&self, text: &str) -> Option<u8> {
        let mut best: Option<(u8, usize, f64)> = None;

        for &delimiter in CANDIDATE_DELIMITERS {
            let Some((column_count, consistency)) = self.score(text, delimiter) else {
                continue;
            };

            if column_count <= 1 {
                continue;
            }

            let better = match best {
                None => true,
                Some((_, best_count, best_consistency)) => {
                    column_count > best_count
                        || (column_count == best_count && consistency > best_consistency)
                }
            };

            if better {
                best = Some((delimiter, column_count, consistency));
            }
        }

        best.map(|(delimiter, _, _)| delimiter)
    }

    /// Parse the sample with one delimiter and return `(column_count, consistency)`.
    ///
    /// Up to `sample_rows` records are read, the first included. The first
    /// record fixes the column count and a wider row makes the parse unusable.
    /// Consistency is the fraction of sampled rows whose non-empty field count
    /// equals the column count.
    fn score(&self, text: &str, delimiter: u8) -> Option<(usize, f64)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut column_count = None;
        let mut row_lengths = Vec::with_capacity(self.sample_rows);
        for record in reader.records().take(self.sample_rows) {
            let record = record.ok()?;
            let width = *column_count.get_or_insert(record.len());
            if record.len() > width {
                return None;
            }
            row_lengths.push(record.iter().filter(|f| !f.trim().is_empty()).count());
        }

        let column_count = column_count?;
        let matching = row_lengths.iter().filter(|&&n| n == column_count).count();
        Some((column_count, matching as f64 / row_lengths.len() as f64))
    }
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new(1024, 5)
    }
}

/// Frequency-based sniff.
///
/// Accepts a candidate only when it occurs the same, non-zero number of times
/// on every sampled line. Returns `None` when no candidate is conclusive.
fn quick_sniff(text: &str, truncated: bool) -> Option<u8> {
    let mut lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    if lines.len() < 2 {
        return None;
    }

    let mut best: Option<(u8, usize)> = None;
    for &delimiter in CANDIDATE_DELIMITERS {
        let first = count_delimiter_in_line(lines[0], delimiter);
        if first == 0 {
            continue;
        }
        if !lines.iter().all(|l| count_delimiter_in_line(l, delimiter) == first) {
            continue;
        }
        if best.is_none_or(|(_, count)| first > count) {
            best = Some((delimiter, first));
        }
    }

    best.map(|(delimiter, _)| delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
