use crate::domain::model::RawTable;
use crate::utils::error::{LeadError, Result};
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::path::Path;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Encodings attempted, in priority order. Scraper exports from Russian
/// sources arrive in all of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Utf8Bom,
    Windows1251,
    Latin1,
}

impl Encoding {
    const ALL: [Encoding; 4] = [
        Encoding::Utf8,
        Encoding::Utf8Bom,
        Encoding::Windows1251,
        Encoding::Latin1,
    ];

    fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Bom => "utf-8-bom",
            Encoding::Windows1251 => "windows-1251",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes` under this encoding, or `None` on a decoding failure.
    /// The BOM variants are disjoint: plain UTF-8 refuses a BOM so that the
    /// BOM variant gets to strip it instead of leaking it into the header.
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => {
                if bytes.starts_with(&UTF8_BOM) {
                    return None;
                }
                std::str::from_utf8(bytes).ok().map(str::to_owned)
            }
            Encoding::Utf8Bom => {
                let rest = bytes.strip_prefix(&UTF8_BOM[..])?;
                std::str::from_utf8(rest).ok().map(str::to_owned)
            }
            Encoding::Windows1251 => encoding_rs::WINDOWS_1251
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|cow| cow.into_owned()),
            // Latin-1 maps every byte; this is the last resort and cannot
            // fail at the decoding stage.
            Encoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Reads one CSV/TSV file with unknown encoding and delimiter into a
/// [`RawTable`], skipping malformed lines.
pub struct FileIngestor;

impl FileIngestor {
    pub fn new() -> Self {
        Self
    }

    /// Parse `path` into named columns and rows.
    ///
    /// Tries each encoding in priority order; for the first that decodes,
    /// detects the delimiter and parses. A parse that yields more than one
    /// column wins. If no combination does, the file is unusable and the
    /// error lists every encoding attempted. A parsed file with zero data
    /// rows is a valid empty result.
    pub fn ingest(&self, path: &Path) -> Result<RawTable> {
        let bytes = std::fs::read(path)?;

        for encoding in Encoding::ALL {
            let Some(text) = encoding.decode(&bytes) else {
                tracing::debug!("{}: decoding as {} failed", path.display(), encoding.label());
                continue;
            };

            let delimiter = detect_delimiter(&text, path);
            let table = parse_table(&text, delimiter)?;

            if table.columns.len() > 1 {
                tracing::info!(
                    "read {}: encoding={}, delimiter={:?}, rows={}, columns={}",
                    path.display(),
                    encoding.label(),
                    delimiter as char,
                    table.rows.len(),
                    table.columns.len()
                );
                return Ok(table);
            }

            tracing::debug!(
                "{}: {} decoded but produced {} column(s), trying next encoding",
                path.display(),
                encoding.label(),
                table.columns.len()
            );
        }

        Err(LeadError::EncodingDetection {
            path: path.to_path_buf(),
            encodings: Encoding::ALL.iter().map(|e| e.label().to_string()).collect(),
        })
    }
}

impl Default for FileIngestor {
    fn default() -> Self {
        Self::new()
    }
}

const DELIMITER_CANDIDATES: [u8; 3] = [b'\t', b';', b','];

/// Pick the field delimiter: sniff over the first lines, falling back to
/// the file extension when sniffing is ambiguous.
fn detect_delimiter(text: &str, path: &Path) -> u8 {
    if let Some(delimiter) = sniff_delimiter(text) {
        tracing::debug!("sniffed delimiter {:?}", delimiter as char);
        return delimiter;
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("tsv") => b'\t',
        Some("csv") => {
            let first_line = text.lines().next().unwrap_or("");
            let commas = first_line.matches(',').count();
            let semicolons = first_line.matches(';').count();
            let tabs = first_line.matches('\t').count();

            if tabs > commas.max(semicolons) {
                b'\t'
            } else if semicolons > commas {
                b';'
            } else {
                b','
            }
        }
        _ => b',',
    }
}

/// Sample the first 5 lines and look for a candidate that occurs the same
/// non-zero number of times in every line. Exactly one consistent candidate
/// means an unambiguous sniff; zero or several means failure and the caller
/// falls back to the extension heuristic.
fn sniff_delimiter(text: &str) -> Option<u8> {
    let sample: Vec<&str> = text.lines().take(5).filter(|l| !l.is_empty()).collect();
    if sample.is_empty() {
        return None;
    }

    let mut consistent = Vec::new();
    for candidate in DELIMITER_CANDIDATES {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| line.matches(candidate as char).count())
            .collect();
        if counts[0] > 0 && counts.iter().all(|&c| c == counts[0]) {
            consistent.push(candidate);
        }
    }

    match consistent.as_slice() {
        [single] => Some(*single),
        _ => None,
    }
}

/// Parse decoded text with a fixed delimiter. Rows whose field count does
/// not match the header are skipped, as are rows the reader itself rejects.
fn parse_table(text: &str, delimiter: u8) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!("skipping unparsable line {}: {}", index + 2, err);
                continue;
            }
        };

        if record.len() != columns.len() {
            tracing::debug!(
                "skipping line {}: {} fields, expected {}",
                index + 2,
                record.len(),
                columns.len()
            );
            continue;
        }

        let row: HashMap<String, String> = columns
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_owned))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}
