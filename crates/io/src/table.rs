// Delimited text: decoding, delimiter sniffing, header-keyed rows

use std::collections::HashMap;

use orderlens_recon::config::Delimiter;

/// One data row keyed by (trimmed) header name.
pub type RawRow = HashMap<String, String>;

/// Decode file bytes as UTF-8, dropping a leading byte-order mark.
///
/// With `fallback` set, bytes that are not valid UTF-8 are decoded as
/// Windows-1252 (common for Excel-exported CSVs); otherwise they are an error.
pub fn decode_text(bytes: Vec<u8>, fallback: bool) -> Result<String, String> {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) if fallback => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
        Err(e) => {
            return Err(format!(
                "file is not valid UTF-8 (invalid byte at offset {})",
                e.utf8_error().valid_up_to()
            ))
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Resolve the configured delimiter against the file content.
///
/// `columns` are header names the file is expected to carry; sniffing
/// prefers the candidate that splits them out of the header row.
pub fn resolve_delimiter(delimiter: Delimiter, content: &str, columns: &[&str]) -> u8 {
    match delimiter {
        Delimiter::Byte(b) => b,
        Delimiter::Auto => sniff_delimiter(content, columns),
    }
}

const SNIFF_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Pick the delimiter for `content` among comma, semicolon, tab and pipe.
///
/// Each candidate is ranked by how many of `columns` it yields from the
/// header row, then by how many sampled data rows match the header's field
/// count. A candidate that leaves the header as one field never wins; ties go
/// to the earlier candidate, so comma is the fallback.
pub fn sniff_delimiter(content: &str, columns: &[&str]) -> u8 {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return b',';
    };
    let sample: Vec<&str> = lines.take(8).collect();

    let mut best: Option<((usize, usize), u8)> = None;
    for delim in SNIFF_CANDIDATES {
        let names = split_line(header, delim);
        if names.len() <= 1 {
            continue;
        }
        let known = columns
            .iter()
            .filter(|c| names.iter().any(|n| n.trim() == **c))
            .count();
        let consistent = sample
            .iter()
            .filter(|line| split_line(line, delim).len() == names.len())
            .count();

        let score = (known, consistent);
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, delim));
        }
    }
    best.map_or(b',', |(_, delim)| delim)
}

/// Fields of one line under `delim`, honouring quotes.
fn split_line(line: &str, delim: u8) -> Vec<String> {
    csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map(|record| record.iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Header-row CSV over an in-memory string.
///
/// Empty lines are skipped. Rows may be shorter or longer than the header:
/// only the columns a row actually has are keyed, and surplus fields are
/// ignored, so a short row simply lacks the trailing columns.
pub struct DelimitedText<'a> {
    reader: csv::Reader<&'a [u8]>,
    headers: Vec<String>,
}

impl<'a> DelimitedText<'a> {
    pub fn open(content: &'a str, delimiter: u8) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        Ok(Self { reader, headers })
    }

    /// Trimmed header names, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows keyed by header. Later duplicate headers overwrite earlier ones.
    pub fn into_rows(self) -> impl Iterator<Item = Result<RawRow, csv::Error>> + 'a {
        let headers = self.headers;
        self.reader.into_records().map(move |record| {
            let record = record?;
            Ok(headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect())
        })
    }
}
