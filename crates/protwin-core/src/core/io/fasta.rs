use crate::core::models::sequence::{ProteinSequence, SequenceError};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub description: Option<String>,
    pub sequence: ProteinSequence,
}

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: FastaParseErrorKind },
    #[error("Invalid sequence in record '{id}': {source}")]
    Sequence {
        id: String,
        #[source]
        source: SequenceError,
    },
    #[error("No FASTA records found")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FastaParseErrorKind {
    #[error("Sequence data before the first '>' header")]
    DataBeforeHeader,
    #[error("Header has no identifier")]
    MissingIdentifier,
}

struct PendingRecord {
    id: String,
    description: Option<String>,
    body: String,
}

impl PendingRecord {
    fn finish(self) -> Result<FastaRecord, FastaError> {
        let sequence = ProteinSequence::parse(&self.body).map_err(|source| FastaError::Sequence {
            id: self.id.clone(),
            source,
        })?;
        Ok(FastaRecord {
            id: self.id,
            description: self.description,
            sequence,
        })
    }
}

pub fn read_from(reader: &mut impl BufRead) -> Result<Vec<FastaRecord>, FastaError> {
    let mut records = Vec::new();
    let mut pending: Option<PendingRecord> = None;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(done) = pending.take() {
                records.push(done.finish()?);
            }
            let mut parts = header.trim().splitn(2, char::is_whitespace);
            let id = parts.next().unwrap_or("").to_string();
            if id.is_empty() {
                return Err(FastaError::Parse {
                    line: line_num + 1,
                    kind: FastaParseErrorKind::MissingIdentifier,
                });
            }
            let description = parts
                .next()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string);
            pending = Some(PendingRecord {
                id,
                description,
                body: String::new(),
            });
        } else {
            match pending.as_mut() {
                Some(record) => record.body.push_str(line),
                None => {
                    return Err(FastaError::Parse {
                        line: line_num + 1,
                        kind: FastaParseErrorKind::DataBeforeHeader,
                    });
                }
            }
        }
    }

    if let Some(done) = pending.take() {
        records.push(done.finish()?);
    }
    if records.is_empty() {
        return Err(FastaError::Empty);
    }
    Ok(records)
}

pub fn parse_str(text: &str) -> Result<Vec<FastaRecord>, FastaError> {
    read_from(&mut text.as_bytes())
}

pub fn read_from_path(path: &Path) -> Result<Vec<FastaRecord>, FastaError> {
    let file = std::fs::File::open(path)?;
    read_from(&mut BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_multiline_records() {
        let text = ">sp|P1 first protein\nMKTII\nALSY\n\n>P2\nMVLSPADKTNVKAA\n";
        let records = parse_str(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "sp|P1");
        assert_eq!(records[0].description.as_deref(), Some("first protein"));
        assert_eq!(records[0].sequence.as_str(), "MKTIIALSY");
        assert_eq!(records[1].id, "P2");
        assert!(records[1].description.is_none());
    }

    #[test]
    fn skips_comment_lines() {
        let records = parse_str("; generated\n>P1\nMKT\n").unwrap();
        assert_eq!(records[0].sequence.as_str(), "MKT");
    }

    #[test]
    fn rejects_data_before_first_header() {
        let err = parse_str("MKT\n>P1\nMKT\n").unwrap_err();
        assert!(matches!(
            err,
            FastaError::Parse {
                line: 1,
                kind: FastaParseErrorKind::DataBeforeHeader
            }
        ));
    }

    #[test]
    fn rejects_header_without_identifier() {
        let err = parse_str(">\nMKT\n").unwrap_err();
        assert!(matches!(
            err,
            FastaError::Parse {
                kind: FastaParseErrorKind::MissingIdentifier,
                ..
            }
        ));
    }

    #[test]
    fn empty_record_body_is_an_invalid_sequence() {
        let err = parse_str(">P1\n>P2\nMKT\n").unwrap_err();
        match err {
            FastaError::Sequence { id, source } => {
                assert_eq!(id, "P1");
                assert_eq!(source, SequenceError::Empty);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(matches!(parse_str("\n\n"), Err(FastaError::Empty)));
    }

    #[test]
    fn reads_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seq.fasta");
        std::fs::write(&path, ">P1\nMKT\n").unwrap();
        let records = read_from_path(&path).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_from_path(&dir.path().join("missing.fasta"));
        assert!(matches!(result, Err(FastaError::Io(_))));
    }
}
