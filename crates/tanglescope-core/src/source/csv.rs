//! CSV message-dump source.
//!
//! Reads `(message_id, message_hex, metadata)` rows from a CSV export of a
//! node database. The first line is treated as a header and skipped; rows
//! with fewer than three fields are a source error. All file I/O lives
//! here, outside the decode path.

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use super::{MessageRow, RowSource, SourceError};

pub struct CsvFileSource {
    reader: Reader<File>,
    record: StringRecord,
}

impl CsvFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;
        Ok(Self {
            reader,
            record: StringRecord::new(),
        })
    }
}

impl RowSource for CsvFileSource {
    fn next_row(&mut self) -> Result<Option<MessageRow>, SourceError> {
        if !self.reader.read_record(&mut self.record).map_err(csv_error)? {
            return Ok(None);
        }
        row_from_record(&self.record).map(Some)
    }
}

fn row_from_record(record: &StringRecord) -> Result<MessageRow, SourceError> {
    match (record.get(0), record.get(1), record.get(2)) {
        (Some(message_id), Some(message_hex), Some(metadata)) => Ok(MessageRow {
            message_id: message_id.to_string(),
            message_hex: message_hex.to_string(),
            metadata: metadata.to_string(),
        }),
        _ => {
            let line = record
                .position()
                .map(|position| position.line().to_string())
                .unwrap_or_else(|| "?".to_string());
            Err(SourceError::Csv(format!(
                "row at line {line}: expected 3 fields, got {}",
                record.len()
            )))
        }
    }
}

fn csv_error(err: csv::Error) -> SourceError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => SourceError::Io(io),
        _ => SourceError::Csv(message),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::CsvFileSource;
    use crate::source::{RowSource, SourceError};

    fn source_for(contents: &str) -> (NamedTempFile, CsvFileSource) {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write csv");
        let source = CsvFileSource::open(file.path()).expect("open csv");
        (file, source)
    }

    #[test]
    fn reads_rows_after_header() {
        let (_file, mut source) = source_for(
            "message_id,message,metadata\n\
             aa11,0x0102,meta1\n\
             bb22,0x0304,meta2\n",
        );

        let row = source.next_row().unwrap().expect("first row");
        assert_eq!(row.message_id, "aa11");
        assert_eq!(row.message_hex, "0x0102");
        assert_eq!(row.metadata, "meta1");

        let row = source.next_row().unwrap().expect("second row");
        assert_eq!(row.message_id, "bb22");

        assert!(source.next_row().unwrap().is_none());
    }

    #[test]
    fn short_row_is_a_source_error() {
        let (_file, mut source) = source_for(
            "message_id,message,metadata\n\
             aa11,0x0102\n",
        );
        let err = source.next_row().unwrap_err();
        assert!(matches!(err, SourceError::Csv(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CsvFileSource::open(std::path::Path::new("/nonexistent/messages.csv"))
            .err()
            .expect("open should fail");
        assert!(matches!(err, SourceError::Io(_)));
    }
}
