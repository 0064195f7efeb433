//! Generic RF2 snapshot file parser.
//!
//! Streams rows from a tab-delimited release file into typed records. The
//! parser only understands the file format; activity and module filtering
//! is the concept cache's job, because different consumers apply different
//! rules to the same file kinds.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{FlattenError, FlattenResult};

/// Trait for types that can be parsed from release file records.
pub trait Rf2Record: Sized {
    /// Expected column names for this record type.
    const EXPECTED_COLUMNS: &'static [&'static str];

    /// Parses a record from a tab-separated row.
    fn from_record(record: &StringRecord) -> FlattenResult<Self>;
}

/// A streaming parser for one release file.
///
/// Reads record-by-record; a malformed row is fatal and carries file/line
/// context. Iterate it, or drain it with [`Rf2FileParser::for_each_row`].
pub struct Rf2FileParser<R: Read, T: Rf2Record> {
    reader: Reader<R>,
    file_name: String,
    // Line of the most recently read record, counting the header as line 1.
    line: usize,
    _marker: PhantomData<T>,
}

impl<T: Rf2Record> Rf2FileParser<BufReader<File>, T> {
    /// Opens a release file for parsing.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its header row does
    /// not match `T::EXPECTED_COLUMNS`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> FlattenResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_reader(BufReader::new(file), file_name)
    }
}

impl<R: Read, T: Rf2Record> Rf2FileParser<R, T> {
    /// Creates a parser from a reader; `file_name` is used in error context.
    pub fn from_reader(reader: R, file_name: String) -> FlattenResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader)?;

        Ok(Self {
            reader: csv_reader,
            file_name,
            line: 1,
            _marker: PhantomData,
        })
    }

    /// Validates that the file has the expected column headers.
    fn validate_headers(reader: &mut Reader<R>) -> FlattenResult<()> {
        let headers = reader.headers()?;
        let expected = T::EXPECTED_COLUMNS;

        if headers.len() < expected.len() {
            return Err(FlattenError::InvalidHeader {
                expected: expected.len(),
                found: headers.len(),
            });
        }

        for (i, expected_col) in expected.iter().enumerate() {
            let found = headers.get(i).unwrap_or("");
            // Tolerate a UTF-8 BOM at the start of the file
            let found = found.trim_start_matches('\u{feff}');
            if found != *expected_col {
                return Err(FlattenError::UnexpectedColumn {
                    position: i,
                    expected: expected_col.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Applies `handler` to every row in the file, in order.
    ///
    /// The first parse failure or handler error aborts the drain.
    pub fn for_each_row<F>(mut self, mut handler: F) -> FlattenResult<usize>
    where
        F: FnMut(T) -> FlattenResult<()>,
    {
        let mut count = 0;
        for row in self.by_ref() {
            handler(row?)?;
            count += 1;
        }
        Ok(count)
    }
}

impl<R: Read, T: Rf2Record> Iterator for Rf2FileParser<R, T> {
    type Item = FlattenResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.line += 1;

                    // Skip blank lines
                    if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }

                    return Some(
                        T::from_record(&record).map_err(|e| e.at(&self.file_name, self.line)),
                    );
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Helper functions for parsing release file field values.
pub mod field {
    use amt_types::SctId;

    use crate::types::{FlattenError, FlattenResult};

    /// Parses an SCTID.
    pub fn sctid(value: &str) -> FlattenResult<SctId> {
        value
            .parse::<u64>()
            .map_err(|_| FlattenError::InvalidSctId {
                value: value.to_string(),
            })
    }

    /// Parses a boolean from "0" or "1".
    pub fn boolean(value: &str) -> FlattenResult<bool> {
        match value {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(FlattenError::InvalidBoolean {
                value: value.to_string(),
            }),
        }
    }

    /// Parses an effective time (YYYYMMDD) as u32.
    pub fn effective_time(value: &str) -> FlattenResult<u32> {
        if value.len() != 8 {
            return Err(FlattenError::InvalidDate {
                value: value.to_string(),
            });
        }
        value.parse::<u32>().map_err(|_| FlattenError::InvalidDate {
            value: value.to_string(),
        })
    }

    /// Parses an integer value.
    pub fn integer<T: std::str::FromStr>(value: &str) -> FlattenResult<T> {
        value
            .parse::<T>()
            .map_err(|_| FlattenError::InvalidInteger {
                value: value.to_string(),
            })
    }
}
