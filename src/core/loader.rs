//! Dataset loader: gzip-compressed JSONL into an in-memory collection.
//!
//! Ingestion is tolerant. A line that is not a valid record (bad JSON,
//! wrong field types, blank, or longer than the configured bound) is counted
//! and skipped; only failures to open or decompress the file abort the load.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use flate2::bufread::MultiGzDecoder;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::domain::{Collection, Record};

/// Gzip member header magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Default maximum line length (1 MiB)
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Errors that abort a load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Dataset {} is not a valid gzip stream: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse classification of a [`LoadError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Source missing or unreadable
    Io,

    /// Source is not a valid gzip stream
    Format,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::Io { .. } => LoadErrorKind::Io,
            LoadError::Format { .. } => LoadErrorKind::Format,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Format { path, .. } => path,
        }
    }

    /// Classify a read error raised while pulling bytes through the decoder.
    ///
    /// flate2 reports bad headers, corrupt deflate data and checksum
    /// mismatches as `InvalidInput`, and truncated members as
    /// `UnexpectedEof`. Anything else came from the file itself.
    fn from_read(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::InvalidInput
            | io::ErrorKind::InvalidData
            | io::ErrorKind::UnexpectedEof => LoadError::Format {
                path: path.to_path_buf(),
                source,
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Loader settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Longest line (excluding the newline) that will be parsed
    pub max_line_bytes: NonZeroUsize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_line_bytes: NonZeroUsize::new(DEFAULT_MAX_LINE_BYTES)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Line accounting for one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Lines read from the decompressed stream
    pub lines: usize,

    /// Lines that became records
    pub loaded: usize,

    /// Lines that failed to parse as a record
    pub malformed: usize,

    /// Lines skipped for exceeding `max_line_bytes`
    pub oversized: usize,
}

impl LoadStats {
    /// Total lines that did not produce a record
    pub fn skipped(&self) -> usize {
        self.malformed + self.oversized
    }
}

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub collection: Collection,
    pub stats: LoadStats,
}

/// Reads a gzip-compressed JSONL dataset into a [`Collection`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    options: LoaderOptions,
}

impl Loader {
    /// Create a loader with the given options
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Create a loader with a custom line bound
    pub fn with_max_line_bytes(max_line_bytes: NonZeroUsize) -> Self {
        Self::new(LoaderOptions { max_line_bytes })
    }

    /// Load the dataset at `path`.
    ///
    /// Blocking. Either the whole stream is decoded and a collection is
    /// returned, or an error is returned and nothing is kept.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadOutcome, LoadError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let reader = self.open_decoder(path, file)?;
        let outcome = self.read_records(path, reader)?;

        info!(
            lines = outcome.stats.lines,
            loaded = outcome.stats.loaded,
            malformed = outcome.stats.malformed,
            oversized = outcome.stats.oversized,
            "Dataset loaded"
        );

        Ok(outcome)
    }

    /// Check the gzip magic and wrap the file in a multi-member decoder
    fn open_decoder(&self, path: &Path, mut file: File) -> Result<impl BufRead, LoadError> {
        let mut magic = [0u8; 2];
        file.read_exact(&mut magic)
            .map_err(|source| LoadError::from_read(path, source))?;

        if magic != GZIP_MAGIC {
            return Err(LoadError::Format {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidData, "missing gzip magic bytes"),
            });
        }

        let compressed = BufReader::new(Cursor::new(magic).chain(file));
        Ok(BufReader::new(MultiGzDecoder::new(compressed)))
    }

    /// Fold the line stream into records plus skip counts
    fn read_records<R: BufRead>(
        &self,
        path: &Path,
        mut reader: R,
    ) -> Result<LoadOutcome, LoadError> {
        let max = self.options.max_line_bytes.get();
        let mut records = Vec::new();
        let mut stats = LoadStats::default();
        let mut buf = Vec::new();

        while let Some(status) = read_bounded_line(&mut reader, &mut buf, max)
            .map_err(|source| LoadError::from_read(path, source))?
        {
            stats.lines += 1;

            if status == LineStatus::Oversized {
                stats.oversized += 1;
                warn!(line = stats.lines, max_line_bytes = max, "Skipping oversized line");
                continue;
            }

            let line = buf.strip_suffix(b"\r").unwrap_or(&buf[..]);
            match Record::from_json_line(line) {
                Ok(record) => {
                    stats.loaded += 1;
                    records.push(record);
                }
                Err(e) => {
                    stats.malformed += 1;
                    debug!(line = stats.lines, error = %e, "Skipping malformed line");
                }
            }
        }

        Ok(LoadOutcome {
            collection: Collection::from(records),
            stats,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStatus {
    /// `buf` holds the whole line without its newline
    Complete,

    /// Line exceeded the bound and was discarded; `buf` is empty
    Oversized,
}

/// Read one `\n`-terminated line into `buf`, keeping at most `max` bytes.
///
/// Bytes past the bound are consumed but never buffered, so an arbitrarily
/// long line costs at most `max` bytes of memory. Returns `None` at end of
/// stream. A final line without a trailing newline is still returned.
fn read_bounded_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max: usize,
) -> io::Result<Option<LineStatus>> {
    buf.clear();
    let mut oversized = false;
    let mut read_any = false;

    loop {
        let (used, found_newline) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }
            read_any = true;

            let newline = available.iter().position(|&b| b == b'\n');
            let chunk = &available[..newline.unwrap_or(available.len())];

            if !oversized {
                if buf.len() + chunk.len() > max {
                    oversized = true;
                    buf.clear();
                } else {
                    buf.extend_from_slice(chunk);
                }
            }

            match newline {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };

        reader.consume(used);
        if found_newline {
            break;
        }
    }

    if !read_any {
        return Ok(None);
    }

    Ok(Some(if oversized {
        LineStatus::Oversized
    } else {
        LineStatus::Complete
    }))
}
