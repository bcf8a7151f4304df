use crate::file_set::FileSet;
use crate::record::SequenceRecord;
use log::debug;
use std::io;

/// A reader positioned in one input file, yielding records in bursts.
///
/// Implementations wrap the per-format tokenizer. A burst shorter than
/// `max_records` signals end of file. Dropping the source closes the
/// underlying handle.
pub trait SequenceSource {
    /// Reads up to `max_records` records, returning fewer only at end of
    /// file and an empty burst once the file is drained.
    fn read_burst(&mut self, max_records: usize) -> io::Result<Vec<SequenceRecord>>;
}

/// The records produced by one pull, all read from the same file.
#[derive(Debug)]
pub struct ScanChunk {
    /// The records, at most the pull capacity.
    pub records: Vec<SequenceRecord>,
    /// Path of the file the records came from; empty for the terminal chunk.
    pub file_name: String,
}

impl ScanChunk {
    /// True for the chunks an exhausted cursor keeps returning.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

enum CursorState<S> {
    Scanning { nth_file: usize, source: S },
    Exhausted,
}

/// Cursor that advances a scan across every file of a [`FileSet`] in order.
///
/// Each pull reads from exactly one file. When a file runs out mid-pull the
/// cursor opens the next file but does not read from it until the following
/// pull, so a pull may return fewer rows than its capacity at a file
/// boundary. This keeps the per-pull bookkeeping to a single reader at the
/// cost of under-filled batches at boundaries, which is accepted.
///
/// Exhaustion is terminal: once every file has been drained, pulls return
/// empty chunks forever. The cursor owns the active reader exclusively; the
/// drained reader is dropped, closing its handle, before the next file is
/// opened.
pub struct MultiFileScanCursor<S, F>
where
    S: SequenceSource,
    F: FnMut(&str) -> io::Result<S>,
{
    file_set: FileSet,
    open: F,
    state: CursorState<S>,
}

impl<S, F> MultiFileScanCursor<S, F>
where
    S: SequenceSource,
    F: FnMut(&str) -> io::Result<S>,
{
    /// Opens a cursor over `file_set`, positioned at its first file.
    pub fn open(file_set: FileSet, mut open: F) -> io::Result<Self> {
        let source = open(&file_set.paths()[0])?;
        Ok(Self {
            file_set,
            open,
            state: CursorState::Scanning { nth_file: 0, source },
        })
    }

    /// Pulls the next chunk of at most `capacity` records.
    pub fn pull(&mut self, capacity: usize) -> io::Result<ScanChunk> {
        let CursorState::Scanning { nth_file, source } = &mut self.state else {
            return Ok(ScanChunk {
                records: Vec::new(),
                file_name: String::new(),
            });
        };
        let current = *nth_file;
        let file_name = self.file_set.paths()[current].clone();
        let records = source.read_burst(capacity)?;

        // Fewer records than requested means the current file is drained. The
        // next file is opened now but not read until the following pull.
        if records.len() < capacity {
            let next_file = current + 1;
            if next_file < self.file_set.len() {
                debug!(
                    "scan advancing from {} to {}",
                    file_name,
                    self.file_set.paths()[next_file]
                );
                // Drop the drained source so its handle closes before the
                // replacement opens.
                self.state = CursorState::Exhausted;
                let source = (self.open)(&self.file_set.paths()[next_file])?;
                self.state = CursorState::Scanning {
                    nth_file: next_file,
                    source,
                };
            } else {
                debug!("scan exhausted after {}", file_name);
                self.state = CursorState::Exhausted;
            }
        }

        Ok(ScanChunk { records, file_name })
    }
}
