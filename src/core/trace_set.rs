// Public entry point: a TRS file opened for reading or for writing

use crate::core::config::ReaderConfig;
use crate::core::error::{Result, TrsError};
use crate::core::metadata::TrsMetaData;
use crate::core::reader::ReadSession;
use crate::core::tags::TrsTag;
use crate::core::trace::Trace;
use crate::core::writer::WriteSession;
use std::path::{Path, PathBuf};
use tracing::error;

const NOT_OPEN: &str = "TraceSet has not been opened or has been closed.";
const IN_WRITE_MODE: &str = "TraceSet is in write mode. Please open the TraceSet in read mode.";
const IN_READ_MODE: &str = "TraceSet is in read mode. Please open the TraceSet in write mode.";

enum State {
    Read(ReadSession),
    Write(WriteSession),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
    Closed,
}

/// A trace set backed by one file, open either for reading or for writing.
///
/// Dropping an open set closes it; errors raised while doing so are logged.
/// Call [`TraceSet::close`] to observe them.
pub struct TraceSet {
    path: PathBuf,
    metadata: TrsMetaData,
    state: State,
}

impl TraceSet {
    /// Opens an existing file for reading with the default window size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &ReaderConfig::default())
    }

    pub fn open_with(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let (session, metadata) = ReadSession::open(path, config)?;
        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            state: State::Read(session),
        })
    }

    /// Creates a new file. Its shape is taken from the first added trace.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with(path, TrsMetaData::new())
    }

    /// Creates a new file with caller-supplied metadata. Non-default values in
    /// `metadata` take precedence over the shape inferred from the first trace.
    pub fn create_with(path: impl AsRef<Path>, mut metadata: TrsMetaData) -> Result<Self> {
        let path = path.as_ref();
        let session = WriteSession::create(path, &mut metadata)?;
        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            state: State::Write(session),
        })
    }

    /// Writes `traces` to a new file in one go.
    pub fn save(path: impl AsRef<Path>, traces: impl IntoIterator<Item = Trace>) -> Result<()> {
        Self::save_with(path, traces, TrsMetaData::new())
    }

    pub fn save_with(
        path: impl AsRef<Path>,
        traces: impl IntoIterator<Item = Trace>,
        metadata: TrsMetaData,
    ) -> Result<()> {
        let mut trace_set = Self::create_with(path, metadata)?;
        for mut trace in traces {
            trace_set.add(&mut trace)?;
        }
        trace_set.close()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The header metadata. In read mode both parameter blocks are read-only.
    pub fn metadata(&self) -> &TrsMetaData {
        &self.metadata
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            State::Read(_) => Mode::Read,
            State::Write(_) => Mode::Write,
            State::Closed => Mode::Closed,
        }
    }

    /// Traces stored so far (write mode) or declared by the header (read mode).
    pub fn number_of_traces(&self) -> usize {
        self.metadata
            .get_int(TrsTag::NumberOfTraces)
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }

    /// Size of the parsed header, available in read mode.
    pub fn header_size(&self) -> Option<u64> {
        match &self.state {
            State::Read(session) => Some(session.header_size()),
            _ => None,
        }
    }

    /// Reads the trace at `index`.
    pub fn get(&mut self, index: usize) -> Result<Trace> {
        match &mut self.state {
            State::Read(session) => {
                let mut trace = session.get(index, &self.metadata)?;
                trace.set_trace_set_path(&self.path);
                Ok(trace)
            }
            State::Write(_) => Err(TrsError::argument(IN_WRITE_MODE)),
            State::Closed => Err(TrsError::argument(NOT_OPEN)),
        }
    }

    /// Appends `trace`. The title and string parameters of `trace` are fitted to
    /// the widths locked by the first trace.
    pub fn add(&mut self, trace: &mut Trace) -> Result<()> {
        match &mut self.state {
            State::Write(session) => session.add(trace, &mut self.metadata),
            State::Read(_) => Err(TrsError::argument(IN_READ_MODE)),
            State::Closed => Err(TrsError::argument(NOT_OPEN)),
        }
    }

    /// Finishes the session and releases the file. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Write(session) => session.close(&mut self.metadata),
            State::Read(session) => {
                session.close();
                Ok(())
            }
            State::Closed => Ok(()),
        }
    }
}

impl Drop for TraceSet {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("failed to close {}: {}", self.path.display(), e);
        }
    }
}
