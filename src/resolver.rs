//! Resolution of a provisioner block into an ordered sequence of scripts.
//!
//! Both entry points share [`ProvisionerConfig::mode`] for mode detection:
//! - [`resolve_streams`] yields one [`ScriptBody`] per script. Files are
//!   opened here and read lazily by the consumer.
//! - [`resolve_text`] drains those bodies into strings; file contents must
//!   be valid UTF-8.
//!
//! Script files are opened relative to the process working directory and are
//! never modified, cached or re-encoded.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::sync::atomic::{AtomicBool, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, trace};

use crate::config::{ProvisionerConfig, ScriptMode};
use crate::error::RemoteExecError;

/// A single unit of executable content.
///
/// Implements [`Read`]; each body is meant to be drained once by the
/// transport and then dropped, which releases any underlying file handle.
#[derive(Debug)]
pub enum ScriptBody {
    /// An `inline` command, verbatim.
    Inline(Cursor<String>),
    /// An open script file.
    File {
        /// Path the file was opened from.
        path: Utf8PathBuf,
        /// Buffered handle positioned at the start of the file.
        reader: BufReader<File>,
    },
}

impl ScriptBody {
    /// Wraps an inline command as an in-memory body.
    pub fn inline(command: impl Into<String>) -> Self {
        Self::Inline(Cursor::new(command.into()))
    }

    /// Opens a script file.
    pub fn open(path: &Utf8Path) -> Result<Self, RemoteExecError> {
        let file = File::open(path)
            .map_err(|e| RemoteExecError::io(format!("failed to open script: {}", path), e))?;
        Ok(Self::File {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
        })
    }

    /// Returns a human-readable name for this body.
    pub fn name(&self) -> &str {
        match self {
            Self::Inline(_) => "<inline>",
            Self::File { path, .. } => path.as_str(),
        }
    }

    /// Drains the remaining content into a string.
    pub fn into_string(mut self) -> Result<String, RemoteExecError> {
        let mut content = String::new();
        self.read_to_string(&mut content).map_err(|e| {
            RemoteExecError::io(format!("failed to read script: {}", self.name()), e)
        })?;
        Ok(content)
    }
}

impl Read for ScriptBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Inline(cursor) => cursor.read(buf),
            Self::File { reader, .. } => reader.read(buf),
        }
    }
}

/// Resolves a provisioner block into readable script bodies, in order.
///
/// - `inline`: one in-memory body per command, no file I/O.
/// - `script`: exactly one body for the file.
/// - `scripts`: one body per path; duplicates are opened independently.
///
/// Fails with [`RemoteExecError::Config`] if zero or several modes are set,
/// and with [`RemoteExecError::Io`] naming the first path that cannot be
/// opened. Paths after a failing one are not opened.
pub fn resolve_streams(config: &ProvisionerConfig) -> Result<Vec<ScriptBody>, RemoteExecError> {
    resolve(config, None)
}

/// Like [`resolve_streams`], but checks `cancel` before each file open.
///
/// A set flag aborts with [`RemoteExecError::Cancelled`]; bodies opened so
/// far are dropped, closing their files. Reads already in progress are not
/// interrupted since none happen here.
pub fn resolve_streams_cancellable(
    config: &ProvisionerConfig,
    cancel: &AtomicBool,
) -> Result<Vec<ScriptBody>, RemoteExecError> {
    resolve(config, Some(cancel))
}

/// Resolves a provisioner block into script texts, in order.
///
/// Inline commands are returned verbatim. File modes keep their cardinality
/// (one string per file) and require UTF-8 content; anything else fails with
/// [`RemoteExecError::Io`] naming the file.
pub fn resolve_text(config: &ProvisionerConfig) -> Result<Vec<String>, RemoteExecError> {
    if let ScriptMode::Inline(commands) = config.mode()? {
        debug!("resolved {} inline command(s)", commands.len());
        return Ok(commands.to_vec());
    }

    resolve_streams(config)?
        .into_iter()
        .map(ScriptBody::into_string)
        .collect()
}

fn resolve(
    config: &ProvisionerConfig,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<ScriptBody>, RemoteExecError> {
    let mode = config.mode()?;
    info!("resolving scripts (mode: {})", mode);

    let bodies: Vec<ScriptBody> = match mode {
        ScriptMode::Inline(commands) => commands.iter().map(ScriptBody::inline).collect(),
        ScriptMode::Script(path) => vec![open_checked(path, cancel)?],
        ScriptMode::Scripts(paths) => {
            let mut bodies = Vec::with_capacity(paths.len());
            for path in paths {
                bodies.push(open_checked(path, cancel)?);
            }
            bodies
        }
    };

    debug!("resolved {} script(s)", bodies.len());
    Ok(bodies)
}

fn open_checked(path: &Utf8Path, cancel: Option<&AtomicBool>) -> Result<ScriptBody, RemoteExecError> {
    if cancel.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
        return Err(RemoteExecError::Cancelled(format!("before opening script: {}", path)));
    }
    trace!("opening script: {}", path);
    ScriptBody::open(path)
}
