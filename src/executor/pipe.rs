//! Streaming of script output into the log.

use std::io::{BufRead, BufReader, Read};

/// Output stream of a running script.
#[derive(Clone, Copy)]
pub(super) enum StreamType {
    Stdout,
    Stderr,
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Extracts a human-readable message from a thread panic payload.
pub(super) fn panic_message(err: &(dyn std::any::Any + Send)) -> &str {
    err.downcast_ref::<&str>()
        .copied()
        .or_else(|| err.downcast_ref::<String>().map(|s| s.as_str()))
        .unwrap_or("unknown panic")
}

/// Reads a pipe line by line and logs each line as it arrives.
///
/// stdout goes to INFO and stderr to WARN. Output is decoded lossily, and a
/// read error ends streaming without failing the command: success is decided
/// by the exit status alone.
pub(super) fn read_pipe_to_log<R: Read>(pipe: Option<R>, stream_type: StreamType, command: &str) {
    let Some(pipe) = pipe else {
        tracing::error!(stream = %stream_type, command, "pipe was not captured");
        return;
    };

    let mut reader = BufReader::new(pipe);
    let mut line_buf = Vec::new();

    loop {
        line_buf.clear();
        match reader.read_until(b'\n', &mut line_buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = line_buf.strip_suffix(b"\n").unwrap_or(&line_buf);
                let text = String::from_utf8_lossy(line);
                let text = text.trim_end_matches('\r');
                match stream_type {
                    StreamType::Stdout => tracing::info!(stream = %stream_type, "{}", text),
                    StreamType::Stderr => tracing::warn!(stream = %stream_type, "{}", text),
                }
            }
            Err(e) => {
                tracing::error!(stream = %stream_type, command, error = %e, "I/O error, stopping read");
                break;
            }
        }
    }
}
