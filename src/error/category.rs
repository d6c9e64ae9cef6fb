//! Error classification used to decide how far a failure propagates.

use strum::Display;

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing credential or bad invocation; reported before any connection.
    Configuration,
    /// Subprocess spawn, stream closure, or handshake failure.
    Transport,
    /// Application-level error reported by the server.
    Remote,
    /// The LLM backend call failed.
    Backend,
    Internal,
}

impl ErrorCategory {
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Configuration | Self::Transport)
    }
}
