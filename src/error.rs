use thiserror::Error;

/// Errors returned by the interpreter.
///
/// Structural noise in the packet stream itself (unknown instruction codes,
/// off-grid tile coordinates) is never an `Error`: it's silently discarded
/// per the interpreter's forward-compatibility contract and, at most,
/// logged. Only conditions a caller can actually act on reach here.
#[derive(Debug, Error)]
pub enum CdgError {
    /// `render_at` was called before a successful `open`.
    #[error("no packet source bound: call open() first")]
    NotOpen,
    /// I/O error reading the packet stream.
    #[error("I/O error reading packet stream: {0}")]
    Io(#[from] std::io::Error),
    /// I/O error reading a zip archive entry.
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// The requested entry name was not present in the archive.
    #[error("entry {0:?} not found in archive")]
    ZipEntryNotFound(String),
}

/// A specialised `Result` type for interpreter operations.
pub type Result<T> = ::std::result::Result<T, CdgError>;
