//! Typed errors for the persistence layer.

use thiserror::Error;

/// Failures across the save/load protocol.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying stream failure (open, read, write, seek).
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Neither `.tlwf` nor `.tlwz` exists for the requested save.
    #[error("no save file found for '{name}'")]
    NotFound {
        /// Save name without extension.
        name: String,
    },

    /// The file does not start with the expected magic number.
    #[error("invalid magic number")]
    BadMagic,

    /// The file was written by an incompatible format version.
    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion {
        /// Stored major version.
        major: u16,
        /// Stored minor version.
        minor: u16,
    },

    /// The file was written on a machine with the opposite byte order.
    #[error("file written with incompatible byte order")]
    UnsupportedEndianness,

    /// A stored checksum does not match the recomputed one.
    #[error("checksum mismatch")]
    BadChecksum,

    /// End of file reached in the middle of a record.
    #[error("file truncated")]
    Truncated,

    /// CRC32 mismatch on one chunk's data block.
    #[error("chunk ({cx}, {cy}, {cz}) data is corrupt")]
    CorruptChunk {
        /// Chunk X coordinate.
        cx: i32,
        /// Chunk Y coordinate.
        cy: i32,
        /// Chunk Z coordinate.
        cz: i32,
    },

    /// The zlib codec failed or produced an unexpected size.
    #[error("compression failure: {0}")]
    Compression(String),

    /// The operation cannot be applied to this file.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl StorageError {
    /// Converts an I/O error into `Truncated` when it is an unexpected EOF.
    #[must_use]
    pub fn from_read(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(err)
        }
    }
}
