//! # Tileland Storage
//!
//! Versioned binary persistence for worlds.
//!
//! ## Formats
//!
//! - `.tlwf`: the uncompressed authoritative container - header, optional
//!   world-metadata record, per-chunk index and raw chunk data, all protected
//!   by CRC32
//! - `.tlwz`: a zlib-compressed wrapper around the bytes of a `.tlwf`,
//!   carrying sizes and checksums of both payloads
//!
//! ## Save / Load Protocol
//!
//! Saving serializes the world to `.tlwf`, then compresses those bytes into
//! `.tlwz`; the `.tlwf` doubles as a fast-load cache and may be deleted after
//! archiving. Loading prefers the `.tlwf` and falls back to decompressing the
//! `.tlwz` (recreating the `.tlwf`) when the former is missing or corrupt.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod binary_io;
pub mod checksum;
pub mod error;
pub mod format;
pub mod persistence;
pub mod serializer;

pub use binary_io::{BinaryReader, BinaryWriter};
pub use checksum::{crc32, xor_checksum};
pub use error::StorageError;
pub use format::{ChunkIndexEntry, CompressedFileHeader, FileHeader};
pub use persistence::{load_map, save_map, tlwf_path, tlwz_path};
pub use serializer::{load_world, read_save_summary, save_world, update_metadata, SaveSummary};
