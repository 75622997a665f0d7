//! # Persistence Manager
//!
//! The two-stage save/load protocol over the serializer:
//!
//! - **Save**: serialize to `<dir>/<name>.tlwf`, read it back whole,
//!   zlib-compress into `<dir>/<name>.tlwz` with checksums of both payloads,
//!   optionally delete the `.tlwf`.
//! - **Load**: try the `.tlwf` directly (fast path); if missing or invalid,
//!   validate and decompress the `.tlwz`, rewrite the `.tlwf` from it and
//!   load that.
//!
//! Corruption in the `.tlwf` falls back to the archive; corruption in the
//! `.tlwz` is fatal for the save. A `.tlwz` that fails mid-write is removed
//! so no partial archive survives.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use tileland_world::World;

use crate::binary_io::{BinaryReader, BinaryWriter};
use crate::checksum::crc32;
use crate::error::StorageError;
use crate::format::{
    CompressedFileHeader, COMPRESSED_MAGIC_NUMBER, COMPRESSED_VERSION_MAJOR,
    COMPRESSED_VERSION_MINOR, COMPRESSION_TYPE_ZLIB,
};
use crate::serializer::{load_world, save_world};

/// Full path of the uncompressed save file.
#[must_use]
pub fn tlwf_path(save_name: &str, directory: &Path) -> PathBuf {
    directory.join(format!("{save_name}.tlwf"))
}

/// Full path of the compressed archive file.
#[must_use]
pub fn tlwz_path(save_name: &str, directory: &Path) -> PathBuf {
    directory.join(format!("{save_name}.tlwz"))
}

/// Saves a world under a save name: `.tlwf` first, then the `.tlwz` archive.
///
/// With `delete_tlwf` the intermediate `.tlwf` is removed after the archive
/// is written; a failed removal is only a warning.
///
/// # Errors
///
/// Propagates serializer and I/O failures; compression failures surface as
/// [`StorageError::Compression`].
pub fn save_map(
    world: &World,
    save_name: &str,
    directory: &Path,
    delete_tlwf: bool,
) -> Result<(), StorageError> {
    std::fs::create_dir_all(directory)?;
    let tlwf = tlwf_path(save_name, directory);
    let tlwz = tlwz_path(save_name, directory);

    tracing::info!(save = save_name, "saving world");
    save_world(world, &tlwf)?;

    let uncompressed = std::fs::read(&tlwf)?;
    let uncompressed_checksum = crc32(&uncompressed);

    let compressed = compress(&uncompressed)?;
    let compressed_checksum = crc32(&compressed);

    let header = CompressedFileHeader {
        magic: COMPRESSED_MAGIC_NUMBER,
        version_major: COMPRESSED_VERSION_MAJOR,
        version_minor: COMPRESSED_VERSION_MINOR,
        compression_type: COMPRESSION_TYPE_ZLIB,
        reserved1: 0,
        reserved2: 0,
        uncompressed_size: uncompressed.len() as u64,
        uncompressed_checksum,
        compressed_size: compressed.len() as u64,
        compressed_checksum,
    };

    if let Err(err) = write_archive(&tlwz, &header, &compressed) {
        // Never leave a partial archive behind.
        std::fs::remove_file(&tlwz).ok();
        return Err(err);
    }

    if delete_tlwf {
        if let Err(err) = std::fs::remove_file(&tlwf) {
            tracing::warn!(path = %tlwf.display(), error = %err, "failed to delete .tlwf");
        }
    }

    tracing::info!(
        save = save_name,
        uncompressed = uncompressed.len(),
        compressed = compressed.len(),
        "world saved"
    );
    Ok(())
}

/// Loads a world by save name, preferring the `.tlwf` and falling back to
/// the `.tlwz` archive.
///
/// # Errors
///
/// Returns [`StorageError::NotFound`] when neither file exists; otherwise
/// the archive validation error.
pub fn load_map(save_name: &str, directory: &Path) -> Result<World, StorageError> {
    let tlwf = tlwf_path(save_name, directory);
    let tlwz = tlwz_path(save_name, directory);

    if tlwf.exists() {
        match load_world(&tlwf) {
            Ok(world) => {
                tracing::info!(save = save_name, "loaded world from .tlwf");
                return Ok(world);
            }
            Err(err) => {
                tracing::warn!(
                    save = save_name,
                    error = %err,
                    "direct .tlwf load failed, trying .tlwz archive"
                );
            }
        }
    }

    if tlwz.exists() {
        let world = load_from_archive(&tlwz, &tlwf)?;
        tracing::info!(save = save_name, "loaded world from .tlwz archive");
        return Ok(world);
    }

    Err(StorageError::NotFound {
        name: save_name.to_string(),
    })
}

fn compress(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|()| encoder.finish())
        .map_err(|e| StorageError::Compression(e.to_string()))
}

fn decompress(data: &[u8], expected_size: u64) -> Result<Vec<u8>, StorageError> {
    let mut decoder = ZlibDecoder::new(Vec::new());
    let out = decoder
        .write_all(data)
        .and_then(|()| decoder.finish())
        .map_err(|e| StorageError::Compression(e.to_string()))?;
    if out.len() as u64 != expected_size {
        return Err(StorageError::Compression(format!(
            "decompressed size mismatch: expected {expected_size}, got {}",
            out.len()
        )));
    }
    Ok(out)
}

fn write_archive(
    path: &Path,
    header: &CompressedFileHeader,
    payload: &[u8],
) -> Result<(), StorageError> {
    let mut writer = BinaryWriter::create(path)?;
    writer.write_pod(header)?;
    writer.write_bytes(payload)?;
    writer.flush()?;
    Ok(())
}

fn load_from_archive(tlwz: &Path, tlwf: &Path) -> Result<World, StorageError> {
    let mut reader = BinaryReader::open(tlwz)?;
    let header: CompressedFileHeader = reader.read_pod().map_err(StorageError::from_read)?;

    let magic = header.magic;
    if magic != COMPRESSED_MAGIC_NUMBER {
        return Err(StorageError::BadMagic);
    }
    let (major, minor) = (header.version_major, header.version_minor);
    if major != COMPRESSED_VERSION_MAJOR || minor > COMPRESSED_VERSION_MINOR {
        return Err(StorageError::UnsupportedVersion { major, minor });
    }
    let compression_type = header.compression_type;
    if compression_type != COMPRESSION_TYPE_ZLIB {
        return Err(StorageError::Compression(format!(
            "unsupported compression type {compression_type}"
        )));
    }

    let compressed_size = header.compressed_size;
    let mut compressed = vec![0u8; compressed_size as usize];
    reader
        .read_bytes(&mut compressed)
        .map_err(StorageError::from_read)?;

    let compressed_checksum = header.compressed_checksum;
    if crc32(&compressed) != compressed_checksum {
        return Err(StorageError::BadChecksum);
    }

    let decompressed = decompress(&compressed, header.uncompressed_size)?;
    let uncompressed_checksum = header.uncompressed_checksum;
    if crc32(&decompressed) != uncompressed_checksum {
        return Err(StorageError::BadChecksum);
    }

    // Rebuild the fast-load cache, then load through the normal path.
    std::fs::write(tlwf, &decompressed)?;
    load_world(tlwf)
}
