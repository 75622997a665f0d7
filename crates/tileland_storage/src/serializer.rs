//! # World Serializer
//!
//! Reads and writes the `.tlwf` container: header, optional world-metadata
//! record, chunk-data region and chunk index.
//!
//! ## File Layout
//!
//! ```text
//! +-----------------+ 0
//! | FileHeader      |
//! +-----------------+ metadata_offset (0 = absent)
//! | u64 record len  |
//! | metadata fields |
//! +-----------------+ data_offset
//! | chunk 0 bytes   |
//! | chunk 1 bytes   |
//! | ...             |
//! +-----------------+ index_offset
//! | u64 count       |
//! | ChunkIndexEntry |
//! | ...             |
//! +-----------------+
//! ```
//!
//! The header is written last so its offsets and checksum are final; a
//! zeroed placeholder reserves the slot during the forward pass.

use std::io::SeekFrom;
use std::path::Path;

use tileland_world::{generator_from_metadata, Chunk, ChunkCoord, World, WorldMetadata};

use crate::binary_io::{BinaryReader, BinaryWriter};
use crate::checksum::crc32;
use crate::error::StorageError;
use crate::format::{
    local_endianness, ChunkIndexEntry, FileHeader, CHECKSUM_TYPE_CRC32, FORMAT_VERSION_MAJOR,
    FORMAT_VERSION_MINOR, MAGIC_NUMBER,
};

/// Lightweight description of a save file, read without loading chunk
/// bodies. Used by save-manager previews.
#[derive(Debug, Clone)]
pub struct SaveSummary {
    /// Stored major format version.
    pub version_major: u16,
    /// Stored minor format version.
    pub version_minor: u16,
    /// Number of chunks in the index.
    pub chunk_count: u64,
    /// World generation metadata, if the file carries any.
    pub metadata: Option<WorldMetadata>,
}

/// Serializes a world into a `.tlwf` file, replacing any existing file.
///
/// Chunks are written in `(cz, cy, cx)` order so identical worlds produce
/// identical files.
///
/// # Errors
///
/// Returns [`StorageError::Io`] on any stream failure.
pub fn save_world(world: &World, path: &Path) -> Result<(), StorageError> {
    let mut writer = BinaryWriter::create(path)?;

    let mut header = FileHeader {
        magic: MAGIC_NUMBER,
        version_major: FORMAT_VERSION_MAJOR,
        version_minor: FORMAT_VERSION_MINOR,
        endianness: local_endianness(),
        checksum_type: CHECKSUM_TYPE_CRC32,
        ..FileHeader::default()
    };

    // Reserve the header slot; the real header lands here at the end.
    writer.write_pod(&FileHeader::default())?;

    if let Some(meta) = world.metadata() {
        header.metadata_offset = writer.position()?;
        let body = encode_metadata(meta);
        writer.write_pod(&(body.len() as u64))?;
        writer.write_bytes(&body)?;
    }

    header.data_offset = writer.position()?;
    let mut chunks: Vec<(ChunkCoord, &Chunk)> = world.iter().collect();
    chunks.sort_by_key(|(coord, _)| (coord.cz, coord.cy, coord.cx));

    let mut index = Vec::with_capacity(chunks.len());
    for (coord, chunk) in chunks {
        let offset = writer.position()?;
        let bytes = chunk.as_bytes();
        writer.write_bytes(bytes)?;
        index.push(ChunkIndexEntry {
            cx: coord.cx,
            cy: coord.cy,
            cz: coord.cz,
            offset,
            size: bytes.len() as u32,
            checksum: crc32(bytes),
        });
    }

    header.index_offset = writer.position()?;
    writer.write_pod(&(index.len() as u64))?;
    for entry in &index {
        writer.write_pod(entry)?;
    }

    header.header_checksum = header_checksum(&header);
    writer.seek(SeekFrom::Start(0))?;
    writer.write_pod(&header)?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), chunks = index.len(), "world serialized");
    Ok(())
}

/// Loads a world from a `.tlwf` file.
///
/// The generator is rebuilt from the stored metadata when present, so a
/// loaded world keeps producing the same terrain for unexplored chunks.
///
/// # Errors
///
/// Returns the typed validation error for the first failure encountered:
/// [`StorageError::BadMagic`], [`StorageError::UnsupportedVersion`],
/// [`StorageError::UnsupportedEndianness`], [`StorageError::BadChecksum`]
/// for the header, [`StorageError::Truncated`] for short reads and
/// [`StorageError::CorruptChunk`] for a chunk CRC mismatch.
pub fn load_world(path: &Path) -> Result<World, StorageError> {
    let mut reader = BinaryReader::open(path)?;
    let header = read_and_validate_header(&mut reader)?;

    let mut world = World::default();

    let metadata_offset = header.metadata_offset;
    if metadata_offset > 0 {
        reader.seek(SeekFrom::Start(metadata_offset))?;
        let meta = decode_metadata(&mut reader)?;
        world.set_generator(generator_from_metadata(&meta));
        world.set_metadata(meta);
    }

    let index = read_index(&mut reader, &header)?;
    for entry in index {
        let (cx, cy, cz) = (entry.cx, entry.cy, entry.cz);
        let (offset, size) = (entry.offset, entry.size);
        if size as usize != Chunk::data_size() {
            return Err(StorageError::CorruptChunk { cx, cy, cz });
        }
        reader.seek(SeekFrom::Start(offset))?;
        let mut chunk = Chunk::new(ChunkCoord::new(cx, cy, cz));
        reader
            .read_bytes(chunk.bytes_mut())
            .map_err(StorageError::from_read)?;
        let expected = entry.checksum;
        if crc32(chunk.as_bytes()) != expected {
            return Err(StorageError::CorruptChunk { cx, cy, cz });
        }
        world.add_chunk(chunk);
    }

    tracing::debug!(path = %path.display(), chunks = world.loaded_chunk_count(), "world loaded");
    Ok(world)
}

/// Reads header, metadata and index count without loading chunk bodies.
///
/// # Errors
///
/// Same header validation errors as [`load_world`].
pub fn read_save_summary(path: &Path) -> Result<SaveSummary, StorageError> {
    let mut reader = BinaryReader::open(path)?;
    let header = read_and_validate_header(&mut reader)?;

    let metadata_offset = header.metadata_offset;
    let metadata = if metadata_offset > 0 {
        reader.seek(SeekFrom::Start(metadata_offset))?;
        Some(decode_metadata(&mut reader)?)
    } else {
        None
    };

    reader.seek(SeekFrom::Start(header.index_offset))?;
    let chunk_count = reader.read_pod::<u64>().map_err(StorageError::from_read)?;

    Ok(SaveSummary {
        version_major: header.version_major,
        version_minor: header.version_minor,
        chunk_count,
        metadata,
    })
}

/// Rewrites the metadata record of an existing `.tlwf` in place.
///
/// # Errors
///
/// Returns [`StorageError::Unsupported`] if the file has no metadata region
/// or if the replacement record does not have exactly the same encoded size.
pub fn update_metadata(path: &Path, meta: &WorldMetadata) -> Result<(), StorageError> {
    let metadata_offset;
    let old_len;
    {
        let mut reader = BinaryReader::open(path)?;
        let header = read_and_validate_header(&mut reader)?;
        metadata_offset = header.metadata_offset;
        if metadata_offset == 0 {
            return Err(StorageError::Unsupported("save has no metadata region"));
        }
        reader.seek(SeekFrom::Start(metadata_offset))?;
        old_len = reader.read_pod::<u64>().map_err(StorageError::from_read)?;
    }

    let body = encode_metadata(meta);
    if body.len() as u64 != old_len {
        return Err(StorageError::Unsupported(
            "replacement metadata record has a different size",
        ));
    }

    let mut writer = BinaryWriter::open_for_update(path)?;
    writer.seek(SeekFrom::Start(metadata_offset + 8))?;
    writer.write_bytes(&body)?;
    writer.flush()?;
    Ok(())
}

fn header_checksum(header: &FileHeader) -> u32 {
    let mut probe = *header;
    probe.header_checksum = 0;
    crc32(bytemuck::bytes_of(&probe))
}

fn read_and_validate_header(reader: &mut BinaryReader) -> Result<FileHeader, StorageError> {
    let header: FileHeader = reader.read_pod().map_err(StorageError::from_read)?;

    let magic = header.magic;
    if magic != MAGIC_NUMBER {
        return Err(StorageError::BadMagic);
    }
    let (major, minor) = (header.version_major, header.version_minor);
    if major != FORMAT_VERSION_MAJOR || minor > FORMAT_VERSION_MINOR {
        return Err(StorageError::UnsupportedVersion { major, minor });
    }
    let endianness = header.endianness;
    if endianness != local_endianness() {
        return Err(StorageError::UnsupportedEndianness);
    }
    let stored = header.header_checksum;
    if header_checksum(&header) != stored {
        return Err(StorageError::BadChecksum);
    }
    Ok(header)
}

fn read_index(
    reader: &mut BinaryReader,
    header: &FileHeader,
) -> Result<Vec<ChunkIndexEntry>, StorageError> {
    reader.seek(SeekFrom::Start(header.index_offset))?;
    let count = reader.read_pod::<u64>().map_err(StorageError::from_read)?;
    let entry_size = std::mem::size_of::<ChunkIndexEntry>() as u64;
    match count.checked_mul(entry_size) {
        Some(total) if total <= reader.remaining()? => {}
        _ => return Err(StorageError::Truncated),
    }
    let mut index = Vec::with_capacity(count as usize);
    for _ in 0..count {
        index.push(
            reader
                .read_pod::<ChunkIndexEntry>()
                .map_err(StorageError::from_read)?,
        );
    }
    Ok(index)
}

fn encode_metadata(meta: &WorldMetadata) -> Vec<u8> {
    let mut body = Vec::with_capacity(64);
    body.extend_from_slice(&meta.seed.to_ne_bytes());
    body.extend_from_slice(&meta.frequency.to_ne_bytes());
    put_string(&mut body, &meta.noise_type);
    put_string(&mut body, &meta.fractal_type);
    body.extend_from_slice(&meta.octaves.to_ne_bytes());
    body.extend_from_slice(&meta.lacunarity.to_ne_bytes());
    body.extend_from_slice(&meta.gain.to_ne_bytes());
    body
}

fn put_string(body: &mut Vec<u8>, value: &str) {
    body.extend_from_slice(&(value.len() as u64).to_ne_bytes());
    body.extend_from_slice(value.as_bytes());
}

fn decode_metadata(reader: &mut BinaryReader) -> Result<WorldMetadata, StorageError> {
    // Record length prefix; the fields carry their own framing.
    let _record_len = reader.read_pod::<u64>().map_err(StorageError::from_read)?;
    let seed = reader.read_pod::<i64>().map_err(StorageError::from_read)?;
    let frequency = reader.read_pod::<f32>().map_err(StorageError::from_read)?;
    let noise_type = reader.read_string().map_err(StorageError::from_read)?;
    let fractal_type = reader.read_string().map_err(StorageError::from_read)?;
    let octaves = reader.read_pod::<i32>().map_err(StorageError::from_read)?;
    let lacunarity = reader.read_pod::<f32>().map_err(StorageError::from_read)?;
    let gain = reader.read_pod::<f32>().map_err(StorageError::from_read)?;
    Ok(WorldMetadata {
        seed,
        frequency,
        noise_type,
        fractal_type,
        octaves,
        lacunarity,
        gain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tileland_world::TerrainId;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tileland_ser_{}_{name}.tlwf", std::process::id()))
    }

    fn sample_world() -> World {
        let mut world = World::default();
        world.get_or_load_chunk(ChunkCoord::new(0, 0, -1));
        world.get_or_load_chunk(ChunkCoord::new(0, 0, 0));
        world.tile_mut(5, 5, -1).light_level = 0;
        world.set_metadata(WorldMetadata::default());
        world
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = scratch_path("roundtrip");
        let world = sample_world();
        save_world(&world, &path).unwrap();

        let loaded = load_world(&path).unwrap();
        assert_eq!(loaded.loaded_chunk_count(), world.loaded_chunk_count());
        for (coord, chunk) in world.iter() {
            let restored = loaded.chunk(coord).expect("chunk present after load");
            assert_eq!(restored.as_bytes(), chunk.as_bytes());
        }
        let tile = loaded.tile(5, 5, -1).unwrap();
        assert_eq!(tile.terrain, TerrainId::GRASS);
        assert_eq!(tile.light_level, 0);
        assert_eq!(loaded.metadata(), world.metadata());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bad_magic_rejected() {
        let path = scratch_path("magic");
        save_world(&sample_world(), &path).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[0] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(load_world(&path), Err(StorageError::BadMagic)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_header_corruption_detected() {
        let path = scratch_path("header");
        save_world(&sample_world(), &path).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        // Flip a bit inside the header's data_offset field.
        bytes[30] ^= 0x01;
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(load_world(&path), Err(StorageError::BadChecksum)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_future_minor_version_rejected() {
        let path = scratch_path("version");
        save_world(&sample_world(), &path).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        // Bump version_minor past the supported range and refresh the
        // header checksum so only the version check can fire.
        bytes[6] = 0xEE;
        let mut probe = [0u8; 40];
        probe.copy_from_slice(&bytes[..40]);
        probe[36..40].fill(0);
        let crc = crc32(&probe);
        bytes[36..40].copy_from_slice(&crc.to_ne_bytes());
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(
            load_world(&path),
            Err(StorageError::UnsupportedVersion { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_truncated_file_detected() {
        let path = scratch_path("truncated");
        save_world(&sample_world(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..20]).unwrap();
        assert!(matches!(load_world(&path), Err(StorageError::Truncated)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_summary_skips_chunk_bodies() {
        let path = scratch_path("summary");
        save_world(&sample_world(), &path).unwrap();
        let summary = read_save_summary(&path).unwrap();
        assert_eq!(summary.version_major, FORMAT_VERSION_MAJOR);
        assert_eq!(summary.version_minor, FORMAT_VERSION_MINOR);
        assert_eq!(summary.chunk_count, 2);
        assert_eq!(summary.metadata, Some(WorldMetadata::default()));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_update_metadata_in_place() {
        let path = scratch_path("update_meta");
        save_world(&sample_world(), &path).unwrap();

        // Same string lengths, different numeric values: record size matches.
        let replacement = WorldMetadata {
            seed: 99,
            frequency: 0.5,
            octaves: 2,
            ..WorldMetadata::default()
        };
        update_metadata(&path, &replacement).unwrap();
        let summary = read_save_summary(&path).unwrap();
        assert_eq!(summary.metadata, Some(replacement));

        // A longer noise type changes the record size: refused.
        let oversized = WorldMetadata {
            noise_type: "OpenSimplex2ButLonger".to_string(),
            ..WorldMetadata::default()
        };
        assert!(matches!(
            update_metadata(&path, &oversized),
            Err(StorageError::Unsupported(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_update_metadata_requires_region() {
        let path = scratch_path("no_meta");
        let world = World::default();
        save_world(&world, &path).unwrap();
        assert!(matches!(
            update_metadata(&path, &WorldMetadata::default()),
            Err(StorageError::Unsupported(_))
        ));
        std::fs::remove_file(&path).ok();
    }
}
