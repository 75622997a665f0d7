//! # On-Disk Formats
//!
//! Packed record layouts for the `.tlwf` container and the `.tlwz` wrapper.
//! Every struct is 1-byte aligned POD so it can be copied to and from the
//! stream verbatim; numeric fields use the writing machine's byte order and
//! the header's endianness tag lets readers reject foreign files.

use bytemuck::{Pod, Zeroable};

/// `.tlwf` magic number: ASCII "TLWF".
pub const MAGIC_NUMBER: u32 = 0x544C_5746;
/// Current `.tlwf` major version.
pub const FORMAT_VERSION_MAJOR: u16 = 0;
/// Current `.tlwf` minor version.
pub const FORMAT_VERSION_MINOR: u16 = 3;

/// Endianness tag: little-endian writer.
pub const ENDIANNESS_LITTLE: u8 = 0x01;
/// Endianness tag: big-endian writer.
pub const ENDIANNESS_BIG: u8 = 0x02;

/// Checksum type: none.
pub const CHECKSUM_TYPE_NONE: u8 = 0x00;
/// Checksum type: legacy XOR (reserved).
pub const CHECKSUM_TYPE_XOR: u8 = 0x01;
/// Checksum type: CRC32 (current).
pub const CHECKSUM_TYPE_CRC32: u8 = 0x02;

/// `.tlwz` magic number: ASCII "TLWZ".
pub const COMPRESSED_MAGIC_NUMBER: u32 = 0x544C_575A;
/// Current `.tlwz` major version.
pub const COMPRESSED_VERSION_MAJOR: u16 = 0;
/// Current `.tlwz` minor version.
pub const COMPRESSED_VERSION_MINOR: u16 = 1;

/// Compression type: zlib deflate.
pub const COMPRESSION_TYPE_ZLIB: u8 = 0x01;

/// The endianness tag of the running machine.
#[must_use]
pub const fn local_endianness() -> u8 {
    if cfg!(target_endian = "little") {
        ENDIANNESS_LITTLE
    } else {
        ENDIANNESS_BIG
    }
}

/// `.tlwf` file header, written at offset 0.
///
/// `header_checksum` is the CRC32 of this record with the checksum field
/// itself zeroed.
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C, packed)]
pub struct FileHeader {
    /// Magic number, [`MAGIC_NUMBER`].
    pub magic: u32,
    /// Major format version; must match exactly.
    pub version_major: u16,
    /// Minor format version; readers accept up to the current value.
    pub version_minor: u16,
    /// Byte order of the writing machine.
    pub endianness: u8,
    /// Checksum algorithm for this header and the chunk data.
    pub checksum_type: u8,
    /// Reserved, zero.
    pub reserved: u16,
    /// Byte offset of the world-metadata record, 0 when absent.
    pub metadata_offset: u64,
    /// Byte offset of the chunk-index region.
    pub index_offset: u64,
    /// Byte offset of the first chunk-data block.
    pub data_offset: u64,
    /// CRC32 of this header with this field zeroed.
    pub header_checksum: u32,
}

/// One chunk-index record: coordinate, absolute data offset, size, CRC32.
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C, packed)]
pub struct ChunkIndexEntry {
    /// Chunk X coordinate.
    pub cx: i32,
    /// Chunk Y coordinate.
    pub cy: i32,
    /// Chunk Z coordinate.
    pub cz: i32,
    /// Absolute file offset of the chunk data block.
    pub offset: u64,
    /// Size of the chunk data block in bytes.
    pub size: u32,
    /// CRC32 of the chunk data block.
    pub checksum: u32,
}

/// `.tlwz` file header, followed by exactly `compressed_size` payload bytes.
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C, packed)]
pub struct CompressedFileHeader {
    /// Magic number, [`COMPRESSED_MAGIC_NUMBER`].
    pub magic: u32,
    /// Major format version; must match exactly.
    pub version_major: u16,
    /// Minor format version; readers accept up to the current value.
    pub version_minor: u16,
    /// Compression algorithm, [`COMPRESSION_TYPE_ZLIB`].
    pub compression_type: u8,
    /// Reserved, zero.
    pub reserved1: u8,
    /// Reserved, zero.
    pub reserved2: u16,
    /// Size of the original `.tlwf` bytes.
    pub uncompressed_size: u64,
    /// CRC32 of the original `.tlwf` bytes.
    pub uncompressed_checksum: u32,
    /// Size of the compressed payload.
    pub compressed_size: u64,
    /// CRC32 of the compressed payload.
    pub compressed_checksum: u32,
}
