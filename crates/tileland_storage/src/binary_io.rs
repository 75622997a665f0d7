//! # Binary Stream Primitives
//!
//! Thin wrappers over `std::fs::File` for reading and writing POD records,
//! u64-length-prefixed strings and raw byte blocks. The primitives report
//! plain `std::io` results; the serializer layers typed errors on top.
//!
//! A read that would cross the end of the file fails up front without
//! consuming anything, and length-prefixed reads reject lengths larger than
//! the remaining file size to bound allocation.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};

/// Binary file writer.
pub struct BinaryWriter {
    file: File,
}

impl BinaryWriter {
    /// Creates (or truncates) a file for binary writing.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Opens an existing file for in-place updates (no truncation).
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist or cannot be opened read-write.
    pub fn open_for_update(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            file: OpenOptions::new().read(true).write(true).open(path)?,
        })
    }

    /// Writes a POD value as raw bytes.
    ///
    /// # Errors
    ///
    /// Propagates the underlying write failure.
    pub fn write_pod<T: Pod>(&mut self, value: &T) -> std::io::Result<()> {
        self.file.write_all(bytemuck::bytes_of(value))
    }

    /// Writes a raw byte block.
    ///
    /// # Errors
    ///
    /// Propagates the underlying write failure.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.file.write_all(bytes)
    }

    /// Writes a string as a u64 byte length followed by UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Propagates the underlying write failure.
    pub fn write_string(&mut self, value: &str) -> std::io::Result<()> {
        self.write_pod(&(value.len() as u64))?;
        self.write_bytes(value.as_bytes())
    }

    /// Moves the write position.
    ///
    /// # Errors
    ///
    /// Propagates the underlying seek failure.
    pub fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }

    /// Current write position.
    ///
    /// # Errors
    ///
    /// Propagates the underlying failure.
    pub fn position(&mut self) -> std::io::Result<u64> {
        self.file.stream_position()
    }

    /// Flushes buffered data to the OS.
    ///
    /// # Errors
    ///
    /// Propagates the underlying flush failure.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

/// Binary file reader with a cached file size for bounds checks.
pub struct BinaryReader {
    file: File,
    size: u64,
}

impl BinaryReader {
    /// Opens a file for binary reading.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or its size queried.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }

    /// Total file size in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Bytes left between the current position and the end of the file.
    ///
    /// # Errors
    ///
    /// Propagates the underlying failure.
    pub fn remaining(&mut self) -> std::io::Result<u64> {
        let pos = self.file.stream_position()?;
        Ok(self.size.saturating_sub(pos))
    }

    /// Reads a POD value.
    ///
    /// Fails with `UnexpectedEof` before consuming anything if fewer than
    /// `size_of::<T>()` bytes remain.
    ///
    /// # Errors
    ///
    /// Propagates the underlying read failure.
    pub fn read_pod<T: Pod>(&mut self) -> std::io::Result<T> {
        self.ensure_remaining(std::mem::size_of::<T>() as u64)?;
        let mut value: T = Zeroable::zeroed();
        self.file.read_exact(bytemuck::bytes_of_mut(&mut value))?;
        Ok(value)
    }

    /// Fills the buffer with raw bytes.
    ///
    /// # Errors
    ///
    /// Fails with `UnexpectedEof` before consuming anything if the buffer is
    /// larger than the remaining file.
    pub fn read_bytes(&mut self, buffer: &mut [u8]) -> std::io::Result<()> {
        self.ensure_remaining(buffer.len() as u64)?;
        self.file.read_exact(buffer)
    }

    /// Reads a u64-length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Rejects lengths that exceed the remaining file size and byte
    /// sequences that are not valid UTF-8.
    pub fn read_string(&mut self) -> std::io::Result<String> {
        let len = self.read_pod::<u64>()?;
        if len > self.remaining()? {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "string length exceeds remaining file size",
            ));
        }
        let mut buffer = vec![0u8; len as usize];
        self.file.read_exact(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Moves the read position.
    ///
    /// # Errors
    ///
    /// Propagates the underlying seek failure.
    pub fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }

    /// Current read position.
    ///
    /// # Errors
    ///
    /// Propagates the underlying failure.
    pub fn position(&mut self) -> std::io::Result<u64> {
        self.file.stream_position()
    }

    fn ensure_remaining(&mut self, needed: u64) -> std::io::Result<()> {
        if self.remaining()? < needed {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "record extends past end of file",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tileland_binio_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_pod_and_string_round_trip() {
        let path = scratch_path("roundtrip");
        {
            let mut writer = BinaryWriter::create(&path).unwrap();
            writer.write_pod(&0xDEAD_BEEFu32).unwrap();
            writer.write_string("hello \u{2591} world").unwrap();
            writer.write_pod(&-42i64).unwrap();
        }
        {
            let mut reader = BinaryReader::open(&path).unwrap();
            assert_eq!(reader.read_pod::<u32>().unwrap(), 0xDEAD_BEEF);
            assert_eq!(reader.read_string().unwrap(), "hello \u{2591} world");
            assert_eq!(reader.read_pod::<i64>().unwrap(), -42);
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_past_eof_fails_without_consuming() {
        let path = scratch_path("eof");
        {
            let mut writer = BinaryWriter::create(&path).unwrap();
            writer.write_pod(&7u16).unwrap();
        }
        let mut reader = BinaryReader::open(&path).unwrap();
        // A u64 does not fit in a 2-byte file.
        let err = reader.read_pod::<u64>().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
        // Position is untouched, the short record is still readable.
        assert_eq!(reader.position().unwrap(), 0);
        assert_eq!(reader.read_pod::<u16>().unwrap(), 7);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_oversized_string_length_rejected() {
        let path = scratch_path("oversize");
        {
            let mut writer = BinaryWriter::create(&path).unwrap();
            // Length prefix claims far more data than the file holds.
            writer.write_pod(&u64::MAX).unwrap();
            writer.write_bytes(b"xy").unwrap();
        }
        let mut reader = BinaryReader::open(&path).unwrap();
        let err = reader.read_string().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_seek_and_update_in_place() {
        let path = scratch_path("update");
        {
            let mut writer = BinaryWriter::create(&path).unwrap();
            writer.write_pod(&1u32).unwrap();
            writer.write_pod(&2u32).unwrap();
        }
        {
            let mut writer = BinaryWriter::open_for_update(&path).unwrap();
            writer.seek(SeekFrom::Start(4)).unwrap();
            writer.write_pod(&9u32).unwrap();
        }
        let mut reader = BinaryReader::open(&path).unwrap();
        assert_eq!(reader.read_pod::<u32>().unwrap(), 1);
        assert_eq!(reader.read_pod::<u32>().unwrap(), 9);
        std::fs::remove_file(&path).ok();
    }
}
