use flate2::read::DeflateDecoder;
use std::io::{self, Read};
use std::sync::Arc;

use crate::io::ReadAt;

use super::structures::ZipFileEntry;

/// A `Read` view over a fixed byte range of a [`ReadAt`] source.
pub struct SectionReader<R: ReadAt + ?Sized> {
    reader: Arc<R>,
    pos: u64,
    end: u64,
}

impl<R: ReadAt + ?Sized> SectionReader<R> {
    pub fn new(reader: Arc<R>, offset: u64, len: u64) -> Self {
        Self {
            reader,
            pos: offset,
            end: offset.saturating_add(len),
        }
    }
}

impl<R: ReadAt + ?Sized> Read for SectionReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.end || buf.is_empty() {
            return Ok(0);
        }

        let want = (self.end - self.pos).min(buf.len() as u64) as usize;
        let n = self.reader.read_at(self.pos, &mut buf[..want])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ended inside entry data",
            ));
        }
        self.pos += n as u64;
        Ok(n)
    }
}

enum Decoder<R: ReadAt + ?Sized> {
    Stored(SectionReader<R>),
    Deflate(DeflateDecoder<SectionReader<R>>),
}

impl<R: ReadAt + ?Sized> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Decoder::Stored(r) => r.read(buf),
            Decoder::Deflate(r) => r.read(buf),
        }
    }
}

/// Streaming reader for the uncompressed contents of one archive entry.
///
/// When the compressed data is exhausted the byte count and CRC-32 are
/// compared with the central directory; a mismatch surfaces as an
/// `InvalidData` error from `read`.
pub struct ZipEntryReader<R: ReadAt + ?Sized> {
    inner: Decoder<R>,
    name: String,
    hasher: crc32fast::Hasher,
    read: u64,
    expected_size: u64,
    expected_crc: u32,
    verified: bool,
}

impl<R: ReadAt + ?Sized> ZipEntryReader<R> {
    pub(super) fn stored(entry: &ZipFileEntry, data: SectionReader<R>) -> Self {
        Self::with_decoder(entry, Decoder::Stored(data))
    }

    pub(super) fn deflate(entry: &ZipFileEntry, data: SectionReader<R>) -> Self {
        Self::with_decoder(entry, Decoder::Deflate(DeflateDecoder::new(data)))
    }

    fn with_decoder(entry: &ZipFileEntry, inner: Decoder<R>) -> Self {
        Self {
            inner,
            name: entry.file_name.clone(),
            hasher: crc32fast::Hasher::new(),
            read: 0,
            expected_size: entry.uncompressed_size,
            expected_crc: entry.crc32,
            verified: false,
        }
    }

    fn verify(&mut self) -> io::Result<()> {
        if self.verified {
            return Ok(());
        }
        if self.read != self.expected_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{}: size mismatch, expected {} bytes, got {}",
                    self.name, self.expected_size, self.read
                ),
            ));
        }
        let actual = self.hasher.clone().finalize();
        if actual != self.expected_crc {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{}: checksum mismatch, expected {:08x}, got {:08x}",
                    self.name, self.expected_crc, actual
                ),
            ));
        }
        self.verified = true;
        Ok(())
    }
}

impl<R: ReadAt + ?Sized> Read for ZipEntryReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let n = self.inner.read(buf)?;
        if n == 0 {
            self.verify()?;
            return Ok(0);
        }

        self.read += n as u64;
        if self.read > self.expected_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{}: entry is larger than the declared {} bytes",
                    self.name, self.expected_size
                ),
            ));
        }
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}
