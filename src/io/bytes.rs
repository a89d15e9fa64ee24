use super::ReadAt;
use std::io::Result;

/// In-memory reader over an owned byte buffer
pub struct BytesReader {
    data: Vec<u8>,
}

impl BytesReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl ReadAt for BytesReader {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        let Some(available) = self.data.get(start..) else {
            return Ok(0);
        };

        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_inside_buffer() {
        let reader = BytesReader::new(b"0123456789".to_vec());
        let mut buf = [0u8; 4];
        assert_eq!(reader.read_at(3, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"3456");
    }

    #[test]
    fn test_short_read_at_tail() {
        let reader = BytesReader::new(b"0123456789".to_vec());
        let mut buf = [0u8; 8];
        assert_eq!(reader.read_at(7, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"789");
    }

    #[test]
    fn test_read_at_end_is_empty() {
        let reader = BytesReader::new(b"abc".to_vec());
        let mut buf = [0u8; 4];
        assert_eq!(reader.read_at(3, &mut buf).unwrap(), 0);
        assert_eq!(reader.read_at(u64::MAX, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_empty_buffer() {
        let reader = BytesReader::new(Vec::new());
        let mut buf = [0u8; 1];
        assert_eq!(reader.size(), 0);
        assert_eq!(reader.read_at(0, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_exact_at_reports_eof() {
        let reader = BytesReader::new(b"abc".to_vec());
        let mut buf = [0u8; 4];
        let err = reader.read_exact_at(1, &mut buf).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
