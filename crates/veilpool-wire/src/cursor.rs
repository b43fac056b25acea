//! fixed-offset payload reader and writer
//!
//! payloads are walked front to back: fixed-width fields at known offsets,
//! variable blobs behind explicit little-endian length prefixes

use crate::envelope::WireError;

/// reads a payload front to back, failing on any overrun
pub struct PayloadReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// current read offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self.offset.checked_add(n).ok_or(WireError::TruncatedPayload {
            offset: self.offset,
            need: n,
            have: self.buf.len().saturating_sub(self.offset),
        })?;
        if end > self.buf.len() {
            return Err(WireError::TruncatedPayload {
                offset: self.offset,
                need: n,
                have: self.buf.len() - self.offset,
            });
        }
        let slice = &self.buf[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    pub fn u16_le(&mut self) -> Result<u16, WireError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32_le(&mut self) -> Result<u32, WireError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn u64_le(&mut self) -> Result<u64, WireError> {
        let b = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn array8(&mut self) -> Result<[u8; 8], WireError> {
        let b = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(arr)
    }

    pub fn array32(&mut self) -> Result<[u8; 32], WireError> {
        let b = self.take(32)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(b);
        Ok(arr)
    }

    /// variable blob behind a 2-byte length prefix
    pub fn var_bytes_u16(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.u16_le()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// variable blob behind a 4-byte length prefix
    pub fn var_bytes_u32(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.u32_le()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// assert the payload is fully consumed
    pub fn finish(self) -> Result<(), WireError> {
        let rest = self.buf.len() - self.offset;
        if rest != 0 {
            return Err(WireError::TrailingGarbage(rest));
        }
        Ok(())
    }
}

/// builds a payload front to back
#[derive(Default)]
pub struct PayloadWriter {
    out: Vec<u8>,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.out.push(v);
        self
    }

    pub fn u64_le(&mut self, v: u64) -> &mut Self {
        self.out.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn array(&mut self, v: &[u8]) -> &mut Self {
        self.out.extend_from_slice(v);
        self
    }

    /// a blob longer than its prefix can describe would encode a corrupt
    /// length, so oversize input is a hard caller error in every build
    pub fn var_bytes_u16(&mut self, v: &[u8]) -> &mut Self {
        assert!(v.len() <= u16::MAX as usize, "blob exceeds u16 length prefix");
        self.out.extend_from_slice(&(v.len() as u16).to_le_bytes());
        self.out.extend_from_slice(v);
        self
    }

    pub fn var_bytes_u32(&mut self, v: &[u8]) -> &mut Self {
        assert!(v.len() <= u32::MAX as usize, "blob exceeds u32 length prefix");
        self.out.extend_from_slice(&(v.len() as u32).to_le_bytes());
        self.out.extend_from_slice(v);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_fields() {
        let mut w = PayloadWriter::new();
        w.u8(7).u64_le(0xdead_beef).array(&[9u8; 32]);
        let bytes = w.into_bytes();

        let mut r = PayloadReader::new(&bytes);
        assert_eq!(r.u8().unwrap(), 7);
        assert_eq!(r.u64_le().unwrap(), 0xdead_beef);
        assert_eq!(r.array32().unwrap(), [9u8; 32]);
        r.finish().unwrap();
    }

    #[test]
    fn test_var_bytes_round_trip() {
        let blob = vec![1, 2, 3, 4, 5];
        let mut w = PayloadWriter::new();
        w.var_bytes_u32(&blob);
        let bytes = w.into_bytes();

        let mut r = PayloadReader::new(&bytes);
        assert_eq!(r.var_bytes_u32().unwrap(), blob);
        r.finish().unwrap();
    }

    #[test]
    fn test_length_prefix_overrun() {
        // declared length 10, only 3 bytes follow
        let bytes = [10u8, 0, 0, 0, 0xaa, 0xbb, 0xcc];
        let mut r = PayloadReader::new(&bytes);
        let err = r.var_bytes_u32().unwrap_err();
        assert!(matches!(err, WireError::TruncatedPayload { need: 10, .. }));
    }

    #[test]
    fn test_trailing_garbage() {
        let bytes = [1u8, 2, 3];
        let mut r = PayloadReader::new(&bytes);
        r.u8().unwrap();
        assert_eq!(r.finish(), Err(WireError::TrailingGarbage(2)));
    }

    #[test]
    #[should_panic(expected = "length prefix")]
    fn test_oversize_u16_blob_rejected() {
        let blob = vec![0u8; u16::MAX as usize + 1];
        PayloadWriter::new().var_bytes_u16(&blob);
    }

    #[test]
    fn test_max_u16_blob_encodes() {
        let blob = vec![0xabu8; u16::MAX as usize];
        let mut w = PayloadWriter::new();
        w.var_bytes_u16(&blob);
        let bytes = w.into_bytes();
        let mut r = PayloadReader::new(&bytes);
        assert_eq!(r.var_bytes_u16().unwrap(), blob);
        r.finish().unwrap();
    }

    #[test]
    fn test_truncated_fixed_field() {
        let bytes = [0u8; 31];
        let mut r = PayloadReader::new(&bytes);
        assert!(matches!(
            r.array32(),
            Err(WireError::TruncatedPayload { need: 32, have: 31, .. })
        ));
    }
}
