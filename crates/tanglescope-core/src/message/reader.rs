use super::error::DecodeError;
use super::layout;

/// Sequential little-endian cursor over an immutable byte buffer.
///
/// Every read advances past the consumed bytes; a read requesting more bytes
/// than remain fails with `DecodeError::Truncated` instead of returning a
/// short slice. The reader is a transient decoding aid and is never held by
/// decoded entities.
pub struct MessageReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> MessageReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn advance(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        let end = match self.offset.checked_add(count) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                return Err(DecodeError::Truncated {
                    needed: count,
                    actual: self.remaining(),
                });
            }
        };
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let bytes = self.advance(1)?;
        Ok(bytes[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.advance(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.advance(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.advance(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        self.advance(count)
    }

    pub fn read_id(&mut self) -> Result<[u8; layout::ID_LEN], DecodeError> {
        let bytes = self.advance(layout::ID_LEN)?;
        let mut id = [0u8; layout::ID_LEN];
        id.copy_from_slice(bytes);
        Ok(id)
    }

    pub fn read_id_list(
        &mut self,
        count: usize,
    ) -> Result<Vec<[u8; layout::ID_LEN]>, DecodeError> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.read_id()?);
        }
        Ok(ids)
    }

    /// Consume and return all unread bytes.
    pub fn take_remaining(&mut self) -> &'a [u8] {
        let rest = &self.data[self.offset..];
        self.offset = self.data.len();
        rest
    }
}
