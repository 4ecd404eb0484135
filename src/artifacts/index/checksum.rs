use crate::artifacts::index::CHECKSUM_SIZE;
use crate::errors::{GelError, Result};
use sha2::{Digest, Sha256};

/// Reader over an index buffer that hashes everything it hands out.
#[derive(Debug)]
pub struct ChecksumReader<'b> {
    data: &'b [u8],
    offset: usize,
    digest: Sha256,
}

impl<'b> ChecksumReader<'b> {
    pub fn new(data: &'b [u8]) -> Self {
        ChecksumReader {
            data,
            offset: 0,
            digest: Sha256::new(),
        }
    }

    pub fn read(&mut self, size: usize) -> Result<&'b [u8]> {
        let end = self
            .offset
            .checked_add(size)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                GelError::TruncatedIndex(format!(
                    "needed {} bytes at offset {}, only {} left",
                    size,
                    self.offset,
                    self.data.len() - self.offset
                ))
            })?;

        let chunk = &self.data[self.offset..end];
        self.digest.update(chunk);
        self.offset = end;

        Ok(chunk)
    }

    /// Bytes not yet consumed, without hashing them
    pub fn peek_remaining(&self) -> &'b [u8] {
        &self.data[self.offset..]
    }

    /// Compare the trailing checksum with everything read so far.
    pub fn verify(self) -> Result<()> {
        let remaining = &self.data[self.offset..];
        if remaining.len() < CHECKSUM_SIZE {
            return Err(GelError::TruncatedIndex("missing trailing checksum".into()));
        }
        if remaining.len() > CHECKSUM_SIZE {
            return Err(GelError::TruncatedIndex(format!(
                "{} unexpected bytes before the trailing checksum",
                remaining.len() - CHECKSUM_SIZE
            )));
        }

        let computed = self.digest.finalize();
        if remaining != computed.as_slice() {
            return Err(GelError::IndexChecksumMismatch {
                stored: hex::encode(remaining),
                computed: hex::encode(computed),
            });
        }

        Ok(())
    }
}

/// Writer that appends the running checksum when finished.
#[derive(Debug, Default)]
pub struct ChecksumWriter {
    buffer: Vec<u8>,
    digest: Sha256,
}

impl ChecksumWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        self.digest.update(data);
    }

    pub fn finish(mut self) -> Vec<u8> {
        let checksum = self.digest.finalize();
        self.buffer.extend_from_slice(checksum.as_slice());
        self.buffer
    }
}
