//! Length prefix of the safetensors container.

use crate::config::ContainerConfig;
use crate::error::ContainerError;

/// Location of the JSON header inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Size of the JSON header in bytes.
    pub metadata_len: u64,
    /// Offset of the JSON header; always right after the length prefix.
    pub metadata_offset: u64,
}

impl ContainerHeader {
    /// Read and bounds-check the length prefix of `bytes`.
    ///
    /// Guarantees `0 < metadata_len <= MAX_METADATA_SIZE` and
    /// `metadata_offset + metadata_len <= bytes.len()`.
    pub fn read(bytes: &[u8]) -> Result<Self, ContainerError> {
        let prefix: [u8; ContainerConfig::HEADER_LEN_BYTES] = bytes
            .get(..ContainerConfig::HEADER_LEN_BYTES)
            .and_then(|b| b.try_into().ok())
            .ok_or(ContainerError::TooShort { len: bytes.len() })?;

        let metadata_len = u64::from_le_bytes(prefix);
        if metadata_len == 0 {
            return Err(ContainerError::EmptyHeader);
        }
        if metadata_len > ContainerConfig::MAX_METADATA_SIZE {
            return Err(ContainerError::HeaderTooLarge {
                size: metadata_len,
                max: ContainerConfig::MAX_METADATA_SIZE,
            });
        }

        let metadata_offset = ContainerConfig::HEADER_LEN_BYTES as u64;
        // Cannot overflow: metadata_len is capped well below u64::MAX.
        let expected = metadata_offset + metadata_len;
        let actual = bytes.len() as u64;
        if expected > actual {
            return Err(ContainerError::Truncated { expected, actual });
        }

        Ok(Self {
            metadata_len,
            metadata_offset,
        })
    }

    /// Byte range of the JSON header.
    pub fn metadata_range(&self) -> std::ops::Range<usize> {
        self.metadata_offset as usize..self.payload_offset()
    }

    /// First byte of the tensor payload.
    pub fn payload_offset(&self) -> usize {
        (self.metadata_offset + self.metadata_len) as usize
    }
}
