use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported cartridge size: {len} bytes (expected 2048, 4096 or 8192)")]
    UnsupportedCartridgeSize { len: usize },

    #[error("firmware is truncated: {len} bytes (expected 1024)")]
    TruncatedFirmware { len: usize },

    #[error("firmware is oversized: {len} bytes (expected 1024)")]
    OversizedFirmware { len: usize },

    #[error(transparent)]
    OperandOutOfRange(#[from] OperandOutOfRange),
}

/// A multi-byte instruction whose operand would lie past the end of the image.
/// The only thing the annotator can report.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operand of opcode ${opcode:02x} at offset ${offset:04x} is past the end of the image")]
pub struct OperandOutOfRange {
    pub offset: usize,
    pub opcode: u8,
}
