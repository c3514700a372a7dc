//! Error types for packet decoding

use thiserror::Error;

/// Errors that can occur when decoding LiDAR packets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Packet is too short to contain required data
    #[error("Packet too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// Packet identifier doesn't match the model's MSOP or DIFOP magic
    #[error("Wrong packet header: expected {expected:#018X}, got {actual:#018X}")]
    WrongPacketHeader { expected: u64, actual: u64 },
}
