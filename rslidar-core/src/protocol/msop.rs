//! MSOP packet view
//!
//! MSOP is the high-rate measurement stream: each packet carries 12 firing
//! blocks of 32 range/intensity returns at a given azimuth.
//!
//! Packet layout (1248 bytes, all multi-byte fields big-endian):
//!
//! | offset | size | field                                     |
//! |--------|------|-------------------------------------------|
//! | 0      | 8    | packet id (magic)                         |
//! | 8      | 2    | protocol version                          |
//! | 10     | 10   | reserved                                  |
//! | 20     | 10   | timestamp (y m d h m s, ms u16, us u16)   |
//! | 30     | 1    | lidar model byte                          |
//! | 31     | 7    | reserved                                  |
//! | 38     | 2    | raw temperature                           |
//! | 40     | 2    | reserved                                  |
//! | 42     | 1200 | 12 × 100-byte firing blocks               |
//! | 1242   | 4    | packet index                              |
//! | 1246   | 2    | tail                                      |
//!
//! Block layout (100 bytes): block id u16, azimuth u16 (centi-degrees),
//! then 32 × { distance u16 (5 mm units), intensity u8 }.

use super::{read_packet_time, read_u16, read_u32, read_u64, PacketTime};
use crate::error::DecodeError;

/// Total MSOP packet size in bytes
pub const MSOP_PACKET_SIZE: usize = 1248;

/// Number of firing blocks per packet
pub const BLOCKS_PER_PACKET: usize = 12;

/// Number of channels per firing block
pub const CHANNELS_PER_BLOCK: usize = 32;

/// Size of one firing block in bytes
pub const BLOCK_SIZE: usize = 4 + CHANNELS_PER_BLOCK * 3;

const TIMESTAMP_OFFSET: usize = 20;
const TEMPERATURE_OFFSET: usize = 38;
const BLOCKS_OFFSET: usize = 42;
const INDEX_OFFSET: usize = 1242;

/// One range/intensity return within a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelReturn {
    /// Distance in 5 mm units
    pub distance: u16,
    /// Reflectivity, 0..255
    pub intensity: u8,
}

/// Borrowed view over one MSOP packet
#[derive(Debug, Clone, Copy)]
pub struct MsopView<'a> {
    data: &'a [u8],
}

impl<'a> MsopView<'a> {
    /// Wrap a packet buffer. Fails if the buffer is shorter than a full
    /// MSOP packet; the magic is checked by the caller against its model.
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < MSOP_PACKET_SIZE {
            return Err(DecodeError::TooShort {
                expected: MSOP_PACKET_SIZE,
                actual: data.len(),
            });
        }
        Ok(MsopView { data })
    }

    /// 8-byte packet identifier
    pub fn id(&self) -> u64 {
        read_u64(self.data, 0)
    }

    /// Header calendar timestamp
    pub fn timestamp(&self) -> PacketTime {
        read_packet_time(self.data, TIMESTAMP_OFFSET)
    }

    /// Raw temperature field bytes, undecoded
    pub fn temperature_raw(&self) -> [u8; 2] {
        [self.data[TEMPERATURE_OFFSET], self.data[TEMPERATURE_OFFSET + 1]]
    }

    /// Firing block at `index`, which must be < [`BLOCKS_PER_PACKET`]
    pub fn block(&self, index: usize) -> MsopBlock<'a> {
        let start = BLOCKS_OFFSET + index * BLOCK_SIZE;
        MsopBlock {
            data: &self.data[start..start + BLOCK_SIZE],
        }
    }

    /// Rolling packet index from the tail, for external frame accounting
    pub fn index(&self) -> u32 {
        read_u32(self.data, INDEX_OFFSET)
    }
}

/// Borrowed view over one firing block
#[derive(Debug, Clone, Copy)]
pub struct MsopBlock<'a> {
    data: &'a [u8],
}

impl<'a> MsopBlock<'a> {
    /// 2-byte block identifier
    pub fn id(&self) -> u16 {
        read_u16(self.data, 0)
    }

    /// Block azimuth in centi-degrees, 0..35999
    pub fn azimuth(&self) -> u16 {
        read_u16(self.data, 2)
    }

    /// Return for `channel`, which must be < [`CHANNELS_PER_BLOCK`]
    pub fn channel(&self, channel: usize) -> ChannelReturn {
        let offset = 4 + channel * 3;
        ChannelReturn {
            distance: read_u16(self.data, offset),
            intensity: self.data[offset + 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_packet() -> Vec<u8> {
        vec![0u8; MSOP_PACKET_SIZE]
    }

    #[test]
    fn test_too_short() {
        let err = MsopView::new(&[0u8; 100]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TooShort {
                expected: MSOP_PACKET_SIZE,
                actual: 100
            }
        );
    }

    #[test]
    fn test_header_fields() {
        let mut pkt = empty_packet();
        pkt[0..8].copy_from_slice(&0xA050_A55A_0A05_AA55u64.to_be_bytes());
        pkt[20..30].copy_from_slice(&[21, 6, 1, 2, 3, 4, 0, 100, 1, 44]);
        pkt[38] = 0x20;
        pkt[39] = 0x41;
        pkt[1242..1246].copy_from_slice(&0x00012345u32.to_be_bytes());

        let view = MsopView::new(&pkt).unwrap();
        assert_eq!(view.id(), 0xA050_A55A_0A05_AA55);
        let ts = view.timestamp();
        assert_eq!(ts.year, 21);
        assert_eq!(ts.ms, 100);
        assert_eq!(ts.us, 300);
        assert_eq!(view.temperature_raw(), [0x20, 0x41]);
        assert_eq!(view.index(), 0x00012345);
    }

    #[test]
    fn test_block_fields() {
        let mut pkt = empty_packet();
        // block 3: id, azimuth 9000, channel 5 distance 2000 intensity 128
        let base = 42 + 3 * BLOCK_SIZE;
        pkt[base..base + 2].copy_from_slice(&0xEEFFu16.to_be_bytes());
        pkt[base + 2..base + 4].copy_from_slice(&9000u16.to_be_bytes());
        let ch = base + 4 + 5 * 3;
        pkt[ch..ch + 2].copy_from_slice(&2000u16.to_be_bytes());
        pkt[ch + 2] = 128;

        let view = MsopView::new(&pkt).unwrap();
        let block = view.block(3);
        assert_eq!(block.id(), 0xEEFF);
        assert_eq!(block.azimuth(), 9000);
        let ret = block.channel(5);
        assert_eq!(ret.distance, 2000);
        assert_eq!(ret.intensity, 128);
        // untouched neighbour channel reads zero
        assert_eq!(block.channel(6).distance, 0);
    }

    #[test]
    fn test_packet_geometry() {
        assert_eq!(BLOCK_SIZE, 100);
        assert_eq!(42 + BLOCKS_PER_PACKET * BLOCK_SIZE + 4 + 2, MSOP_PACKET_SIZE);
    }
}
