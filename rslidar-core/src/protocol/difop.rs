//! DIFOP packet view
//!
//! DIFOP is the low-rate device-information stream: spin rate, return mode,
//! network/firmware identity and the per-channel angle calibration tables.
//!
//! Packet layout (1248 bytes, all multi-byte fields big-endian). Only the
//! fields the decoder consumes are exposed; the rest are documented spans:
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 8    | packet id (magic)                       |
//! | 8      | 2    | motor speed, rpm                        |
//! | 10     | 22   | ethernet configuration                  |
//! | 32     | 2    | horizontal FOV start, centi-degrees     |
//! | 34     | 2    | horizontal FOV end, centi-degrees       |
//! | 36     | 2    | reserved                                |
//! | 38     | 2    | phase lock angle, centi-degrees         |
//! | 40     | 10   | firmware versions                       |
//! | 50     | 242  | intensity table                         |
//! | 292    | 6    | serial number                           |
//! | 298    | 2    | zero calibration                        |
//! | 300    | 1    | return mode                             |
//! | 301    | 2    | software version                        |
//! | 303    | 10   | timestamp (same shape as MSOP)          |
//! | 313    | 69   | status and diagnostics                  |
//! | 382    | 86   | GPRMC sentence                          |
//! | 468    | 96   | pitch calibration, 32 × 3 bytes         |
//! | 564    | 96   | yaw calibration, 32 × 3 bytes           |
//! | 660    | 586  | reserved                                |
//! | 1246   | 2    | tail                                    |

use super::{read_packet_time, read_u16, read_u64, PacketTime};
use crate::error::DecodeError;

/// Total DIFOP packet size in bytes
pub const DIFOP_PACKET_SIZE: usize = 1248;

/// Size of one calibration region (32 channels × 3 bytes)
pub const CALIBRATION_REGION_SIZE: usize = 96;

const RPM_OFFSET: usize = 8;
const FOV_START_OFFSET: usize = 32;
const FOV_END_OFFSET: usize = 34;
const PHASE_LOCK_OFFSET: usize = 38;
const SERIAL_OFFSET: usize = 292;
const RETURN_MODE_OFFSET: usize = 300;
const SOFTWARE_VERSION_OFFSET: usize = 301;
const TIMESTAMP_OFFSET: usize = 303;
const PITCH_CALIBRATION_OFFSET: usize = 468;
const YAW_CALIBRATION_OFFSET: usize = 564;

/// Device identity and installation settings carried on DIFOP.
///
/// A fresh snapshot is taken from every valid DIFOP packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Serial number as an uppercase hex string
    pub serial_number: String,
    /// Horizontal FOV window start, centi-degrees
    pub fov_start: u16,
    /// Horizontal FOV window end, centi-degrees
    pub fov_end: u16,
    /// Phase lock angle, centi-degrees
    pub phase_lock_angle: u16,
    /// Motor software version
    pub software_version: u16,
}

/// Borrowed view over one DIFOP packet
#[derive(Debug, Clone, Copy)]
pub struct DifopView<'a> {
    data: &'a [u8],
}

impl<'a> DifopView<'a> {
    /// Wrap a packet buffer. Fails if the buffer is shorter than a full
    /// DIFOP packet; the magic is checked by the caller against its model.
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < DIFOP_PACKET_SIZE {
            return Err(DecodeError::TooShort {
                expected: DIFOP_PACKET_SIZE,
                actual: data.len(),
            });
        }
        Ok(DifopView { data })
    }

    /// 8-byte packet identifier
    pub fn id(&self) -> u64 {
        read_u64(self.data, 0)
    }

    /// Motor spin rate in rpm
    pub fn rpm(&self) -> u16 {
        read_u16(self.data, RPM_OFFSET)
    }

    /// Return (echo) mode byte
    pub fn return_mode(&self) -> u8 {
        self.data[RETURN_MODE_OFFSET]
    }

    /// Device calendar timestamp
    pub fn timestamp(&self) -> PacketTime {
        read_packet_time(self.data, TIMESTAMP_OFFSET)
    }

    /// Pitch (vertical angle) calibration region
    pub fn pitch_calibration(&self) -> &'a [u8] {
        &self.data[PITCH_CALIBRATION_OFFSET..PITCH_CALIBRATION_OFFSET + CALIBRATION_REGION_SIZE]
    }

    /// Yaw (horizontal angle) calibration region
    pub fn yaw_calibration(&self) -> &'a [u8] {
        &self.data[YAW_CALIBRATION_OFFSET..YAW_CALIBRATION_OFFSET + CALIBRATION_REGION_SIZE]
    }

    /// Snapshot of the device identity fields
    pub fn device_info(&self) -> DeviceInfo {
        let serial_number = self.data[SERIAL_OFFSET..SERIAL_OFFSET + 6]
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect();
        DeviceInfo {
            serial_number,
            fov_start: read_u16(self.data, FOV_START_OFFSET),
            fov_end: read_u16(self.data, FOV_END_OFFSET),
            phase_lock_angle: read_u16(self.data, PHASE_LOCK_OFFSET),
            software_version: read_u16(self.data, SOFTWARE_VERSION_OFFSET),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_short() {
        let err = DifopView::new(&[0u8; 1247]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TooShort {
                expected: DIFOP_PACKET_SIZE,
                actual: 1247
            }
        );
    }

    #[test]
    fn test_field_offsets() {
        let mut pkt = vec![0u8; DIFOP_PACKET_SIZE];
        pkt[0..8].copy_from_slice(&0x5555_1111_5A00_FFA5u64.to_be_bytes());
        pkt[8..10].copy_from_slice(&600u16.to_be_bytes());
        pkt[300] = 0x02;
        pkt[303..313].copy_from_slice(&[22, 3, 4, 5, 6, 7, 0, 8, 0, 9]);
        pkt[468] = 0x12;
        pkt[563] = 0x34;
        pkt[564] = 0x56;
        pkt[659] = 0x78;

        let view = DifopView::new(&pkt).unwrap();
        assert_eq!(view.id(), 0x5555_1111_5A00_FFA5);
        assert_eq!(view.rpm(), 600);
        assert_eq!(view.return_mode(), 0x02);
        let ts = view.timestamp();
        assert_eq!((ts.year, ts.month, ts.day), (22, 3, 4));
        assert_eq!((ts.ms, ts.us), (8, 9));
        assert_eq!(view.pitch_calibration().len(), CALIBRATION_REGION_SIZE);
        assert_eq!(view.pitch_calibration()[0], 0x12);
        assert_eq!(view.pitch_calibration()[95], 0x34);
        assert_eq!(view.yaw_calibration()[0], 0x56);
        assert_eq!(view.yaw_calibration()[95], 0x78);
    }

    #[test]
    fn test_device_info() {
        let mut pkt = vec![0u8; DIFOP_PACKET_SIZE];
        pkt[292..298].copy_from_slice(&[0xAB, 0x01, 0x02, 0x03, 0x04, 0xEF]);
        pkt[32..34].copy_from_slice(&0u16.to_be_bytes());
        pkt[34..36].copy_from_slice(&36000u16.to_be_bytes());
        pkt[38..40].copy_from_slice(&1200u16.to_be_bytes());
        pkt[301..303].copy_from_slice(&0x0105u16.to_be_bytes());

        let info = DifopView::new(&pkt).unwrap().device_info();
        assert_eq!(info.serial_number, "AB01020304EF");
        assert_eq!(info.fov_start, 0);
        assert_eq!(info.fov_end, 36000);
        assert_eq!(info.phase_lock_angle, 1200);
        assert_eq!(info.software_version, 0x0105);
    }
}
