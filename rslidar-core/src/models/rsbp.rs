//! RSBP model constants
//!
//! 32-channel short-range hemispherical LiDAR, 100 m range. Calibration
//! values are stored as raw centi-degrees; filtered points carry zero
//! intensity and ring -1. The beam fan is interleaved on the wire, so a
//! fixed permutation maps firing channel to physical ring.

use super::ModelSpec;
use crate::model::Model;
use crate::protocol::msop::CHANNELS_PER_BLOCK;

/// Channel-index → ring permutation for the RSBP beam fan
const BEAM_RING_TABLE: [u8; CHANNELS_PER_BLOCK] = [
    31, 28, 27, 25, 23, 21, 19, 17, // channels 0..8
    30, 29, 26, 24, 22, 20, 18, 16, // channels 8..16
    15, 13, 11, 9, 7, 5, 3, 1, // channels 16..24
    14, 12, 10, 8, 6, 4, 2, 0, // channels 24..32
];

/// Marker type for the RSBP sensor
pub struct Rsbp;

impl ModelSpec for Rsbp {
    const MODEL: Model = Model::Rsbp;

    const MSOP_ID: u64 = 0xA050_A55A_0A05_AA55;
    const DIFOP_ID: u64 = 0x5555_1111_5A00_FFA5;

    const MIN_DISTANCE: f32 = 0.1;
    const MAX_DISTANCE: f32 = 100.0;

    const RX: f64 = 0.01473;
    const RY: f64 = 0.0085;
    const RZ: f64 = 0.09427;

    const ANGLE_SCALE: f32 = 1.0;
    const FILTERED_INTENSITY: f32 = 0.0;
    const RING_TABLE: Option<&'static [u8; CHANNELS_PER_BLOCK]> = Some(&BEAM_RING_TABLE);
}
