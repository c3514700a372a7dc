//! LiDAR Model Database
//!
//! Per-model constants for the supported mechanical LiDAR sensors. The two
//! models speak the same packet dialect (identical MSOP/DIFOP geometry) but
//! differ in mechanical offsets, range limits, calibration scaling and beam
//! layout. Adding a sensor of this family means adding one more `ModelSpec`
//! implementation; the decoding pipeline itself is shared.

use crate::model::Model;
use crate::protocol::msop::CHANNELS_PER_BLOCK;

pub mod rs32;
pub mod rsbp;

pub use rs32::Rs32;
pub use rsbp::Rsbp;

/// Wire distance resolution in meters (5 mm per count)
pub const DISTANCE_RESOLUTION: f64 = 0.005;

/// Compile-time constants for a specific LiDAR model.
///
/// Implementations are zero-sized marker types; the constants parametrise
/// the shared decoding pipeline in [`crate::decoder`].
pub trait ModelSpec: Send + 'static {
    /// Runtime tag for this model
    const MODEL: Model;

    /// MSOP packet identifier (big-endian 8-byte magic)
    const MSOP_ID: u64;
    /// DIFOP packet identifier (big-endian 8-byte magic)
    const DIFOP_ID: u64;
    /// Firing block identifier (big-endian 2-byte magic)
    const BLOCK_ID: u16 = 0xEEFF;

    /// MSOP packet rate at full duty, packets per second
    const PKT_RATE: u32 = 1500;

    /// Time offset between successive channel firings within a group, µs
    const CHANNEL_TOFFSET: f32 = 3.0;
    /// Duration of one complete block firing, µs
    const FIRING_TDURATION: f32 = 50.0;

    /// Hard lower bound on the configurable minimum distance, meters
    const MIN_DISTANCE: f32;
    /// Hard upper bound on the configurable maximum distance, meters
    const MAX_DISTANCE: f32;

    /// Optical-center offsets from the mounting origin, meters.
    /// `RY` is carried for completeness; the projection of the supported
    /// models uses only `RX` and `RZ`.
    const RX: f64;
    const RY: f64;
    const RZ: f64;

    /// Scale applied to parsed calibration values before storage.
    /// See DESIGN.md: RS32 stores tenths of the wire value, RSBP stores
    /// the raw centi-degree integer.
    const ANGLE_SCALE: f32;

    /// Intensity written to filtered-out points
    const FILTERED_INTENSITY: f32;

    /// Channel-index → beam-ring permutation, bottom beam = ring 0.
    /// `None` for models that do not report a ring.
    const RING_TABLE: Option<&'static [u8; CHANNELS_PER_BLOCK]>;
}
