//! Decoded point representation

/// One decoded laser return in the sensor-local Cartesian frame.
///
/// Every decoded MSOP block contributes a fixed number of points; returns
/// rejected by the distance or azimuth window are emitted as sentinels
/// (`x`/`y`/`z` NaN, `ring` -1) so that the packet stride stays constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidarPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Raw 8-bit return intensity; model-specific sentinel when filtered
    pub intensity: f32,
    /// Beam ring, bottom = 0; -1 when filtered or when the model has no
    /// ring table
    pub ring: i16,
}

impl LidarPoint {
    /// Sentinel point for a return rejected by the filter gate
    pub fn filtered(intensity: f32) -> Self {
        LidarPoint {
            x: f32::NAN,
            y: f32::NAN,
            z: f32::NAN,
            intensity,
            ring: -1,
        }
    }

    /// True when this point carries real geometry
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
    }
}
