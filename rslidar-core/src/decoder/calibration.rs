//! Per-channel angle calibration store
//!
//! Vertical and horizontal angle offsets arrive once on DIFOP, encoded per
//! channel as a 3-byte sign/magnitude group. Until a populated table is
//! seen the store stays at zero and the decoder produces uncalibrated
//! geometry.

/// Per-channel vertical and horizontal angle offsets.
///
/// Values are stored in the unit the owning model's `ANGLE_SCALE` yields;
/// they are only ever applied by channel index and wrapped into trig-table
/// indices downstream.
#[derive(Debug, Clone)]
pub struct AngleCalibration {
    vert: Vec<f32>,
    hori: Vec<f32>,
    loaded: bool,
}

impl AngleCalibration {
    /// Zeroed store for `channels` channels
    pub fn new(channels: usize) -> Self {
        AngleCalibration {
            vert: vec![0.0; channels],
            hori: vec![0.0; channels],
            loaded: false,
        }
    }

    /// True once a populated calibration block has been ingested
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Vertical offset for `channel`
    pub fn vert(&self, channel: usize) -> f32 {
        self.vert[channel]
    }

    /// Horizontal offset for `channel`
    pub fn hori(&self, channel: usize) -> f32 {
        self.hori[channel]
    }

    /// Ingest the pitch and yaw calibration regions from a DIFOP packet.
    ///
    /// No-op when already loaded, or when the pitch region carries the
    /// factory sentinel (leading bytes all `0x00`/`0xFF`). Returns true on
    /// the one load transition.
    pub fn ingest(&mut self, pitch: &[u8], yaw: &[u8], scale: f32) -> bool {
        if self.loaded || region_is_blank(pitch) {
            return false;
        }
        for channel in 0..self.vert.len() {
            self.vert[channel] = parse_angle(&pitch[channel * 3..]) as f32 * scale;
            self.hori[channel] = parse_angle(&yaw[channel * 3..]) as f32 * scale;
        }
        self.loaded = true;
        true
    }
}

/// Sentinel-block detection: an unprogrammed calibration region leads with
/// bytes that are each either 0x00 or 0xFF.
fn region_is_blank(region: &[u8]) -> bool {
    region[..3]
        .iter()
        .all(|&b| b == 0x00 || b == 0xFF)
}

/// Decode one `{sign, msb, lsb}` group into a signed centi-degree value
fn parse_angle(group: &[u8]) -> i32 {
    let magnitude = group[1] as i32 * 256 + group[2] as i32;
    if group[0] == 1 {
        -magnitude
    } else {
        magnitude
    }
}
