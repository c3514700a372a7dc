//! Decoder state machine
//!
//! A [`Decoder`] instance owns the mutable state of one sensor session:
//! echo mode, spin rate, temperature, calibration and trigger tracking.
//! It is fed raw MSOP/DIFOP bytes by the receive layer (one caller at a
//! time; the decoder itself never spawns threads or blocks) and appends
//! decoded points to a caller-owned buffer.
//!
//! The decoding pipeline is shared across sensor models and parametrised
//! by [`ModelSpec`] constants; [`new_decoder`] erases the model type for
//! callers that select it at runtime.

use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::model::Model;
use crate::models::{ModelSpec, Rs32, Rsbp, DISTANCE_RESOLUTION};
use crate::point::LidarPoint;
use crate::protocol::difop::{DeviceInfo, DifopView};
use crate::protocol::msop::{MsopView, BLOCKS_PER_PACKET, CHANNELS_PER_BLOCK};
use crate::trig::{cos_lookup, sin_lookup, wrap_angle, ANGLE_STEPS};

pub mod calibration;
pub mod time;

use calibration::AngleCalibration;

/// Echo (return) mode of the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EchoMode {
    /// Two returns per firing; neighbouring blocks pair up
    Dual,
    Strongest,
    Last,
}

/// Lifecycle of a decoder instance.
///
/// The transition is monotonic: once calibration has been ingested the
/// decoder never returns to `AwaitingDifop`. MSOP packets are decoded in
/// both states; before calibration the geometry is simply uncorrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecoderStatus {
    AwaitingDifop,
    Running,
}

/// Per-packet result of a successful MSOP decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsopSummary {
    /// Vertical resolution: channels per firing block
    pub height: u16,
    /// Azimuth of the packet's first block, centi-degrees
    pub azimuth: u16,
}

/// Last observed crossing of the configured trigger angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerState {
    /// The configured angle that was crossed, centi-degrees
    pub azimuth: u16,
    /// Seconds since epoch at the crossing packet
    pub timestamp: f64,
}

/// Immutable per-instance decoder configuration.
///
/// Distance bounds are clamped to the model's hard limits at construction;
/// an out-of-range angle window falls back to the full circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Minimum admitted distance, meters
    pub min_distance: f32,
    /// Maximum admitted distance, meters
    pub max_distance: f32,
    /// Azimuth window start, centi-degrees
    pub start_angle: u16,
    /// Azimuth window end, centi-degrees; a start above the end makes the
    /// window wrap through zero
    pub end_angle: u16,
    /// Timestamp trigger crossings with the sensor clock instead of the
    /// host clock
    pub use_lidar_clock: bool,
    /// Angle whose crossings are tracked, centi-degrees; None disables
    /// trigger tracking
    pub trigger_angle: Option<u16>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            min_distance: 0.2,
            max_distance: 200.0,
            start_angle: 0,
            end_angle: ANGLE_STEPS as u16,
            use_lidar_clock: false,
            trigger_angle: None,
        }
    }
}

/// Model-erased decoder interface for callers that pick the sensor model
/// at runtime. See [`new_decoder`].
pub trait PacketDecoder: Send {
    /// The sensor model this decoder speaks
    fn model(&self) -> Model;

    /// Decode one MSOP packet, appending its points to `points`.
    ///
    /// On success the buffer grows by `height × k` points where `k` is the
    /// number of leading blocks whose block magic matched (filtered-out
    /// returns are sentinel points, never absent). On error the buffer and
    /// decoder state are untouched.
    fn decode_msop(
        &mut self,
        pkt: &[u8],
        points: &mut Vec<LidarPoint>,
    ) -> Result<MsopSummary, DecodeError>;

    /// Decode one DIFOP packet, updating decoder state in place
    fn decode_difop(&mut self, pkt: &[u8]) -> Result<(), DecodeError>;

    fn status(&self) -> DecoderStatus;
    fn echo_mode(&self) -> EchoMode;
    /// Spin rate from the last DIFOP, rpm
    fn rpm(&self) -> u16;
    /// MSOP packets per revolution at the current spin rate and echo mode
    fn pkts_per_frame(&self) -> u32;
    /// Temperature from the last MSOP, °C
    fn temperature(&self) -> f32;
    /// Device identity from the last DIFOP, if any has arrived
    fn device_info(&self) -> Option<&DeviceInfo>;
    /// Last trigger-angle crossing, if trigger tracking is configured
    fn trigger_state(&self) -> Option<TriggerState>;
}

/// Construct a decoder for a runtime-selected model
pub fn new_decoder(model: Model, config: DecoderConfig) -> Box<dyn PacketDecoder> {
    match model {
        Model::Rs32 => Box::new(Decoder::<Rs32>::new(config)),
        Model::Rsbp => Box::new(Decoder::<Rsbp>::new(config)),
    }
}

/// Decoder for one sensor session of model `M`.
///
/// Not thread-safe by design: the receive layer serializes packets into it.
pub struct Decoder<M: ModelSpec> {
    config: DecoderConfig,
    /// True when the azimuth window is a plain closed interval
    /// (start ≤ end); false when it wraps through zero
    window_is_interval: bool,
    echo_mode: EchoMode,
    rpm: u16,
    pkts_per_frame: u32,
    temperature: f32,
    calibration: AngleCalibration,
    device_info: Option<DeviceInfo>,
    last_trigger: Option<TriggerState>,
    prev_first_azimuth: Option<u16>,
    _model: PhantomData<M>,
}

impl<M: ModelSpec> Decoder<M> {
    /// Create a decoder, clamping the configured distance window to the
    /// model's hard limits.
    pub fn new(mut config: DecoderConfig) -> Self {
        if config.max_distance > M::MAX_DISTANCE {
            warn!(
                "{}: max_distance {} clamped to {}",
                M::MODEL,
                config.max_distance,
                M::MAX_DISTANCE
            );
            config.max_distance = M::MAX_DISTANCE;
        }
        if config.min_distance < M::MIN_DISTANCE || config.min_distance > config.max_distance {
            config.min_distance = M::MIN_DISTANCE;
        }
        if config.start_angle > ANGLE_STEPS as u16 || config.end_angle > ANGLE_STEPS as u16 {
            warn!(
                "{}: angle window {}..{} out of range, using full circle",
                M::MODEL,
                config.start_angle,
                config.end_angle
            );
            config.start_angle = 0;
            config.end_angle = ANGLE_STEPS as u16;
        }
        let window_is_interval = config.start_angle <= config.end_angle;
        debug!(
            "{}: decoder ready, distance window {}..{} m",
            M::MODEL,
            config.min_distance,
            config.max_distance
        );
        Decoder {
            config,
            window_is_interval,
            echo_mode: EchoMode::Strongest,
            rpm: 600,
            pkts_per_frame: M::PKT_RATE * 60 / 600,
            temperature: 0.0,
            calibration: AngleCalibration::new(CHANNELS_PER_BLOCK),
            device_info: None,
            last_trigger: None,
            prev_first_azimuth: None,
            _model: PhantomData,
        }
    }

    /// Decode one MSOP packet; see [`PacketDecoder::decode_msop`]
    pub fn decode_msop(
        &mut self,
        pkt: &[u8],
        points: &mut Vec<LidarPoint>,
    ) -> Result<MsopSummary, DecodeError> {
        let view = MsopView::new(pkt)?;
        if view.id() != M::MSOP_ID {
            return Err(DecodeError::WrongPacketHeader {
                expected: M::MSOP_ID,
                actual: view.id(),
            });
        }

        self.temperature = decode_temperature(view.temperature_raw());
        let first_azimuth = view.block(0).azimuth();
        self.track_trigger(&view, first_azimuth);

        let stride = match self.echo_mode {
            EchoMode::Dual => 2,
            EchoMode::Strongest | EchoMode::Last => 1,
        };

        for blk in 0..BLOCKS_PER_PACKET {
            let block = view.block(blk);
            if block.id() != M::BLOCK_ID {
                trace!("{}: block {} magic mismatch, truncating", M::MODEL, blk);
                break;
            }
            let cur_azi = block.azimuth() as i32;
            // Positive angular step to the neighbouring block at the echo
            // stride, measured backwards for the tail blocks so the wrap
            // through 360° never yields a negative difference.
            let azi_diff = if blk < BLOCKS_PER_PACKET - stride {
                (36000 + view.block(blk + stride).azimuth() as i32 - cur_azi) % 36000
            } else {
                (36000 + cur_azi - view.block(blk - stride).azimuth() as i32) % 36000
            } as f32;

            for channel in 0..CHANNELS_PER_BLOCK {
                let ret = block.channel(channel);
                // The 32 channels fire in two simultaneous groups of 16.
                let azi_channel = cur_azi as f32
                    + azi_diff * M::CHANNEL_TOFFSET * (channel % 16) as f32 / M::FIRING_TDURATION;
                let azi_final =
                    wrap_angle((azi_channel + self.calibration.hori(channel)) as i32);
                let distance = (ret.distance as f64 * DISTANCE_RESOLUTION) as f32;

                let point = if self.admits(distance, azi_final) {
                    let angle_horiz = wrap_angle(azi_channel as i32);
                    let angle_vert = wrap_angle(self.calibration.vert(channel) as i32);
                    let d = distance as f64;
                    let x = d * cos_lookup(angle_vert) * cos_lookup(azi_final)
                        + M::RX * cos_lookup(angle_horiz);
                    let y = -d * cos_lookup(angle_vert) * sin_lookup(azi_final)
                        - M::RX * sin_lookup(angle_horiz);
                    let z = d * sin_lookup(angle_vert) + M::RZ;
                    LidarPoint {
                        x: x as f32,
                        y: y as f32,
                        z: z as f32,
                        intensity: ret.intensity as f32,
                        ring: match M::RING_TABLE {
                            Some(table) => table[channel] as i16,
                            None => -1,
                        },
                    }
                } else {
                    LidarPoint::filtered(M::FILTERED_INTENSITY)
                };
                points.push(point);
            }
        }

        Ok(MsopSummary {
            height: CHANNELS_PER_BLOCK as u16,
            azimuth: first_azimuth,
        })
    }

    /// Decode one DIFOP packet; see [`PacketDecoder::decode_difop`]
    pub fn decode_difop(&mut self, pkt: &[u8]) -> Result<(), DecodeError> {
        let view = DifopView::new(pkt)?;
        if view.id() != M::DIFOP_ID {
            return Err(DecodeError::WrongPacketHeader {
                expected: M::DIFOP_ID,
                actual: view.id(),
            });
        }

        let mode = match view.return_mode() {
            0x00 => Some(EchoMode::Dual),
            0x01 => Some(EchoMode::Strongest),
            0x02 => Some(EchoMode::Last),
            other => {
                trace!("{}: unknown return mode {:#04x}", M::MODEL, other);
                None
            }
        };
        if let Some(mode) = mode {
            if mode != self.echo_mode {
                debug!("{}: echo mode {:?} -> {:?}", M::MODEL, self.echo_mode, mode);
            }
            self.echo_mode = mode;
        }

        let rpm = view.rpm();
        if rpm > 0 {
            self.rpm = rpm;
            let doubling = if self.echo_mode == EchoMode::Dual { 2 } else { 1 };
            self.pkts_per_frame =
                ((doubling * M::PKT_RATE * 60) as f64 / rpm as f64).ceil() as u32;
        }

        self.device_info = Some(view.device_info());

        if self
            .calibration
            .ingest(view.pitch_calibration(), view.yaw_calibration(), M::ANGLE_SCALE)
        {
            info!("{}: angle calibration loaded", M::MODEL);
        }
        Ok(())
    }

    /// Lifecycle status; see [`DecoderStatus`]
    pub fn status(&self) -> DecoderStatus {
        if self.calibration.loaded() {
            DecoderStatus::Running
        } else {
            DecoderStatus::AwaitingDifop
        }
    }

    pub fn echo_mode(&self) -> EchoMode {
        self.echo_mode
    }

    pub fn rpm(&self) -> u16 {
        self.rpm
    }

    pub fn pkts_per_frame(&self) -> u32 {
        self.pkts_per_frame
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_ref()
    }

    pub fn trigger_state(&self) -> Option<TriggerState> {
        self.last_trigger
    }

    /// Filter gate: inclusive distance window plus the configured azimuth
    /// window, which may wrap through zero.
    fn admits(&self, distance: f32, azimuth: usize) -> bool {
        if distance < self.config.min_distance || distance > self.config.max_distance {
            return false;
        }
        let azimuth = azimuth as u16;
        if self.window_is_interval {
            azimuth >= self.config.start_angle && azimuth <= self.config.end_angle
        } else {
            azimuth >= self.config.start_angle || azimuth <= self.config.end_angle
        }
    }

    /// Record a trigger-state sample when the first-block azimuth stream
    /// sweeps across the configured trigger angle.
    fn track_trigger(&mut self, view: &MsopView<'_>, first_azimuth: u16) {
        let Some(trigger) = self.config.trigger_angle else {
            return;
        };
        let Some(prev) = self.prev_first_azimuth.replace(first_azimuth) else {
            return;
        };
        let span = (36000 + first_azimuth as i32 - prev as i32) % 36000;
        let to_trigger = (36000 + trigger as i32 - prev as i32) % 36000;
        if span > 0 && to_trigger > 0 && to_trigger <= span {
            let timestamp = if self.config.use_lidar_clock {
                time::civil_seconds(&view.timestamp()).unwrap_or(0.0)
            } else {
                host_time()
            };
            trace!("{}: trigger angle {} crossed", M::MODEL, trigger);
            self.last_trigger = Some(TriggerState {
                azimuth: trigger,
                timestamp,
            });
        }
    }
}

impl<M: ModelSpec> PacketDecoder for Decoder<M> {
    fn model(&self) -> Model {
        M::MODEL
    }

    fn decode_msop(
        &mut self,
        pkt: &[u8],
        points: &mut Vec<LidarPoint>,
    ) -> Result<MsopSummary, DecodeError> {
        Decoder::decode_msop(self, pkt, points)
    }

    fn decode_difop(&mut self, pkt: &[u8]) -> Result<(), DecodeError> {
        Decoder::decode_difop(self, pkt)
    }

    fn status(&self) -> DecoderStatus {
        Decoder::status(self)
    }

    fn echo_mode(&self) -> EchoMode {
        Decoder::echo_mode(self)
    }

    fn rpm(&self) -> u16 {
        Decoder::rpm(self)
    }

    fn pkts_per_frame(&self) -> u32 {
        Decoder::pkts_per_frame(self)
    }

    fn temperature(&self) -> f32 {
        Decoder::temperature(self)
    }

    fn device_info(&self) -> Option<&DeviceInfo> {
        Decoder::device_info(self)
    }

    fn trigger_state(&self) -> Option<TriggerState> {
        Decoder::trigger_state(self)
    }
}

/// Decode the MSOP raw temperature field: sign bit, 7-bit coarse count,
/// 5-bit fine count, 0.0625 °C quantum.
fn decode_temperature(raw: [u8; 2]) -> f32 {
    let coarse = (raw[1] & 0x7F) as f32;
    let fine = (raw[0] >> 3) as f32;
    let magnitude = (coarse * 32.0 + fine) * 0.0625;
    if raw[1] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

fn host_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
