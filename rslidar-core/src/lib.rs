//! rslidar-core - Pure decoding library for mechanical rotating LiDAR
//!
//! This crate turns the raw MSOP/DIFOP packet streams of RoboSense
//! mechanical LiDAR sensors into Cartesian point clouds. It has no I/O
//! dependencies: sockets, PCAP replay and frame assembly belong to the
//! receive layer, which feeds packet bytes into a [`Decoder`] one at a
//! time.
//!
//! # Supported Sensors
//!
//! - **RS32**: 32-channel, 200 m
//! - **RSBP**: 32-channel hemispherical, 100 m, beam-ring aware
//!
//! # Example
//!
//! ```rust,no_run
//! use rslidar_core::{new_decoder, DecoderConfig, Model};
//!
//! let mut decoder = new_decoder(Model::Rs32, DecoderConfig::default());
//! let mut points = Vec::new();
//!
//! let msop: &[u8] = &[0u8; 1248]; // Real packet would come from the network
//! match decoder.decode_msop(msop, &mut points) {
//!     Ok(summary) => println!("{} points, first azimuth {}", points.len(), summary.azimuth),
//!     Err(e) => println!("Decode error: {}", e),
//! }
//! ```

pub mod decoder;
pub mod error;
pub mod model;
pub mod models;
pub mod point;
pub mod protocol;
pub mod trig;

// Re-export commonly used types
pub use decoder::time::lidar_time;
pub use decoder::{
    new_decoder, Decoder, DecoderConfig, DecoderStatus, EchoMode, MsopSummary, PacketDecoder,
    TriggerState,
};
pub use error::DecodeError;
pub use model::Model;
pub use models::{ModelSpec, Rs32, Rsbp};
pub use point::LidarPoint;
pub use protocol::difop::DeviceInfo;
