//! Packet timestamp reconstruction
//!
//! MSOP headers carry a civil calendar timestamp (years since 2000) with
//! millisecond and microsecond sub-second fields. The conversion to
//! seconds-since-epoch uses proleptic-Gregorian arithmetic in UTC, never
//! the host timezone.

use chrono::NaiveDate;

use crate::error::DecodeError;
use crate::protocol::msop::MsopView;
use crate::protocol::PacketTime;

/// Seconds since the Unix epoch for the timestamp in an MSOP packet,
/// with microsecond resolution.
///
/// Nonsense calendar fields (month 0, day 40, ...) yield 0.0 rather than
/// an error; the packet geometry is still decodable in that case.
pub fn lidar_time(pkt: &[u8]) -> Result<f64, DecodeError> {
    let view = MsopView::new(pkt)?;
    Ok(civil_seconds(&view.timestamp()).unwrap_or(0.0))
}

/// Convert a packet calendar timestamp into fractional epoch seconds
pub(crate) fn civil_seconds(ts: &PacketTime) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(2000 + ts.year as i32, ts.month as u32, ts.day as u32)?;
    let datetime = date.and_hms_opt(ts.hour as u32, ts.minute as u32, ts.second as u32)?;
    let seconds = datetime.and_utc().timestamp() as f64;
    Some(seconds + ts.ms as f64 / 1_000.0 + ts.us as f64 / 1_000_000.0)
}
