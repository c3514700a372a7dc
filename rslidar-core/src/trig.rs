//! Process-global trigonometry lookup tables
//!
//! Azimuth and vertical angles travel through the decoder as integer
//! hundredths of a degree, so a single pair of 36000-entry sine/cosine
//! tables serves every decoder instance. The tables are built on first use
//! and read-only afterwards.

use std::sync::LazyLock;

/// Number of table entries: one per hundredth of a degree
pub const ANGLE_STEPS: usize = 36000;

struct TrigTables {
    sin: Vec<f64>,
    cos: Vec<f64>,
}

static TABLES: LazyLock<TrigTables> = LazyLock::new(|| {
    let mut sin = Vec::with_capacity(ANGLE_STEPS);
    let mut cos = Vec::with_capacity(ANGLE_STEPS);
    for i in 0..ANGLE_STEPS {
        let rad = (i as f64 * 0.01).to_radians();
        sin.push(rad.sin());
        cos.push(rad.cos());
    }
    TrigTables { sin, cos }
});

/// Normalise an angle in hundredths of a degree into a table index in
/// `[0, 36000)`. Handles negative angles and multiple wraps.
pub fn wrap_angle(angle: i32) -> usize {
    (((angle % ANGLE_STEPS as i32) + ANGLE_STEPS as i32) % ANGLE_STEPS as i32) as usize
}

/// Sine of `index × 0.01°`
pub fn sin_lookup(index: usize) -> f64 {
    TABLES.sin[index]
}

/// Cosine of `index × 0.01°`
pub fn cos_lookup(index: usize) -> f64 {
    TABLES.cos[index]
}
