use std::fmt;

use crate::error::QualityError;

/// Lossy compression quality in `0.0..=1.0` (1.0 = best quality, largest output).
///
/// Each codec adapter decides how the scalar maps onto its own encoder
/// settings; equal values are not expected to give equal compression ratios
/// across formats.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quality(f32);

impl Quality {
    pub const MIN: Quality = Quality(0.0);
    pub const MAX: Quality = Quality(1.0);

    pub fn new(value: f32) -> Result<Self, QualityError> {
        if value.is_nan() {
            return Err(QualityError::NotANumber);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(QualityError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Clamp into range; NaN becomes 0.0.
    pub fn saturating(value: f32) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Integer encoder quality in `1..=100`. Both encoders reject 0.
    pub fn to_percent(self) -> u8 {
        (1.0 + self.0 * 99.0).round() as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.5)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f32> for Quality {
    type Error = QualityError;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
