use crate::quality::Quality;

/// Filters quality-control movements before they reach the runner.
///
/// While the control is being dragged, a change only goes through once it
/// moved more than `threshold` away from the last value that went through.
/// Releasing the control always goes through.
#[derive(Debug, Clone)]
pub struct QualityDebouncer {
    threshold: f32,
    previous: f32,
}

impl QualityDebouncer {
    pub fn new(threshold: f32, initial: Quality) -> Self {
        Self {
            threshold: threshold.max(0.0),
            previous: initial.value(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn previous(&self) -> Quality {
        Quality::saturating(self.previous)
    }

    pub fn on_change(&mut self, value: f32) -> Option<Quality> {
        let quality = Quality::saturating(value);
        if (quality.value() - self.previous).abs() <= self.threshold {
            return None;
        }
        self.previous = quality.value();
        Some(quality)
    }

    pub fn on_settle(&mut self, value: f32) -> Quality {
        let quality = Quality::saturating(value);
        self.previous = quality.value();
        quality
    }
}
