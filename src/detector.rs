//! The hand landmark detector capability.
//!
//! Detection itself is performed by an external collaborator; this module
//! defines the interface the acquisition loop programs against, plus two
//! deterministic implementations used for replay, demos and tests.

use std::collections::VecDeque;

use crate::image::{ChannelOrder, Frame};
use crate::landmark::{Landmarks, HAND_LANDMARK_COUNT};

/// Detector configuration knobs.
#[derive(Debug, Clone, Copy)]
pub struct DetectorOptions {
    max_hands: usize,
    min_confidence: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            max_hands: 1,
            min_confidence: 0.3,
        }
    }
}

impl DetectorOptions {
    /// Sets the upper bound on simultaneously tracked hands.
    ///
    /// Detectors report at most one hand per frame regardless; this bound
    /// limits how many candidates they consider internally.
    #[inline]
    pub fn max_hands(mut self, max_hands: usize) -> Self {
        self.max_hands = max_hands;
        self
    }

    /// Sets the minimum detection confidence below which a frame is reported
    /// as having no hand.
    #[inline]
    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

/// Capability trait for hand landmark detection.
///
/// A detector is given one frame at a time and returns the landmarks of the
/// first tracked hand, or [`None`] when no hand was found. An empty result is
/// a normal, expected outcome, not an error; detectors do not fail.
pub trait HandDetector {
    /// The channel order this detector expects its input frames in.
    ///
    /// The acquisition loop converts every frame to this order before calling
    /// [`HandDetector::detect`].
    fn input_order(&self) -> ChannelOrder {
        ChannelOrder::Rgb
    }

    /// Runs hand landmark detection on `frame`.
    fn detect(&mut self, frame: &Frame) -> Option<Landmarks>;
}

/// A detector that replays a fixed script of per-frame results.
///
/// Once the script is exhausted, every further frame yields [`None`].
pub struct ScriptedDetector {
    script: VecDeque<Option<Landmarks>>,
}

impl ScriptedDetector {
    pub fn new<I: IntoIterator<Item = Option<Landmarks>>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl HandDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> Option<Landmarks> {
        self.script.pop_front().flatten()
    }
}

/// Offsets of the 21 landmarks relative to the palm center, in normalized
/// coordinates, forming a stylized upright hand.
const HAND_SHAPE: [[f32; 3]; HAND_LANDMARK_COUNT] = [
    [0.000, 0.120, 0.000],
    [-0.060, 0.090, -0.005],
    [-0.095, 0.055, -0.010],
    [-0.120, 0.020, -0.015],
    [-0.140, -0.010, -0.020],
    [-0.045, 0.000, -0.005],
    [-0.050, -0.050, -0.010],
    [-0.052, -0.085, -0.015],
    [-0.055, -0.115, -0.020],
    [0.000, -0.005, -0.005],
    [0.000, -0.060, -0.010],
    [0.000, -0.100, -0.015],
    [0.000, -0.130, -0.020],
    [0.045, 0.000, -0.005],
    [0.048, -0.050, -0.010],
    [0.050, -0.085, -0.015],
    [0.052, -0.110, -0.020],
    [0.085, 0.015, -0.005],
    [0.092, -0.025, -0.010],
    [0.096, -0.055, -0.015],
    [0.100, -0.080, -0.020],
];

/// A deterministic stand-in detector that reports a synthetic hand orbiting
/// the frame center.
///
/// The reported confidence oscillates over time, so configuring a high
/// [`DetectorOptions::min_confidence`] produces periodic empty results the way
/// a real detector would on hard frames. Two instances created with the same
/// parameters report identical results for identical frame sequences, which
/// makes this suitable for golden tests and demos.
pub struct SyntheticHand {
    options: DetectorOptions,
    frame: u64,
    orbit_radius: f32,
    angular_step: f32,
}

impl SyntheticHand {
    const CONFIDENCE_PERIOD: f32 = 0.23;

    pub fn new(options: DetectorOptions) -> Self {
        Self {
            options,
            frame: 0,
            orbit_radius: 0.25,
            angular_step: 0.1,
        }
    }

    /// Overrides the orbit the synthetic palm center follows.
    pub fn with_orbit(mut self, radius: f32, angular_step: f32) -> Self {
        self.orbit_radius = radius;
        self.angular_step = angular_step;
        self
    }
}

impl HandDetector for SyntheticHand {
    fn detect(&mut self, _frame: &Frame) -> Option<Landmarks> {
        let t = self.frame as f32;
        self.frame += 1;

        if self.options.max_hands == 0 {
            return None;
        }

        let confidence = 0.65 + 0.35 * (t * Self::CONFIDENCE_PERIOD).cos();
        if confidence < self.options.min_confidence {
            return None;
        }

        let angle = t * self.angular_step;
        let center = [
            0.5 + self.orbit_radius * angle.cos(),
            0.5 + self.orbit_radius * angle.sin(),
            0.0,
        ];

        Some(Landmarks::from_positions(HAND_SHAPE.iter().map(|offset| {
            [
                center[0] + offset[0],
                center[1] + offset[1],
                center[2] + offset[2],
            ]
        })))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::image::Resolution;

    use super::*;

    fn frame() -> Frame {
        Frame::new(Resolution::new(16, 16))
    }

    #[test]
    fn scripted_replays_in_order() {
        let mut det = ScriptedDetector::new([
            Some(Landmarks::new(HAND_LANDMARK_COUNT)),
            None,
            Some(Landmarks::new(HAND_LANDMARK_COUNT)),
        ]);

        assert!(det.detect(&frame()).is_some());
        assert!(det.detect(&frame()).is_none());
        assert!(det.detect(&frame()).is_some());
        // Script exhausted.
        assert!(det.detect(&frame()).is_none());
        assert!(det.detect(&frame()).is_none());
    }

    #[test]
    fn synthetic_is_deterministic() {
        let mut a = SyntheticHand::new(DetectorOptions::default());
        let mut b = SyntheticHand::new(DetectorOptions::default());

        for _ in 0..50 {
            match (a.detect(&frame()), b.detect(&frame())) {
                (Some(la), Some(lb)) => {
                    for (pa, pb) in la.positions().iter().zip(lb.positions()) {
                        assert_relative_eq!(pa[0], pb[0]);
                        assert_relative_eq!(pa[1], pb[1]);
                        assert_relative_eq!(pa[2], pb[2]);
                    }
                }
                (None, None) => {}
                other => panic!("detectors disagree: {:?}", other.0.map(|_| ())),
            }
        }
    }

    #[test]
    fn synthetic_reports_full_hands() {
        let mut det = SyntheticHand::new(DetectorOptions::default());
        let landmarks = det.detect(&frame()).unwrap();
        assert_eq!(landmarks.len(), HAND_LANDMARK_COUNT);
    }

    #[test]
    fn high_threshold_produces_empty_results() {
        let mut det = SyntheticHand::new(DetectorOptions::default().min_confidence(0.9));
        let empty = (0..100).filter(|_| det.detect(&frame()).is_none()).count();
        assert!(empty > 0, "confidence never dipped below the threshold");
    }
}
