//! Hand landmark types.
//!
//! A detected hand is described by a fixed, ordered set of 21 landmarks in
//! normalized image coordinates (see the crate-level docs for the coordinate
//! conventions).

use crate::image::{draw, Color, Frame, Resolution};

type Position = [f32; 3];

/// Number of landmarks that make up a hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Names of the 21 hand landmarks, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl LandmarkIdx {
    /// All landmarks, in storage order.
    pub const ALL: [LandmarkIdx; HAND_LANDMARK_COUNT] = {
        use LandmarkIdx::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };

    /// The display name of the finger a tip landmark belongs to.
    ///
    /// Returns [`None`] for landmarks that aren't fingertips.
    pub fn finger_name(&self) -> Option<&'static str> {
        match self {
            LandmarkIdx::ThumbTip => Some("Thumb"),
            LandmarkIdx::IndexFingerTip => Some("Index finger"),
            LandmarkIdx::MiddleFingerTip => Some("Middle finger"),
            LandmarkIdx::RingFingerTip => Some("Ring finger"),
            LandmarkIdx::PinkyTip => Some("Pinky finger"),
            _ => None,
        }
    }
}

/// The five fingertip landmarks, thumb first.
pub const FINGERTIPS: [LandmarkIdx; 5] = [
    LandmarkIdx::ThumbTip,
    LandmarkIdx::IndexFingerTip,
    LandmarkIdx::MiddleFingerTip,
    LandmarkIdx::RingFingerTip,
    LandmarkIdx::PinkyTip,
];

/// Pairs of landmarks connected by the hand skeleton.
pub const HAND_CONNECTIONS: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        (Wrist, ThumbCmc),
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        (Wrist, IndexFingerMcp),
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        (RingFingerMcp, PinkyMcp),
        (Wrist, PinkyMcp),
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

/// A single landmark in normalized image coordinates.
///
/// Immutable once produced for a frame.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Landmark {
    pos: Position,
}

impl Landmark {
    pub fn new(position: Position) -> Self {
        Self { pos: position }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }

    /// Maps the normalized X/Y coordinates to pixel space for a frame of the
    /// given size.
    ///
    /// Only used for rendering; logging always records normalized coordinates.
    pub fn to_pixel(&self, resolution: Resolution) -> (i32, i32) {
        (
            (self.x() * resolution.width() as f32) as i32,
            (self.y() * resolution.height() as f32) as i32,
        )
    }
}

/// An ordered collection of [`Landmark`]s, one detection result's worth.
#[derive(Clone)]
pub struct Landmarks {
    positions: Box<[Position]>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated
    /// landmarks, all starting at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0]; len].into_boxed_slice(),
        }
    }

    /// Collects positions into a [`Landmarks`] collection.
    pub fn from_positions<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        (0..self.positions.len()).map(|i| self.get(i))
    }

    pub fn get(&self, index: usize) -> Landmark {
        Landmark::new(self.positions[index])
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        self.positions[index] = landmark.pos;
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn map_positions(&mut self, mut f: impl FnMut(Position) -> Position) {
        for pos in &mut *self.positions {
            *pos = f(*pos);
        }
    }

    /// Draws the hand onto `target`: skeleton connections (for full hands) and
    /// a numbered marker per landmark.
    pub fn draw(&self, target: &mut Frame) {
        let res = target.resolution();

        if self.len() == HAND_LANDMARK_COUNT {
            for &(a, b) in HAND_CONNECTIONS {
                let start = self.get(a as usize).to_pixel(res);
                let end = self.get(b as usize).to_pixel(res);
                draw::line(target, start, end).color(Color::from_rgb8(127, 127, 127));
            }
        }

        for (index, lm) in self.iter().enumerate() {
            let (x, y) = lm.to_pixel(res);
            draw::marker(target, x, y);
            draw::text(target, x, y - 6, &index.to_string()).align_bottom();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_mapping_truncates() {
        let lm = Landmark::new([0.5, 0.25, 0.0]);
        assert_eq!(lm.to_pixel(Resolution::new(640, 480)), (320, 120));

        let lm = Landmark::new([0.999, 0.999, 0.0]);
        assert_eq!(lm.to_pixel(Resolution::new(100, 100)), (99, 99));
    }

    #[test]
    fn landmark_index_order_matches_storage() {
        assert_eq!(LandmarkIdx::ThumbTip as usize, 4);
        assert_eq!(LandmarkIdx::IndexFingerTip as usize, 8);
        assert_eq!(LandmarkIdx::PinkyTip as usize, 20);
        assert_eq!(LandmarkIdx::ALL.len(), HAND_LANDMARK_COUNT);
    }

    #[test]
    fn fingertip_names() {
        let names = FINGERTIPS
            .iter()
            .map(|tip| tip.finger_name().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "Thumb",
                "Index finger",
                "Middle finger",
                "Ring finger",
                "Pinky finger"
            ]
        );
        assert_eq!(LandmarkIdx::Wrist.finger_name(), None);
    }

    #[test]
    fn skeleton_touches_every_landmark() {
        for idx in LandmarkIdx::ALL {
            assert!(
                HAND_CONNECTIONS
                    .iter()
                    .any(|&(a, b)| a == idx || b == idx),
                "{idx:?} is not part of the skeleton"
            );
        }
    }
}
