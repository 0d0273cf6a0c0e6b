//! Frame sources.
//!
//! Live camera capture is an externally supplied capability; in-tree sources
//! replay recorded material: [`FrameSequence`] serves frames from memory,
//! [`replay::ReplaySource`] streams an on-disk image sequence.

pub mod replay;

use std::collections::VecDeque;

use crate::image::Frame;

/// Capability trait for anything that produces frames.
///
/// A source yields a lazy, finite or infinite sequence of frames. `Ok(None)`
/// signals end-of-stream, which terminates the acquisition loop normally; an
/// error (e.g. a malformed frame from an otherwise successful read) aborts it.
pub trait FrameSource {
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>>;
}

/// An in-memory [`FrameSource`] yielding a fixed sequence of frames.
pub struct FrameSequence {
    frames: VecDeque<Frame>,
}

impl FrameSequence {
    pub fn new<I: IntoIterator<Item = Frame>>(frames: I) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl FrameSource for FrameSequence {
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{ChannelOrder, Resolution};

    use super::*;

    #[test]
    fn sequence_yields_frames_in_order_then_ends() {
        let res = Resolution::new(2, 2);
        let frames = (0u8..3).map(|i| {
            Frame::from_raw(res, ChannelOrder::Rgb, vec![i; res.num_pixels() * 3])
        });
        let mut source = FrameSequence::new(frames);

        for i in 0u8..3 {
            let frame = source.next_frame().unwrap().unwrap();
            assert_eq!(frame.get(0, 0).r(), i);
        }
        assert!(source.next_frame().unwrap().is_none());
        // End-of-stream is sticky.
        assert!(source.next_frame().unwrap().is_none());
    }
}
