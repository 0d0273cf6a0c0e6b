//! Replay of recorded image sequences.

use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::image::{Frame, Resolution};

use super::FrameSource;

/// A [`FrameSource`] streaming the image files of a directory, in file name
/// order.
///
/// Files with unsupported extensions are skipped. Decoding happens lazily, one
/// frame per [`FrameSource::next_frame`] call.
pub struct ReplaySource {
    paths: std::vec::IntoIter<PathBuf>,
    resolution: Option<Resolution>,
}

impl ReplaySource {
    /// Opens a directory of `png`/`jpg`/`jpeg` frames.
    ///
    /// Fails when `dir` cannot be read. A directory without any image files
    /// is a valid, zero-length sequence.
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        Self::open_impl(dir.as_ref())
    }

    fn open_impl(dir: &Path) -> anyhow::Result<Self> {
        let paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("png" | "jpg" | "jpeg")
                )
            })
            .sorted()
            .collect::<Vec<_>>();

        if paths.is_empty() {
            log::warn!("no image files found in '{}'", dir.display());
        }

        Ok(Self {
            paths: paths.into_iter(),
            resolution: None,
        })
    }

    /// Requests a fixed output resolution.
    ///
    /// Frames of a different size are resampled after decoding; this mirrors
    /// the best-effort size request a capture device would receive.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>> {
        let Some(path) = self.paths.next() else {
            return Ok(None);
        };

        let mut frame = Frame::load(&path)?;
        if let Some(resolution) = self.resolution {
            frame.resize(resolution);
        }
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use crate::image::ChannelOrder;

    use super::*;

    fn write_frame(dir: &Path, name: &str, value: u8) {
        let res = Resolution::new(4, 4);
        let frame = Frame::from_raw(res, ChannelOrder::Rgb, vec![value; res.num_pixels() * 3]);
        frame.save(dir.join(name)).unwrap();
    }

    #[test]
    fn frames_are_served_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "frame_002.png", 30);
        write_frame(dir.path(), "frame_000.png", 10);
        write_frame(dir.path(), "frame_001.png", 20);
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

        let mut source = ReplaySource::open(dir.path()).unwrap();
        for expected in [10, 20, 30] {
            let frame = source.next_frame().unwrap().unwrap();
            assert_eq!(frame.get(0, 0).r(), expected);
        }
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn requested_resolution_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "frame.png", 128);

        let mut source = ReplaySource::open(dir.path())
            .unwrap()
            .with_resolution(Resolution::new(8, 2));
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.resolution(), Resolution::new(8, 2));
    }

    #[test]
    fn empty_directory_is_a_zero_length_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ReplaySource::open(dir.path()).unwrap();
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn missing_directory_fails_fast() {
        assert!(ReplaySource::open("/nonexistent/frames").is_err());
    }
}
