//! The frame acquisition and logging loop.
//!
//! [`Tracker`] owns the frame source, the detector and the attached output
//! capabilities for one run, and drives the per-frame cycle: read, mirror,
//! convert, detect, annotate/log/record, display, poll for cancellation. It
//! performs no detection work itself.
//!
//! The loop is single-threaded and fully synchronous: acquisition, detection,
//! rendering and file I/O run strictly in sequence with no overlap between
//! frames, so the trajectory buffer and sink are owned exclusively and need no
//! locking.

use crate::detector::{DetectorOptions, HandDetector};
use crate::gui::{Surface, TrajectoryPlot};
use crate::image::Resolution;
use crate::landmark::{Landmark, LandmarkIdx, FINGERTIPS};
use crate::sink::{Schema, TrackSink};
use crate::timer::FpsCounter;
use crate::trajectory::Trajectory;
use crate::video::FrameSource;

/// The subset of landmark nodes whose coordinates are logged and recorded.
///
/// Annotation always draws the whole hand; the subset only selects what goes
/// to the sink and the trajectory buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSubset {
    /// Two fixed nodes, logged as one wide row per frame.
    Pair(LandmarkIdx, LandmarkIdx),
    /// The five fingertip nodes.
    Fingertips,
    /// All 21 nodes.
    All,
    /// An arbitrary list of nodes, in logging order.
    Nodes(Vec<LandmarkIdx>),
}

impl NodeSubset {
    /// The tracked node indices, in logging order.
    pub fn indices(&self) -> Vec<LandmarkIdx> {
        match self {
            NodeSubset::Pair(a, b) => vec![*a, *b],
            NodeSubset::Fingertips => FINGERTIPS.to_vec(),
            NodeSubset::All => LandmarkIdx::ALL.to_vec(),
            NodeSubset::Nodes(nodes) => nodes.clone(),
        }
    }
}

/// Per-invocation configuration of the acquisition loop.
///
/// All values are fixed for the duration of a run. The preset constructors
/// correspond to the tracked-variant families; every field can be adjusted
/// afterwards.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    /// Knobs forwarded to the detector.
    pub detector: DetectorOptions,
    /// Frame size hint, to be requested from the source (best-effort).
    pub resolution: Resolution,
    /// Mirror each frame horizontally before detection.
    pub mirror: bool,
    /// Draw markers, node numbers and the skeleton onto detected frames.
    pub annotate: bool,
    /// The logged node subset.
    pub nodes: NodeSubset,
    /// Capacity of the trajectory buffer, or [`None`] to disable trajectory
    /// tracking.
    pub trajectory: Option<usize>,
}

impl TrackConfig {
    /// Trajectory capacity used by the sample configurations.
    pub const DEFAULT_TRAJECTORY_CAPACITY: usize = 100;

    /// Tracks the thumb tip / index fingertip pair, logged as wide rows.
    pub fn node_pair() -> Self {
        Self {
            detector: DetectorOptions::default(),
            resolution: Resolution::new(720, 640),
            mirror: true,
            annotate: true,
            nodes: NodeSubset::Pair(LandmarkIdx::ThumbTip, LandmarkIdx::IndexFingerTip),
            trajectory: None,
        }
    }

    /// Tracks the five fingertips, logged one row per finger.
    pub fn fingertips() -> Self {
        Self {
            resolution: Resolution::new(320, 240),
            nodes: NodeSubset::Fingertips,
            ..Self::node_pair()
        }
    }

    /// Tracks all 21 nodes, logged one row per node.
    pub fn all_nodes() -> Self {
        Self {
            nodes: NodeSubset::All,
            ..Self::node_pair()
        }
    }

    /// The sink schema matching this configuration's node subset.
    pub fn schema(&self) -> Schema {
        match &self.nodes {
            NodeSubset::Pair(a, b) => Schema::NodePair {
                first: *a,
                second: *b,
            },
            NodeSubset::Fingertips => Schema::FingerName,
            NodeSubset::All | NodeSubset::Nodes(_) => Schema::NodeNumber,
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self::node_pair()
    }
}

/// Counters describing a finished acquisition run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackStats {
    /// Number of frames read from the source (= completed iterations).
    pub frames: u64,
    /// Number of frames with a non-empty detection result.
    pub detections: u64,
    /// Number of rows appended to the sink.
    pub rows: u64,
    /// Whether the run ended due to user cancellation rather than
    /// end-of-stream.
    pub cancelled: bool,
}

/// Drives the acquisition loop over a frame source and a detector.
///
/// Outputs are optional: attach a sink, a preview surface and/or a trajectory
/// plot before calling [`Tracker::run`]. Without a surface there is no event
/// pump, so the run can only end at end-of-stream.
pub struct Tracker<S, D> {
    source: S,
    detector: D,
    config: TrackConfig,
    sink: Option<Box<dyn TrackSink>>,
    surface: Option<Box<dyn Surface>>,
    plot: Option<Box<dyn TrajectoryPlot>>,
}

impl<S: FrameSource, D: HandDetector> Tracker<S, D> {
    pub fn new(source: S, detector: D, config: TrackConfig) -> Self {
        Self {
            source,
            detector,
            config,
            sink: None,
            surface: None,
            plot: None,
        }
    }

    /// Attaches the tabular output sink.
    pub fn with_sink(mut self, sink: impl TrackSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Attaches the preview surface (and with it, the cancellation source).
    pub fn with_surface(mut self, surface: impl Surface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Attaches the 3D trajectory plot.
    ///
    /// The plot shows the first node of the tracked subset and is only
    /// redrawn while trajectory tracking is enabled in the configuration.
    pub fn with_plot(mut self, plot: impl TrajectoryPlot + 'static) -> Self {
        self.plot = Some(Box::new(plot));
        self
    }

    /// Runs the loop to completion.
    ///
    /// The loop ends normally at end-of-stream or on cancellation; any source
    /// or sink error aborts it. On every exit path the frame source is
    /// released first and the sink closed second.
    pub fn run(self) -> anyhow::Result<TrackStats> {
        let Tracker {
            mut source,
            mut detector,
            config,
            mut sink,
            mut surface,
            mut plot,
        } = self;

        log::debug!("starting acquisition loop: {config:?}");

        let subset = config.nodes.indices();
        let mut trajectory: Option<Trajectory<Box<[Landmark]>>> =
            config.trajectory.map(Trajectory::new);
        let mut fps = FpsCounter::new("acquisition");
        let mut stats = TrackStats::default();

        loop {
            let Some(mut frame) = source.next_frame()? else {
                log::debug!("frame source exhausted after {} frames", stats.frames);
                break;
            };

            if config.mirror {
                frame.flip_horizontal_in_place();
            }
            frame.convert(detector.input_order());

            if let Some(landmarks) = detector.detect(&frame) {
                stats.detections += 1;

                let selection = subset
                    .iter()
                    .map(|&idx| (idx, landmarks.get(idx as usize)))
                    .collect::<Vec<(LandmarkIdx, Landmark)>>();

                for (idx, lm) in &selection {
                    log::trace!("{:?}: x={} y={} z={}", idx, lm.x(), lm.y(), lm.z());
                }

                if config.annotate {
                    landmarks.draw(&mut frame);
                }

                if let Some(sink) = sink.as_deref_mut() {
                    stats.rows += sink.append(stats.frames, &selection)? as u64;
                }

                if let Some(trajectory) = &mut trajectory {
                    trajectory.push(selection.iter().map(|(_, lm)| *lm).collect());

                    if let Some(plot) = plot.as_deref_mut() {
                        let points = trajectory
                            .iter()
                            .filter_map(|entry| entry.first())
                            .map(|lm| lm.position())
                            .collect::<Vec<_>>();
                        plot.redraw(&points)?;
                    }
                }
            }

            if let Some(surface) = surface.as_deref_mut() {
                surface.show(&frame)?;
            }

            stats.frames += 1;
            fps.tick();

            if let Some(surface) = surface.as_deref_mut() {
                if surface.poll_cancel() {
                    log::debug!("cancellation requested after {} frames", stats.frames);
                    stats.cancelled = true;
                    break;
                }
            }
        }

        // Source before sink, on every exit path.
        drop(source);
        if let Some(mut sink) = sink {
            sink.finish()?;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_indices() {
        assert_eq!(
            NodeSubset::Pair(LandmarkIdx::ThumbTip, LandmarkIdx::IndexFingerTip).indices(),
            [LandmarkIdx::ThumbTip, LandmarkIdx::IndexFingerTip]
        );
        assert_eq!(NodeSubset::Fingertips.indices().len(), 5);
        assert_eq!(NodeSubset::All.indices().len(), 21);
        assert_eq!(
            NodeSubset::Nodes(vec![LandmarkIdx::Wrist]).indices(),
            [LandmarkIdx::Wrist]
        );
    }

    #[test]
    fn presets_pick_matching_schemas() {
        assert_eq!(
            TrackConfig::node_pair().schema(),
            Schema::NodePair {
                first: LandmarkIdx::ThumbTip,
                second: LandmarkIdx::IndexFingerTip,
            }
        );
        assert_eq!(TrackConfig::fingertips().schema(), Schema::FingerName);
        assert_eq!(TrackConfig::all_nodes().schema(), Schema::NodeNumber);
    }
}
