//! Runs the fingertip-logging variant over a synthetic clip and keeps a
//! bounded trajectory of the thumb tip.

use handtrace::{
    detector::SyntheticHand,
    image::{Frame, Resolution},
    sink::CsvSink,
    tracking::{TrackConfig, Tracker},
    video::FrameSequence,
};

const CLIP_LEN: usize = 120;

fn main() -> anyhow::Result<()> {
    handtrace::init_logger!();

    let mut config = TrackConfig::fingertips();
    config.trajectory = Some(TrackConfig::DEFAULT_TRAJECTORY_CAPACITY);

    let frames = (0..CLIP_LEN).map(|_| Frame::new(config.resolution));
    let source = FrameSequence::new(frames);
    let detector = SyntheticHand::new(config.detector);
    let sink = CsvSink::create("hand_coordinates.csv", config.schema())?;

    let stats = Tracker::new(source, detector, config)
        .with_sink(sink)
        .run()?;

    log::info!(
        "{} frames, {} detections, {} rows logged",
        stats.frames,
        stats.detections,
        stats.rows,
    );
    Ok(())
}
