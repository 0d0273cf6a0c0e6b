//! Batch driver for recorded material: replays a directory of frame images
//! through the acquisition loop and writes a coordinate log.
//!
//! Detection uses the built-in deterministic stand-in detector, which makes
//! this binary suitable for exercising the pipeline end-to-end and for
//! regenerating golden logs.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use handtrace::detector::SyntheticHand;
use handtrace::sink::CsvSink;
use handtrace::tracking::{TrackConfig, Tracker};
use handtrace::video::replay::ReplaySource;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    /// Thumb tip + index fingertip, one wide row per frame.
    Pair,
    /// The five fingertips, one row per finger.
    Fingertips,
    /// All 21 nodes, one row per node.
    AllNodes,
}

#[derive(Debug, Parser)]
#[command(about = "Replays recorded frames and logs hand landmark coordinates")]
struct Args {
    /// Directory containing the recorded frame images (PNG or JPEG).
    frames: PathBuf,

    /// Which node subset to log.
    #[arg(long, value_enum, default_value = "pair")]
    variant: Variant,

    /// Path of the coordinate log to write.
    #[arg(long, default_value = "hand_coordinates.csv")]
    out: PathBuf,

    /// Keep the most recent N trajectory entries.
    #[arg(long, value_name = "N")]
    trajectory: Option<usize>,

    /// Skip the horizontal mirroring step.
    #[arg(long)]
    no_mirror: bool,
}

fn main() -> anyhow::Result<()> {
    handtrace::init_logger!();
    let args = Args::parse();

    let mut config = match args.variant {
        Variant::Pair => TrackConfig::node_pair(),
        Variant::Fingertips => TrackConfig::fingertips(),
        Variant::AllNodes => TrackConfig::all_nodes(),
    };
    config.mirror = !args.no_mirror;
    config.trajectory = args.trajectory;

    let source = ReplaySource::open(&args.frames)?.with_resolution(config.resolution);
    let detector = SyntheticHand::new(config.detector);
    let sink = CsvSink::create(&args.out, config.schema())?;

    let stats = Tracker::new(source, detector, config)
        .with_sink(sink)
        .run()?;

    log::info!(
        "processed {} frames ({} with detections), wrote {} rows to '{}'",
        stats.frames,
        stats.detections,
        stats.rows,
        args.out.display(),
    );
    Ok(())
}
