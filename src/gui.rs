//! Display and plot surfaces.
//!
//! Window management and 3D rendering are externally supplied capabilities;
//! this module only defines the interfaces the acquisition loop drives, plus
//! a null surface for headless operation.

use std::ops::RangeInclusive;

use crate::image::Frame;

/// Capability trait for the on-screen preview surface.
///
/// One surface corresponds to one named window whose event pump also delivers
/// the quit key.
pub trait Surface {
    /// Presents `frame` on the surface.
    fn show(&mut self, frame: &Frame) -> anyhow::Result<()>;

    /// Polls the surface's event pump for a pending cancellation (quit key).
    ///
    /// Called once per loop iteration; a pending cancellation only takes
    /// effect at this point, never mid-iteration.
    fn poll_cancel(&mut self) -> bool;
}

/// A [`Surface`] that discards frames and never cancels.
///
/// Used when running without a display, e.g. for batch logging of recorded
/// sequences.
pub struct Headless;

impl Surface for Headless {
    fn show(&mut self, _frame: &Frame) -> anyhow::Result<()> {
        Ok(())
    }

    fn poll_cancel(&mut self) -> bool {
        false
    }
}

/// Axis range of trajectory plots, identical for all three dimensions.
pub const PLOT_AXIS_RANGE: RangeInclusive<f32> = -1.0..=1.0;

/// Capability trait for a live 3D trajectory plot.
///
/// The plot is redrawn from scratch on every frame with a detection, from the
/// full retained trajectory of one landmark. Axes are fixed to
/// [`PLOT_AXIS_RANGE`] on all three dimensions.
pub trait TrajectoryPlot {
    /// Replaces the plotted line with `points`, oldest first.
    fn redraw(&mut self, points: &[[f32; 3]]) -> anyhow::Result<()>;
}
