//! Frame sequences and animated SVG output for solution traces.
//!
//! Every frame draws one snapshot as a polyline over the grid positions with
//! the title `"1D Heat Equation Evolution — t = {time:.3}"`. All frames share
//! the same axis limits: x spans the positions and y spans the finite range of
//! the whole trace.

use std::fmt::Write as _;

use simulon_core::Trace;
use thiserror::Error;
use tracing::debug;

/// Settings for rendering a trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    fps: u32,
    max_frames: usize,
    width: u32,
    height: u32,
}

/// Errors that can occur when rendering a trace.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error("fps must be at least 1")]
    Fps,

    #[error("max_frames must be at least 1")]
    MaxFrames,

    #[error("image must be at least {min}x{min} pixels")]
    Size { min: u32 },

    #[error("trace has no snapshots")]
    EmptyTrace,

    #[error("expected {expected} positions to match the trace, got {found}")]
    PositionMismatch { expected: usize, found: usize },
}

impl RenderConfig {
    const MIN_SIZE: u32 = 100;

    /// Creates a validated render configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if `fps` or `max_frames` is zero, or either
    /// image dimension is below 100 pixels.
    pub fn new(fps: u32, max_frames: usize, width: u32, height: u32) -> Result<Self, RenderError> {
        if fps == 0 {
            return Err(RenderError::Fps);
        }
        if max_frames == 0 {
            return Err(RenderError::MaxFrames);
        }
        if width < Self::MIN_SIZE || height < Self::MIN_SIZE {
            return Err(RenderError::Size {
                min: Self::MIN_SIZE,
            });
        }
        Ok(Self {
            fps,
            max_frames,
            width,
            height,
        })
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[must_use]
    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 20,
            max_frames: 200,
            width: 640,
            height: 400,
        }
    }
}

/// One animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub time: f64,
    pub title: String,
    /// `[position, value]` pairs; non-finite values are dropped.
    pub points: Vec<[f64; 2]>,
}

/// Axis limits shared by every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// The frame title for a snapshot at `time`.
#[must_use]
pub fn title(time: f64) -> String {
    format!("1D Heat Equation Evolution — t = {time:.3}")
}

/// Axis limits for `trace` drawn over `positions`.
///
/// A flat trace is padded by 0.5 on each side so it stays visible. A trace with
/// no finite values gets `(-1, 1)`.
#[must_use]
pub fn limits(trace: &Trace, positions: &[f64]) -> Limits {
    let x = match (positions.first(), positions.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => (0.0, 1.0),
    };
    let y = match trace.value_range() {
        Some((lo, hi)) if lo < hi => (lo, hi),
        Some((lo, hi)) => (lo - 0.5, hi + 0.5),
        None => (-1.0, 1.0),
    };
    Limits { x, y }
}

/// Builds the frame sequence for `trace`, keeping at most `max_frames`
/// evenly spaced snapshots (always including the first and last).
///
/// # Errors
///
/// Returns [`RenderError::EmptyTrace`] or [`RenderError::PositionMismatch`].
pub fn frames(
    trace: &Trace,
    positions: &[f64],
    config: &RenderConfig,
) -> Result<Vec<Frame>, RenderError> {
    check(trace, positions)?;

    let snapshots = trace.snapshots();
    let frames: Vec<Frame> = frame_indices(snapshots.len(), config.max_frames)
        .map(|i| {
            let snapshot = &snapshots[i];
            Frame {
                time: snapshot.time,
                title: title(snapshot.time),
                points: positions
                    .iter()
                    .zip(snapshot.field.iter())
                    .filter(|(_, u)| u.is_finite())
                    .map(|(&x, &u)| [x, u])
                    .collect(),
            }
        })
        .collect();

    if frames.len() < snapshots.len() {
        debug!(
            snapshots = snapshots.len(),
            frames = frames.len(),
            "downsampled trace for rendering"
        );
    }
    Ok(frames)
}

/// Renders `trace` as a self-contained animated SVG document.
///
/// Each frame is a group shown for `1 / fps` seconds in turn; the animation
/// loops. Viewers without animation support show the first frame.
///
/// # Errors
///
/// Returns [`RenderError::EmptyTrace`] or [`RenderError::PositionMismatch`].
pub fn render_svg(
    trace: &Trace,
    positions: &[f64],
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let frames = frames(trace, positions, config)?;
    let limits = limits(trace, positions);
    let canvas = Canvas::new(config, limits);

    let mut svg = String::new();
    canvas.write_axes(&mut svg);

    let count = frames.len();
    #[allow(clippy::cast_precision_loss)]
    let duration = count as f64 / f64::from(config.fps);

    for (k, frame) in frames.iter().enumerate() {
        let display = if k == 0 { "inline" } else { "none" };
        let _ = writeln!(svg, r#"<g display="{display}">"#);
        if count > 1 {
            let _ = writeln!(
                svg,
                r#"<animate attributeName="display" {} dur="{duration}s" calcMode="discrete" repeatCount="indefinite"/>"#,
                key_frames(k, count)
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="28" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
            canvas.width / 2.0,
            frame.title
        );
        let _ = writeln!(
            svg,
            r##"<polyline fill="none" stroke="#d62728" stroke-width="2" points="{}"/>"##,
            canvas.points(&frame.points)
        );
        svg.push_str("</g>\n");
    }

    Ok(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n{svg}</svg>\n",
        w = config.width,
        h = config.height,
    ))
}

fn check(trace: &Trace, positions: &[f64]) -> Result<(), RenderError> {
    if trace.is_empty() {
        return Err(RenderError::EmptyTrace);
    }
    if trace.point_count() != positions.len() {
        return Err(RenderError::PositionMismatch {
            expected: trace.point_count(),
            found: positions.len(),
        });
    }
    Ok(())
}

/// Evenly spaced indices into `0..len`, at most `max` of them.
fn frame_indices(len: usize, max: usize) -> impl Iterator<Item = usize> {
    let count = len.min(max);
    (0..count).map(move |k| {
        if count == 1 {
            0
        } else {
            k * (len - 1) / (count - 1)
        }
    })
}

/// `values`/`keyTimes` showing frame `k` of `count` during its own slot.
fn key_frames(k: usize, count: usize) -> String {
    #[allow(clippy::cast_precision_loss)]
    let at = |i: usize| i as f64 / count as f64;
    if k == 0 {
        format!(r#"values="inline;none" keyTimes="0;{}""#, at(1))
    } else {
        format!(
            r#"values="none;inline;none" keyTimes="0;{};{}""#,
            at(k),
            at(k + 1)
        )
    }
}

/// Maps data coordinates into the plot area.
struct Canvas {
    width: f64,
    height: f64,
    limits: Limits,
}

impl Canvas {
    const LEFT: f64 = 64.0;
    const RIGHT: f64 = 24.0;
    const TOP: f64 = 48.0;
    const BOTTOM: f64 = 44.0;

    fn new(config: &RenderConfig, limits: Limits) -> Self {
        Self {
            width: f64::from(config.width),
            height: f64::from(config.height),
            limits,
        }
    }

    fn px(&self, x: f64) -> f64 {
        let (lo, hi) = self.limits.x;
        let span = self.width - Self::LEFT - Self::RIGHT;
        Self::LEFT + (x - lo) / (hi - lo) * span
    }

    fn py(&self, y: f64) -> f64 {
        let (lo, hi) = self.limits.y;
        let span = self.height - Self::TOP - Self::BOTTOM;
        Self::TOP + (1.0 - (y - lo) / (hi - lo)) * span
    }

    fn points(&self, points: &[[f64; 2]]) -> String {
        let mut out = String::with_capacity(points.len() * 16);
        for (i, &[x, y]) in points.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{:.2},{:.2}", self.px(x), self.py(y));
        }
        out
    }

    fn write_axes(&self, svg: &mut String) {
        let (x0, x1) = (Self::LEFT, self.width - Self::RIGHT);
        let (y0, y1) = (Self::TOP, self.height - Self::BOTTOM);
        let _ = writeln!(
            svg,
            r#"<rect x="{x0}" y="{y0}" width="{}" height="{}" fill="none" stroke="black"/>"#,
            x1 - x0,
            y1 - y0
        );

        let label = r#"font-family="sans-serif" font-size="12""#;
        let (xlo, xhi) = self.limits.x;
        let (ylo, yhi) = self.limits.y;
        let _ = writeln!(
            svg,
            r#"<text x="{x0}" y="{}" text-anchor="middle" {label}>{xlo:.3}</text>"#,
            y1 + 16.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x1}" y="{}" text-anchor="middle" {label}>{xhi:.3}</text>"#,
            y1 + 16.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" {label}>x</text>"#,
            (x0 + x1) / 2.0,
            y1 + 32.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{y1}" text-anchor="end" {label}>{ylo:.3}</text>"#,
            x0 - 6.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" {label}>{yhi:.3}</text>"#,
            x0 - 6.0,
            y0 + 12.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{}" text-anchor="middle" transform="rotate(-90 16 {})" {label}>u(x, t)</text>"#,
            (y0 + y1) / 2.0,
            (y0 + y1) / 2.0
        );
    }
}
