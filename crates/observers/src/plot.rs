//! Interactive egui views of traces and training losses.

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use simulon_core::Trace;

use crate::{
    render::{self, Limits},
    training::LossHistory,
};

/// An interactive window that steps through the snapshots of a trace.
///
/// The frame slider selects a snapshot; Play advances through them at `fps`.
/// Axis limits are fixed to the whole trace so frames are comparable.
///
/// # Example
///
/// ```ignore
/// let trace = stepper.solve(NonZeroUsize::MIN)?;
/// TraceViewer::new(trace, stepper.positions()).fps(30).show()?;
/// ```
pub struct TraceViewer {
    trace: Trace,
    positions: Vec<f64>,
    fps: f32,
}

impl TraceViewer {
    #[must_use]
    pub fn new(trace: Trace, positions: &[f64]) -> Self {
        Self {
            trace,
            positions: positions.to_vec(),
            fps: 20.0,
        }
    }

    /// Sets the playback rate in frames per second.
    #[must_use]
    pub fn fps(mut self, fps: u16) -> Self {
        self.fps = f32::from(fps.max(1));
        self
    }

    /// Opens a blocking egui window.
    ///
    /// Blocks until the window is closed by the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(self) -> Result<(), eframe::Error> {
        let limits = render::limits(&self.trace, &self.positions);
        let app = TraceApp {
            limits,
            trace: self.trace,
            positions: self.positions,
            fps: self.fps,
            frame: 0,
            playing: false,
            elapsed: 0.0,
        };

        eframe::run_native(
            "1D Heat Equation Evolution",
            eframe::NativeOptions::default(),
            Box::new(move |_cc| Ok(Box::new(app))),
        )
    }
}

struct TraceApp {
    trace: Trace,
    positions: Vec<f64>,
    limits: Limits,
    fps: f32,
    frame: usize,
    playing: bool,
    elapsed: f32,
}

impl TraceApp {
    fn tick(&mut self, dt: f32) {
        let last = self.trace.len().saturating_sub(1);
        self.elapsed += dt;
        while self.elapsed >= 1.0 / self.fps {
            self.elapsed -= 1.0 / self.fps;
            self.frame = if self.frame >= last { 0 } else { self.frame + 1 };
        }
    }
}

impl eframe::App for TraceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.playing {
            let dt = ctx.input(|i| i.stable_dt);
            self.tick(dt);
            ctx.request_repaint();
        }

        let last = self.trace.len().saturating_sub(1);
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if self.playing { "Pause" } else { "Play" };
                if ui.button(label).clicked() {
                    self.playing = !self.playing;
                    self.elapsed = 0.0;
                }
                ui.add(egui::Slider::new(&mut self.frame, 0..=last).text("frame"));
            });
        });

        let Some(snapshot) = self.trace.snapshots().get(self.frame) else {
            return;
        };
        let points: PlotPoints = self
            .positions
            .iter()
            .zip(snapshot.field.iter())
            .filter(|(_, u)| u.is_finite())
            .map(|(&x, &u)| [x, u])
            .collect();
        let title = render::title(snapshot.time);
        let Limits { x, y } = self.limits;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(title);
            Plot::new("trace_viewer")
                .include_x(x.0)
                .include_x(x.1)
                .include_y(y.0)
                .include_y(y.1)
                .x_axis_label("x")
                .y_axis_label("u(x, t)")
                .show(ui, |plot_ui| plot_ui.line(Line::new(points)));
        });
    }
}

impl LossHistory {
    /// Opens a blocking egui window plotting log₁₀ of the recorded losses.
    ///
    /// Non-positive losses are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(&self) -> Result<(), eframe::Error> {
        #[allow(clippy::cast_precision_loss)]
        let points: Vec<[f64; 2]> = self
            .points
            .iter()
            .filter(|(_, loss)| *loss > 0.0)
            .map(|&(epoch, loss)| [epoch as f64, loss.log10()])
            .collect();

        eframe::run_native(
            "Training loss",
            eframe::NativeOptions::default(),
            Box::new(move |_cc| Ok(Box::new(LossApp { points }))),
        )
    }
}

struct LossApp {
    points: Vec<[f64; 2]>,
}

impl eframe::App for LossApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("loss_history")
                .x_axis_label("epoch")
                .y_axis_label("log₁₀ loss")
                .show(ui, |plot_ui| {
                    let points: PlotPoints = self.points.iter().copied().collect();
                    plot_ui.line(Line::new(points).name("loss"));
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use simulon_core::Snapshot;

    fn app(len: usize) -> TraceApp {
        #[allow(clippy::cast_precision_loss)]
        let trace: Trace = (0..len)
            .map(|k| Snapshot::new(k as f64, vec![0.0, 1.0].into()))
            .collect();
        let positions = vec![0.0, 1.0];
        TraceApp {
            limits: render::limits(&trace, &positions),
            trace,
            positions,
            fps: 10.0,
            frame: 0,
            playing: true,
            elapsed: 0.0,
        }
    }

    #[test]
    fn tick_advances_by_elapsed_frames() {
        let mut app = app(5);

        app.tick(0.25);

        assert_eq!(app.frame, 2);
    }

    #[test]
    fn tick_wraps_to_first_frame() {
        let mut app = app(3);
        app.frame = 2;

        app.tick(0.1);

        assert_eq!(app.frame, 0);
    }

    #[test]
    fn tick_waits_for_full_frame() {
        let mut app = app(3);

        app.tick(0.05);

        assert_eq!(app.frame, 0);
    }
}
