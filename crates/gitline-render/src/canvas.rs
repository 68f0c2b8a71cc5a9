#![forbid(unsafe_code)]

//! Replay a [`Scene`] onto an immediate-mode 2D canvas.
//!
//! [`Canvas`] mirrors the subset of the HTML canvas API the diagrams need,
//! so a host with a real canvas (a browser binding, a raster backend) only
//! implements the trait. [`RecordingCanvas`] captures the call sequence for
//! tests and for the `commands` output format.

use std::f64::consts::TAU;

use gitline_core::{Color, Point, Rect};
use gitline_layout::Font;
use serde::Serialize;

use crate::primitive::{DASH_PATTERN, PathSegment, Primitive, Scene, TextAlign, rounded_rect};

/// Immediate-mode drawing surface.
pub trait Canvas {
    fn set_fill_style(&mut self, color: Color);
    fn set_stroke_style(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    /// An empty slice means solid.
    fn set_line_dash(&mut self, pattern: &[f64]);
    fn set_font(&mut self, font: &Font);
    fn set_text_align(&mut self, align: TextAlign);
    fn fill_rect(&mut self, rect: Rect);
    fn begin_path(&mut self);
    fn move_to(&mut self, to: Point);
    fn line_to(&mut self, to: Point);
    fn quadratic_curve_to(&mut self, ctrl: Point, to: Point);
    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_text(&mut self, text: &str, at: Point);
}

/// Paint `scene` in order, background first.
pub fn paint<C: Canvas + ?Sized>(scene: &Scene, canvas: &mut C) {
    canvas.set_fill_style(scene.background);
    canvas.fill_rect(Rect::from_size(scene.size));

    for primitive in &scene.primitives {
        paint_primitive(scene, primitive, canvas);
    }
}

fn paint_primitive<C: Canvas + ?Sized>(scene: &Scene, primitive: &Primitive, canvas: &mut C) {
    match primitive {
        Primitive::Legend {
            label,
            bounds,
            corner_radius,
            color,
            text_anchor,
            font_size,
        } => {
            canvas.set_fill_style(*color);
            canvas.begin_path();
            trace_path(canvas, &rounded_rect(*bounds, *corner_radius));
            canvas.fill();

            canvas.set_fill_style(Color::WHITE);
            canvas.set_font(&Font::new(*font_size, scene.font_family.clone()).bold());
            canvas.set_text_align(TextAlign::Right);
            canvas.fill_text(label, *text_anchor);
        }
        Primitive::Line {
            from,
            to,
            color,
            width,
        } => {
            canvas.set_stroke_style(*color);
            canvas.set_line_width(*width);
            canvas.set_line_dash(&[]);
            canvas.begin_path();
            canvas.move_to(*from);
            canvas.line_to(*to);
            canvas.stroke();
        }
        Primitive::Curve {
            path,
            color,
            width,
            dashed,
        } => {
            canvas.set_stroke_style(*color);
            canvas.set_line_width(*width);
            let dash: &[f64] = if *dashed { &DASH_PATTERN } else { &[] };
            canvas.set_line_dash(dash);
            canvas.begin_path();
            trace_path(canvas, path);
            canvas.stroke();
            canvas.set_line_dash(&[]);
        }
        Primitive::CommitMarker {
            center,
            radius,
            color,
            halo,
        } => {
            canvas.begin_path();
            canvas.arc(*center, *radius, 0.0, TAU);
            canvas.set_fill_style(*color);
            canvas.fill();
            canvas.set_stroke_style(scene.background);
            canvas.set_line_width(*halo);
            canvas.stroke();
        }
        Primitive::Ripple {
            points,
            color,
            width,
            halo,
        } => {
            for (stroke, stroke_width) in [(scene.background, *halo), (*color, *width)] {
                canvas.set_stroke_style(stroke);
                canvas.set_line_width(stroke_width);
                canvas.begin_path();
                for (i, point) in points.iter().enumerate() {
                    if i == 0 {
                        canvas.move_to(*point);
                    } else {
                        canvas.line_to(*point);
                    }
                }
                canvas.stroke();
            }
        }
        Primitive::Cross {
            center,
            half_size,
            color,
            width,
            halo,
        } => {
            let r = *half_size;
            for (stroke, stroke_width) in [(scene.background, *halo), (*color, *width)] {
                canvas.set_stroke_style(stroke);
                canvas.set_line_width(stroke_width);
                canvas.begin_path();
                canvas.move_to(center.offset(-r, -r));
                canvas.line_to(center.offset(r, r));
                canvas.move_to(center.offset(r, -r));
                canvas.line_to(center.offset(-r, r));
                canvas.stroke();
            }
        }
        Primitive::Text {
            anchor,
            text,
            color,
            align,
            font_size,
            bold,
        } => {
            let mut font = Font::new(*font_size, scene.font_family.clone());
            font.bold = *bold;
            canvas.set_font(&font);
            canvas.set_fill_style(*color);
            canvas.set_text_align(*align);
            canvas.fill_text(text, *anchor);
        }
    }
}

fn trace_path<C: Canvas + ?Sized>(canvas: &mut C, path: &[PathSegment]) {
    for segment in path {
        match *segment {
            PathSegment::MoveTo { to } => canvas.move_to(to),
            PathSegment::LineTo { to } => canvas.line_to(to),
            PathSegment::QuadTo { ctrl, to } => canvas.quadratic_curve_to(ctrl, to),
        }
    }
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum DrawCommand {
    SetFillStyle { color: Color },
    SetStrokeStyle { color: Color },
    SetLineWidth { width: f64 },
    SetLineDash { pattern: Vec<f64> },
    /// CSS font shorthand.
    SetFont { font: String },
    SetTextAlign { align: TextAlign },
    FillRect { rect: Rect },
    BeginPath,
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadraticCurveTo { ctrl: Point, to: Point },
    Arc { center: Point, radius: f64, start: f64, end: f64 },
    Stroke,
    Fill,
    FillText { text: String, at: Point },
}

/// A [`Canvas`] that records every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `scene` from scratch.
    #[must_use]
    pub fn record(scene: &Scene) -> Self {
        let mut canvas = Self::new();
        paint(scene, &mut canvas);
        canvas
    }

    /// Number of `stroke` calls, the closest thing a canvas has to a shape count.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Stroke))
            .count()
    }

    /// Pretty-printed JSON dump of the command list.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.commands)
    }

    #[inline]
    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Canvas for RecordingCanvas {
    fn set_fill_style(&mut self, color: Color) {
        self.push(DrawCommand::SetFillStyle { color });
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.push(DrawCommand::SetStrokeStyle { color });
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawCommand::SetLineWidth { width });
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.push(DrawCommand::SetLineDash {
            pattern: pattern.to_vec(),
        });
    }

    fn set_font(&mut self, font: &Font) {
        self.push(DrawCommand::SetFont {
            font: font.to_string(),
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawCommand::SetTextAlign { align });
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.push(DrawCommand::FillRect { rect });
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, to: Point) {
        self.push(DrawCommand::MoveTo { to });
    }

    fn line_to(&mut self, to: Point) {
        self.push(DrawCommand::LineTo { to });
    }

    fn quadratic_curve_to(&mut self, ctrl: Point, to: Point) {
        self.push(DrawCommand::QuadraticCurveTo { ctrl, to });
    }

    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.push(DrawCommand::Arc {
            center,
            radius,
            start,
            end,
        });
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn fill_text(&mut self, text: &str, at: Point) {
        self.push(DrawCommand::FillText {
            text: text.to_owned(),
            at,
        });
    }
}
