#![forbid(unsafe_code)]

//! SVG export for a [`Scene`].
//!
//! Every primitive maps to one or two elements in paint order. Halos are
//! emitted as a separate background-colored element underneath the shape.
//! Labels and messages are escaped here and nowhere else.
//!
//! ```
//! use gitline_core::{Color, Size};
//! use gitline_render::{Scene, SvgExporter};
//!
//! let scene = Scene::new(Size::new(40.0, 20.0), Color::WHITE, "serif");
//! let svg = SvgExporter::default().export(&scene);
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.ends_with("</svg>"));
//! ```

use std::fmt::{self, Write};

use gitline_core::{Color, Point};

use crate::primitive::{DASH_PATTERN, PathSegment, Primitive, Scene, TextAlign};

/// Configuration for SVG export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgExporter {
    /// Put every element on its own line.
    pub line_breaks: bool,
    /// Round coordinates and widths to this many decimals.
    pub precision: u8,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            line_breaks: true,
            precision: 3,
        }
    }
}

impl SvgExporter {
    /// Single-line output.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            line_breaks: false,
            ..Self::default()
        }
    }

    /// Export a scene to an SVG document.
    #[must_use]
    pub fn export(&self, scene: &Scene) -> String {
        let mut out = String::with_capacity(256 + scene.primitives.len() * 128);
        // Writing into a String cannot fail.
        let _ = self.write_to(scene, &mut out);
        out
    }

    /// Stream the document into any [`fmt::Write`] sink.
    ///
    /// # Errors
    ///
    /// Propagates errors from the sink.
    pub fn write_to<W: Write>(&self, scene: &Scene, out: &mut W) -> fmt::Result {
        let w = self.num(scene.size.width);
        let h = self.num(scene.size.height);
        write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\""
        )?;
        svg_escape_into(out, &scene.font_family)?;
        out.write_str("\">")?;
        self.newline(out)?;

        write!(
            out,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            scene.background
        )?;
        self.newline(out)?;

        for primitive in &scene.primitives {
            self.write_primitive(scene.background, primitive, out)?;
        }

        out.write_str("</svg>")
    }

    fn write_primitive<W: Write>(
        &self,
        background: Color,
        primitive: &Primitive,
        out: &mut W,
    ) -> fmt::Result {
        match primitive {
            Primitive::Legend {
                label,
                bounds,
                corner_radius,
                color,
                text_anchor,
                font_size,
            } => {
                write!(
                    out,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{color}\"/>",
                    self.num(bounds.x),
                    self.num(bounds.y),
                    self.num(bounds.width),
                    self.num(bounds.height),
                    self.num(*corner_radius),
                )?;
                self.newline(out)?;
                self.write_text(
                    out,
                    *text_anchor,
                    label,
                    Color::WHITE,
                    TextAlign::Right,
                    *font_size,
                    true,
                    true,
                )?;
            }
            Primitive::Line {
                from,
                to,
                color,
                width,
            } => {
                write!(
                    out,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{color}\" stroke-width=\"{}\"/>",
                    self.num(from.x),
                    self.num(from.y),
                    self.num(to.x),
                    self.num(to.y),
                    self.num(*width),
                )?;
            }
            Primitive::Curve {
                path,
                color,
                width,
                dashed,
            } => {
                out.write_str("<path d=\"")?;
                self.write_path(out, path)?;
                write!(
                    out,
                    "\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{}\"",
                    self.num(*width)
                )?;
                if *dashed {
                    write!(
                        out,
                        " stroke-dasharray=\"{} {}\"",
                        self.num(DASH_PATTERN[0]),
                        self.num(DASH_PATTERN[1])
                    )?;
                }
                out.write_str("/>")?;
            }
            Primitive::CommitMarker {
                center,
                radius,
                color,
                halo,
            } => {
                write!(
                    out,
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{color}\" stroke=\"{background}\" stroke-width=\"{}\"/>",
                    self.num(center.x),
                    self.num(center.y),
                    self.num(*radius),
                    self.num(*halo),
                )?;
            }
            Primitive::Ripple {
                points,
                color,
                width,
                halo,
            } => {
                for (stroke, stroke_width) in [(background, *halo), (*color, *width)] {
                    out.write_str("<polyline points=\"")?;
                    for (i, point) in points.iter().enumerate() {
                        if i > 0 {
                            out.write_char(' ')?;
                        }
                        write!(out, "{},{}", self.num(point.x), self.num(point.y))?;
                    }
                    write!(
                        out,
                        "\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{}\"/>",
                        self.num(stroke_width)
                    )?;
                }
            }
            Primitive::Cross {
                center,
                half_size,
                color,
                width,
                halo,
            } => {
                let (x, y, r) = (center.x, center.y, *half_size);
                for (stroke, stroke_width) in [(background, *halo), (*color, *width)] {
                    write!(
                        out,
                        "<path d=\"M{} {}L{} {}M{} {}L{} {}\" stroke=\"{stroke}\" stroke-width=\"{}\"/>",
                        self.num(x - r),
                        self.num(y - r),
                        self.num(x + r),
                        self.num(y + r),
                        self.num(x + r),
                        self.num(y - r),
                        self.num(x - r),
                        self.num(y + r),
                        self.num(stroke_width),
                    )?;
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
                self.write_text(out, *anchor, text, *color, *align, *font_size, *bold, false)?;
            }
        }
        self.newline(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn write_text<W: Write>(
        &self,
        out: &mut W,
        anchor: Point,
        text: &str,
        color: Color,
        align: TextAlign,
        font_size: f64,
        bold: bool,
        centered: bool,
    ) -> fmt::Result {
        write!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{color}\"",
            self.num(anchor.x),
            self.num(anchor.y),
            self.num(font_size),
        )?;
        if align == TextAlign::Right {
            out.write_str(" text-anchor=\"end\"")?;
        }
        if centered {
            out.write_str(" dominant-baseline=\"middle\"")?;
        }
        if bold {
            out.write_str(" font-weight=\"bold\"")?;
        }
        out.write_char('>')?;
        svg_escape_into(out, text)?;
        out.write_str("</text>")
    }

    fn write_path<W: Write>(&self, out: &mut W, path: &[PathSegment]) -> fmt::Result {
        for segment in path {
            match segment {
                PathSegment::MoveTo { to } => {
                    write!(out, "M{} {}", self.num(to.x), self.num(to.y))?;
                }
                PathSegment::LineTo { to } => {
                    write!(out, "L{} {}", self.num(to.x), self.num(to.y))?;
                }
                PathSegment::QuadTo { ctrl, to } => write!(
                    out,
                    "Q{} {} {} {}",
                    self.num(ctrl.x),
                    self.num(ctrl.y),
                    self.num(to.x),
                    self.num(to.y)
                )?,
            }
        }
        Ok(())
    }

    fn newline<W: Write>(&self, out: &mut W) -> fmt::Result {
        if self.line_breaks {
            out.write_char('\n')?;
        }
        Ok(())
    }

    fn num(&self, value: f64) -> Num {
        Num {
            value,
            precision: self.precision,
        }
    }
}

/// Shortest decimal form of a value rounded to `precision` places.
#[derive(Debug, Clone, Copy)]
struct Num {
    value: f64,
    precision: u8,
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10_f64.powi(i32::from(self.precision));
        let rounded = (self.value * scale).round() / scale;
        if rounded == 0.0 || !rounded.is_finite() {
            // Also folds -0 into 0.
            return f.write_str("0");
        }
        write!(f, "{rounded}")
    }
}

/// SVG-escape a string into the output, safe inside text and attributes.
fn svg_escape_into<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '&' => out.write_str("&amp;")?,
            '"' => out.write_str("&quot;")?,
            _ => out.write_char(c)?,
        }
    }
    Ok(())
}
