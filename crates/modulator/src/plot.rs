//! Step-plot renderer for modulated waveforms.
//!
//! Draws with embedded-graphics onto an [`RgbImage`] framebuffer, then
//! encodes the framebuffer as PNG. The signal is held between samples
//! (`where='post'` style) over dashed reference lines at each voltage level
//! and every bit boundary. The title names the modulation and each bit cell
//! is labelled with the bit it carries.

use std::convert::Infallible;
use std::io::Cursor;
use std::path::Path;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, Polyline, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};
use image::{ImageFormat, Rgb, RgbImage};
use linecode::{Signal, VoltageLevels};

/// Signal trace colour (`#2563EB`).
pub const SIGNAL_COLOR: Rgb888 = Rgb888::new(0x25, 0x63, 0xEB);

/// Grid and bit boundary colour (`#93C5FD`).
pub const GRID_COLOR: Rgb888 = Rgb888::new(0x93, 0xC5, 0xFD);

/// Title and label colour.
pub const TEXT_COLOR: Rgb888 = Rgb888::new(0x1F, 0x29, 0x37);

/// Background colour.
pub const BACKGROUND: Rgb888 = Rgb888::WHITE;

/// Headroom added above and below the level range.
pub const Y_PADDING: f64 = 0.2;

/// Rows above the plot area, holding the title.
pub const MARGIN_TOP: u32 = 40;

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_BOTTOM: u32 = 60;
const DASH: i32 = 6;
const TRACE_WIDTH: u32 = 2;
const TITLE_BASELINE: i32 = 28;
const BIT_LABEL_OFFSET: i32 = 24;

/// Plot failures.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Image too small to hold the plot area
    #[error("plot size {width}x{height} leaves no drawing area")]
    TooSmall {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    /// Writing the file failed
    #[error("could not write plot: {0}")]
    Io(#[from] std::io::Error),
}

/// Geometry and scaling of a plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotOptions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Seconds per bit, for boundary lines and bit labels
    pub bit_duration: f64,
    /// Right edge of the x axis in seconds
    pub total_duration: f64,
    /// Levels that bound the y axis
    pub levels: VoltageLevels,
}

impl PlotOptions {
    /// 1000x400 plot for a signal of `total_duration` seconds.
    pub fn new(bit_duration: f64, total_duration: f64, levels: VoltageLevels) -> Self {
        Self {
            width: 1000,
            height: 400,
            bit_duration,
            total_duration,
            levels,
        }
    }

    /// `(min, max)` of the y axis including padding.
    pub fn y_range(&self, samples: &[f64]) -> (f64, f64) {
        let low = samples
            .iter()
            .copied()
            .fold(self.levels.low_bipolar.min(self.levels.low_unipolar), f64::min);
        let high = samples.iter().copied().fold(self.levels.high, f64::max);
        (low - Y_PADDING, high + Y_PADDING)
    }

    /// Number of whole bits covered by `total_duration`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bit_count(&self) -> u32 {
        if self.bit_duration > 0.0 && self.total_duration > 0.0 {
            (self.total_duration / self.bit_duration).round() as u32
        } else {
            0
        }
    }
}

/// Image pixel for an embedded-graphics colour.
pub fn image_pixel(color: Rgb888) -> Rgb<u8> {
    Rgb([color.r(), color.g(), color.b()])
}

/// [`RgbImage`] as an embedded-graphics draw target. Off-image pixels are dropped.
struct Framebuffer {
    image: RgbImage,
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if let Some(pixel) = self.image.get_pixel_mut_checked(x, y) {
                *pixel = image_pixel(color);
            }
        }
        Ok(())
    }
}

/// Maps signal coordinates to pixels inside the plot area.
struct Axes {
    area: Rectangle,
    x_end: f64,
    y_span: (f64, f64),
}

#[allow(clippy::cast_possible_truncation)]
impl Axes {
    fn new(options: &PlotOptions, y_span: (f64, f64)) -> Result<Self, PlotError> {
        let too_small = || PlotError::TooSmall {
            width: options.width,
            height: options.height,
        };
        let width = options
            .width
            .checked_sub(MARGIN_LEFT + MARGIN_RIGHT)
            .filter(|w| *w > 1)
            .ok_or_else(too_small)?;
        let height = options
            .height
            .checked_sub(MARGIN_TOP + MARGIN_BOTTOM)
            .filter(|h| *h > 1)
            .ok_or_else(too_small)?;
        let left = i32::try_from(MARGIN_LEFT).map_err(|_| too_small())?;
        let top = i32::try_from(MARGIN_TOP).map_err(|_| too_small())?;
        Ok(Self {
            area: Rectangle::new(Point::new(left, top), Size::new(width, height)),
            x_end: if options.total_duration > 0.0 {
                options.total_duration
            } else {
                1.0
            },
            y_span,
        })
    }

    fn corners(&self) -> (Point, Point) {
        let bottom_right = self.area.bottom_right().unwrap_or(self.area.top_left);
        (self.area.top_left, bottom_right)
    }

    fn x(&self, t: f64) -> i32 {
        let (top_left, bottom_right) = self.corners();
        let frac = (t / self.x_end).clamp(0.0, 1.0);
        top_left.x + (frac * f64::from(bottom_right.x - top_left.x)).round() as i32
    }

    fn y(&self, v: f64) -> i32 {
        let (top_left, bottom_right) = self.corners();
        let (low, high) = self.y_span;
        let frac = ((v - low) / (high - low)).clamp(0.0, 1.0);
        bottom_right.y - (frac * f64::from(bottom_right.y - top_left.y)).round() as i32
    }
}

/// Axis-aligned dashed line from `start` to `end`.
fn dashed_line<D>(target: &mut D, start: Point, end: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let delta = end - start;
    let length = delta.x.abs().max(delta.y.abs());
    let step = Point::new(delta.x.signum(), delta.y.signum());
    let style = PrimitiveStyle::with_stroke(GRID_COLOR, 1);
    let mut offset = 0;
    while offset <= length {
        let dash_end = (offset + DASH - 1).min(length);
        Line::new(start + step * offset, start + step * dash_end)
            .into_styled(style)
            .draw(target)?;
        offset += 2 * DASH;
    }
    Ok(())
}

/// `"0"`/`"1"` for every bit cell, read from the middle of the cell in
/// the 0/1 reference signal. Cells the reference does not cover get `"?"`.
fn bit_labels(original: &Signal, bits: u32) -> Vec<&'static str> {
    let per_bit = usize::try_from(bits)
        .ok()
        .filter(|b| *b > 0)
        .map_or(0, |b| original.len() / b);
    (0..bits)
        .map(|i| {
            usize::try_from(i)
                .ok()
                .filter(|_| per_bit > 0)
                .and_then(|i| original.samples.get(i * per_bit + per_bit / 2))
                .map_or("?", |level| if *level > 0.5 { "1" } else { "0" })
        })
        .collect()
}

fn draw<D>(
    target: &mut D,
    axes: &Axes,
    signal: &Signal,
    labels: &[&str],
    title: &str,
    options: &PlotOptions,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    let (top_left, bottom_right) = axes.corners();
    let width = i32::try_from(target.size().width).unwrap_or(i32::MAX);
    let small = MonoTextStyle::new(&FONT_6X10, TEXT_COLOR);
    let large = MonoTextStyle::new(&FONT_10X20, TEXT_COLOR);

    target.clear(BACKGROUND)?;
    axes.area
        .into_styled(PrimitiveStyle::with_stroke(GRID_COLOR, 1))
        .draw(target)?;

    for level in [options.levels.high, options.levels.low_unipolar, options.levels.low_bipolar] {
        let y = axes.y(level);
        dashed_line(target, Point::new(top_left.x, y), Point::new(bottom_right.x, y))?;
        let tick = format!("{level:.1}");
        Text::with_alignment(&tick, Point::new(top_left.x - 6, y + 3), small, Alignment::Right)
            .draw(target)?;
    }

    for i in 0..=options.bit_count() {
        let x = axes.x(f64::from(i) * options.bit_duration);
        dashed_line(target, Point::new(x, top_left.y), Point::new(x, bottom_right.y))?;
    }
    for (i, label) in (0u32..).zip(labels) {
        let x = axes.x((f64::from(i) + 0.5) * options.bit_duration);
        Text::with_alignment(label, Point::new(x, bottom_right.y + BIT_LABEL_OFFSET), large, Alignment::Center)
            .draw(target)?;
    }

    let mut trace = Vec::with_capacity(signal.len().saturating_mul(2));
    let mut points = signal.points().peekable();
    while let Some((t, v)) = points.next() {
        let next_t = points.peek().map_or(options.total_duration, |(t, _)| *t);
        let y = axes.y(v);
        trace.push(Point::new(axes.x(t), y));
        trace.push(Point::new(axes.x(next_t), y));
    }
    if !trace.is_empty() {
        Polyline::new(&trace)
            .into_styled(PrimitiveStyle::with_stroke(SIGNAL_COLOR, TRACE_WIDTH))
            .draw(target)?;
    }

    Text::with_alignment(
        &format!("Modulation: {title}"),
        Point::new(width / 2, TITLE_BASELINE),
        large,
        Alignment::Center,
    )
    .draw(target)?;
    Text::with_alignment(
        "Time (s)",
        Point::new(width / 2, i32::try_from(options.height).unwrap_or(i32::MAX) - 8),
        small,
        Alignment::Center,
    )
    .draw(target)?;
    Ok(())
}

/// Render `signal` into an RGB image titled with `title`.
///
/// `original` is the 0/1 reference signal on the same grid; it supplies
/// the bit labels under each cell.
pub fn render(signal: &Signal, original: &Signal, title: &str, options: &PlotOptions) -> Result<RgbImage, PlotError> {
    let axes = Axes::new(options, options.y_range(&signal.samples))?;
    let labels = bit_labels(original, options.bit_count());
    let mut framebuffer = Framebuffer {
        image: RgbImage::new(options.width, options.height),
    };
    draw(&mut framebuffer, &axes, signal, &labels, title, options).unwrap_or_else(|never| match never {});

    tracing::debug!(
        width = options.width,
        height = options.height,
        samples = signal.len(),
        "waveform plot rendered"
    );
    Ok(framebuffer.image)
}

/// Render `signal` and encode it as PNG bytes.
pub fn render_png(signal: &Signal, original: &Signal, title: &str, options: &PlotOptions) -> Result<Vec<u8>, PlotError> {
    let image = render(signal, original, title, options)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Write PNG bytes to `path`.
pub fn save_png(bytes: &[u8], path: impl AsRef<Path>) -> Result<(), PlotError> {
    std::fs::write(path, bytes)?;
    Ok(())
}
