//! PNG line charts for range query results
//!
//! Plain raster rendering: axes, horizontal gridlines and one polyline per
//! series. No text is drawn; the legend travels as JSON metadata.

use std::io::Cursor;

use chronomcp_client::RangeSeries;
use image::{ImageFormat, Rgb, RgbImage};

pub const PNG_MIME: &str = "image/png";

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([96, 96, 96]);
const GRID: Rgb<u8> = Rgb([226, 226, 226]);
const GRID_LINES: u32 = 4;
const MARGIN: u32 = 24;

const PALETTE: [Rgb<u8>; 8] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([23, 190, 207]),
];

/// Color of the series at `index`, cycling through the palette.
pub fn series_color(index: usize) -> Rgb<u8> {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
        }
    }
}

/// Data bounds; degenerate spans are widened so scaling never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn of(series: &[RangeSeries]) -> Option<Self> {
        let mut points = series.iter().flat_map(RangeSeries::points).peekable();
        let (x0, y0) = *points.peek()?;
        let mut bounds = Bounds {
            x_min: x0,
            x_max: x0,
            y_min: y0,
            y_max: y0,
        };
        for (x, y) in points {
            bounds.x_min = bounds.x_min.min(x);
            bounds.x_max = bounds.x_max.max(x);
            bounds.y_min = bounds.y_min.min(y);
            bounds.y_max = bounds.y_max.max(y);
        }
        if bounds.x_max == bounds.x_min {
            bounds.x_min -= 1.0;
            bounds.x_max += 1.0;
        }
        if bounds.y_max == bounds.y_min {
            bounds.y_min -= 1.0;
            bounds.y_max += 1.0;
        }
        Some(bounds)
    }
}

struct Plot {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
    bounds: Bounds,
}

impl Plot {
    fn project(&self, x: f64, y: f64) -> (i64, i64) {
        let b = &self.bounds;
        let fx = (x - b.x_min) / (b.x_max - b.x_min);
        let fy = (y - b.y_min) / (b.y_max - b.y_min);
        let px = self.left as f64 + fx * (self.right - self.left) as f64;
        let py = self.bottom as f64 - fy * (self.bottom - self.top) as f64;
        (px.round() as i64, py.round() as i64)
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line between two pixel positions.
fn line(img: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);
    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn dot(img: &mut RgbImage, (x, y): (i64, i64), color: Rgb<u8>) {
    for ox in -1..=1 {
        for oy in -1..=1 {
            put(img, x + ox, y + oy, color);
        }
    }
}

/// Draw `series` into an image of the requested size.
pub fn draw(series: &[RangeSeries], options: ChartOptions) -> RgbImage {
    let mut img = RgbImage::from_pixel(options.width, options.height, BACKGROUND);
    let width = i64::from(options.width);
    let height = i64::from(options.height);
    let margin = i64::from(MARGIN).min(width / 4).min(height / 4);
    let (left, top, right, bottom) = (margin, margin, width - 1 - margin, height - 1 - margin);

    for i in 1..=GRID_LINES {
        let y = bottom - (bottom - top) * i64::from(i) / i64::from(GRID_LINES);
        line(&mut img, (left, y), (right, y), GRID);
    }
    line(&mut img, (left, top), (left, bottom), AXIS);
    line(&mut img, (left, bottom), (right, bottom), AXIS);

    let Some(bounds) = Bounds::of(series) else {
        return img;
    };
    let plot = Plot {
        left,
        top,
        right,
        bottom,
        bounds,
    };

    for (index, s) in series.iter().enumerate() {
        let color = series_color(index);
        let pixels: Vec<(i64, i64)> = s.points().map(|(x, y)| plot.project(x, y)).collect();
        match pixels.as_slice() {
            [] => {}
            [only] => dot(&mut img, *only, color),
            _ => {
                for pair in pixels.windows(2) {
                    line(&mut img, pair[0], pair[1], color);
                }
            }
        }
    }
    img
}

/// Render `series` as PNG bytes.
pub fn render_line_chart(
    series: &[RangeSeries],
    options: ChartOptions,
) -> Result<Vec<u8>, image::ImageError> {
    let img = draw(series, options);
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}
