use image::{GrayImage, Luma};
use ordered_float::OrderedFloat;

use crate::{layer::Layer, Pos};

pub use common::config::{FillRule, RasterConfig};

/// Renders a layer as white on black, fitting the XY extent of `bounds` in
/// the middle of the image. The y axis points up, so the top row of the
/// image is the largest y.
pub fn render_layer(layer: &Layer, bounds: (Pos, Pos), config: &RasterConfig) -> GrayImage {
    let (width, height) = (config.width as f64, config.height as f64);
    let center = (bounds.0 + bounds.1) / 2.0;
    let scale = super::fit_scale(bounds, width, height, config.padding);
    let to_pixel = |p: &Pos| {
        (
            width / 2.0 + (p.x - center.x) * scale,
            height / 2.0 - (p.y - center.y) * scale,
        )
    };

    // Every path is filled as if it were closed.
    let edges = (layer.paths.iter())
        .flat_map(|path| {
            let n = path.len();
            (0..n).map(move |i| (&path.points[i], &path.points[(i + 1) % n]))
        })
        .map(|(a, b)| (to_pixel(a), to_pixel(b)))
        .collect::<Vec<_>>();

    let mut image = GrayImage::new(config.width, config.height);
    let mut crossings = Vec::new();

    for row in 0..config.height {
        let y = row as f64 + 0.5;

        // Where each edge crosses the middle of this row and which way it
        // was going. Pixel rows grow downwards, so a downwards edge in the
        // image is going up in the layer.
        crossings.clear();
        crossings.extend(
            (edges.iter())
                .filter(|(a, b)| (a.1 > y) ^ (b.1 > y))
                .map(|&(a, b)| {
                    let t = (y - a.1) / (b.1 - a.1);
                    let direction = if b.1 > a.1 { -1 } else { 1 };
                    (a.0 + t * (b.0 - a.0), direction)
                }),
        );
        crossings.sort_by_key(|&(x, _)| OrderedFloat(x));

        let mut depth = 0_i32;
        for pair in crossings.windows(2) {
            let (start, direction) = pair[0];
            depth += direction;

            let inside = match config.fill_rule {
                FillRule::NonZero => depth != 0,
                FillRule::EvenOdd => depth % 2 != 0,
            };
            if inside {
                fill_span(&mut image, row, start, pair[1].0);
            }
        }
    }

    image
}

/// Fills the pixels of a row whose centers lie in `start..end`.
fn fill_span(image: &mut GrayImage, row: u32, start: f64, end: f64) {
    let width = image.width() as f64;
    let first = (start - 0.5).ceil().clamp(0.0, width) as u32;
    let last = (end - 0.5).ceil().clamp(0.0, width) as u32;

    for column in first..last {
        image.put_pixel(column, row, Luma([255]));
    }
}
