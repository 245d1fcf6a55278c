//! Turns sliced layers into something that can be looked at.

use crate::Pos;

pub mod raster;
pub mod svg;

/// Scale that fits the XY extent of `bounds` into a `width` by `height`
/// canvas, leaving `padding` on every side.
fn fit_scale((min, max): (Pos, Pos), width: f64, height: f64, padding: f64) -> f64 {
    let size = max - min;
    let scale = ((width - padding * 2.0) / size.x).min((height - padding * 2.0) / size.y);

    // A mesh that is flat along both axes has nothing to fit.
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_fits_longest_side() {
        let bounds = (Pos::zeros(), Pos::new(2.0, 1.0, 5.0));
        assert_eq!(fit_scale(bounds, 100.0, 100.0, 10.0), 40.0);
        assert_eq!(fit_scale(bounds, 100.0, 30.0, 5.0), 20.0);
    }

    #[test]
    fn flat_bounds() {
        let bounds = (Pos::zeros(), Pos::new(0.0, 0.0, 1.0));
        assert_eq!(fit_scale(bounds, 100.0, 100.0, 10.0), 1.0);
    }
}
