use svg::{
    node::element::{Group, Path as SvgPath},
    Document,
};

use crate::{layer::Layer, Pos};

/// Width and height of the document.
const SIZE: u32 = 1600;
const PADDING: f64 = 32.0;

/// Draws every layer on top of each other into one document, scaled to fit
/// the XY extent of `bounds`. Each layer becomes a `<path>` tagged with its
/// height in a `slicer-z` attribute. Fills are nearly transparent so the
/// stack reads like a contour map.
pub fn layers_to_svg(bounds: (Pos, Pos), layers: &[Layer]) -> Document {
    let (min, max) = bounds;
    let center = (min + max) / 2.0;
    let scale = super::fit_scale(bounds, SIZE as f64, SIZE as f64, PADDING);
    let transform = format!(
        "translate({half} {half}) scale({scale}) translate({} {})",
        -center.x,
        -center.y,
        half = SIZE / 2,
    );

    let group = (layers.iter()).fold(Group::new().set("transform", transform), |group, layer| {
        group.add(
            SvgPath::new()
                .set("slicer-z", layer.z.to_string())
                .set("stroke", "#000000")
                .set("stroke-width", (0.25 / scale).to_string())
                .set("fill", "#000000")
                .set("fill-rule", "evenodd")
                .set("fill-opacity", "0.01")
                .set("d", layer_data(layer)),
        )
    });

    Document::new()
        .set("version", "1.1")
        .set("width", SIZE)
        .set("height", SIZE)
        .add(group)
}

/// Outline of every path in a layer. All paths are closed in the drawing,
/// open ones included.
///
/// Coordinates are kept at full `f64` precision, `svg`'s `Data` only holds
/// `f32`.
fn layer_data(layer: &Layer) -> String {
    let mut commands = Vec::new();
    for path in layer.paths.iter().filter(|path| !path.is_empty()) {
        for (i, point) in path.points.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            commands.push(format!("{command}{},{}", point.x, point.y));
        }
        commands.push("Z".to_owned());
    }
    commands.join(" ")
}
