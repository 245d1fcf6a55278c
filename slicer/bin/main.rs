use std::{
    fs::{self, File},
    io::{stdout, Write},
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use args::Args;
use common::config::SliceConfig;
use slicer::{
    format::{raster::render_layer, svg::layers_to_svg},
    mesh::load_mesh,
    polygon, Layer, Pos, Slicer,
};

mod args;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    let filter = filter::Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("slicer", level)
        .with_target("common", level);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.slice_config()?;
    for file in &args.files {
        process(&args, &config, file)
            .with_context(|| format!("Failed to slice `{}`", file.display()))?;
    }

    Ok(())
}

fn process(args: &Args, config: &SliceConfig, file: &Path) -> Result<()> {
    info!("Input: {}", file.display());

    let now = Instant::now();
    let format = file
        .extension()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mesh = load_mesh(File::open(file)?, &format)?;
    let bounds = mesh.bounds().context("Mesh has no vertices")?;
    info!(
        "Loaded mesh {{ vert: {}, face: {} }} in {:?}",
        mesh.vertex_count(),
        mesh.face_count(),
        now.elapsed()
    );

    let mut config = config.clone();
    config.step = args.step(&config, bounds.1.z - bounds.0.z);

    // Slicing is multithreaded on its own, this thread just reports on it.
    let slicer = Slicer::new(config.clone(), mesh);
    let progress = slicer.progress();
    let handle = thread::spawn(move || slicer.slice());

    let mut completed = 0;
    while !progress.is_finished() {
        completed = progress.wait(completed);
        if !args.quiet {
            print!(
                "\rLayer: {}/{}, {:.1}%",
                completed,
                progress.total(),
                progress.progress() * 100.0
            );
            stdout().flush()?;
        }
    }
    if !args.quiet {
        println!();
    }

    let mut layers = (handle.join())
        .map_err(|_| anyhow!("Slicing thread panicked"))??;

    if config.nest_polygons {
        layers = layers.iter().map(nest).collect();
    }

    let (directory, name) = output_location(args, file)?;
    let output = directory.join(format!("{name}.svg"));
    svg::save(&output, &layers_to_svg(bounds, &layers))
        .with_context(|| format!("Failed to write `{}`", output.display()))?;
    info!("Output: {}", output.display());

    if args.png {
        write_images(&directory.join(&name), bounds, &config, &layers)?;
    }

    Ok(())
}

/// Rebuilds a layer with each outer boundary followed by its holes.
fn nest(layer: &Layer) -> Layer {
    #[cfg(feature = "geo")]
    let polygons = polygon::reconcile(layer, &polygon::GeoBackend);
    #[cfg(not(feature = "geo"))]
    let polygons = polygon::flatten(layer);

    Layer::from_polygons(layer.z, polygons)
}

/// Directory the output is written to and the name it's based on.
fn output_location(args: &Args, file: &Path) -> Result<(PathBuf, String)> {
    let name = (file.file_name())
        .context("Input is not a file")?
        .to_string_lossy()
        .into_owned();
    let directory = match &args.directory {
        Some(directory) => directory.to_owned(),
        None => file.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    Ok((directory, name))
}

fn write_images(
    directory: &Path,
    bounds: (Pos, Pos),
    config: &SliceConfig,
    layers: &[Layer],
) -> Result<()> {
    let now = Instant::now();
    fs::create_dir_all(directory)?;

    layers.par_iter().enumerate().try_for_each(|(index, layer)| {
        let path = directory.join(format!("{index:04}.png"));
        render_layer(layer, bounds, &config.raster)
            .save(&path)
            .with_context(|| format!("Failed to write `{}`", path.display()))
    })?;

    info!(
        "Rendered {} layers to `{}` in {:?}",
        layers.len(),
        directory.display(),
        now.elapsed()
    );
    Ok(())
}
