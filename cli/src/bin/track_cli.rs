use clap::{Parser, Subcommand};
use cli::render::{ContourSink, OverlayRenderer};
use cli::TrackingConfig;
use color_eyre::eyre::{eyre, Result};
use geometry::{oriented_bounding_box, BoundingBox, GeoHullBuilder};
use image::Rgba;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};
use tracking::{
    AdaptiveBackgroundModel, DepthHomogeneity, RegionTracker, TrackOutline,
};

const CONTOUR_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
const BOX_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a region through a directory of 16-bit grayscale depth frames
    Track {
        /// Directory containing the frame images, processed in name order
        #[arg(short, long)]
        frames: PathBuf,
        /// Output directory for GeoJSON outlines and box summaries
        #[arg(short, long)]
        output_dir: PathBuf,
        /// Path to a TOML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also write PNG overlays with contours and boxes drawn in
        #[arg(long)]
        overlay: bool,
    },
    /// Write a default configuration file
    InitConfig {
        /// Where to write the TOML configuration
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of the configuration format
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Track {
            frames,
            output_dir,
            config,
            overlay,
        } => {
            let config = match config {
                Some(path) => TrackingConfig::from_file(path)?,
                None => TrackingConfig::default(),
            };
            track_frames(frames, output_dir, &config, *overlay)?;
        }
        Commands::InitConfig { output } => {
            TrackingConfig::default().to_toml_file(output)?;
            info!("wrote default configuration to {}", output.display());
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(TrackingConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

/// Per-frame record collected into the run summary.
#[derive(Debug, Serialize)]
struct FrameSummary {
    frame: String,
    polylines: usize,
    boxes: Vec<BoundingBox>,
}

fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("png") | Some("tif") | Some("tiff")
            )
        })
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(eyre!("no frame images found in {}", dir.display()));
    }
    Ok(paths)
}

fn track_frames(
    frames_dir: &Path,
    output_dir: &Path,
    config: &TrackingConfig,
    overlay: bool,
) -> Result<()> {
    let paths = frame_paths(frames_dir)?;
    std::fs::create_dir_all(output_dir)?;

    let first = image::open(&paths[0])?.to_luma16();
    let (width, height) = first.dimensions();
    info!(width, height, frames = paths.len(), "tracking frame sequence");

    let model = AdaptiveBackgroundModel::new(width, height)?;
    let oracle = DepthHomogeneity::new(
        model,
        config.min_distance,
        config.max_distance,
        config.threshold_offset,
    );
    let mut tracker = RegionTracker::new(
        width,
        height,
        config.seed_spacing_x,
        config.seed_spacing_y,
        oracle,
    )?;

    let hull_builder = GeoHullBuilder;
    let mut summaries = Vec::with_capacity(paths.len());

    for path in &paths {
        let frame = image::open(path)?.to_luma16();
        tracker.track(&frame, true)?;

        let outline = TrackOutline::from_contour_selected(
            tracker.contour(),
            width,
            height,
            config.min_contour_points,
            config.n_longest_contours,
        );

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("frame");
        let geojson_path = output_dir.join(format!("{stem}.geojson"));
        outline.save_geojson(
            geojson_path
                .to_str()
                .ok_or_else(|| eyre!("non-UTF-8 output path"))?,
        )?;

        let mut boxes = Vec::new();
        for polyline in &outline.polylines {
            let points: Vec<[f32; 2]> = polyline
                .iter()
                .map(|p| [p.x as f32, p.y as f32])
                .collect();
            match oriented_bounding_box(&hull_builder, &points) {
                Ok(bbox) => boxes.push(bbox),
                Err(err) => warn!(frame = stem, "skipping bounding box: {err}"),
            }
        }

        if overlay {
            write_overlay(path, output_dir, stem, &outline, &boxes)?;
        }

        if config.verbose {
            info!(
                frame = stem,
                polylines = outline.polylines.len(),
                boxes = boxes.len(),
                "frame tracked"
            );
        }
        summaries.push(FrameSummary {
            frame: stem.to_string(),
            polylines: outline.polylines.len(),
            boxes,
        });
    }

    let summary_path = output_dir.join("boxes.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&summaries)?)?;
    info!(
        "wrote {} frame summaries to {}",
        summaries.len(),
        summary_path.display()
    );
    Ok(())
}

fn write_overlay(
    frame_path: &Path,
    output_dir: &Path,
    stem: &str,
    outline: &TrackOutline,
    boxes: &[BoundingBox],
) -> Result<()> {
    let base = image::open(frame_path)?.to_rgba8();
    let mut renderer = OverlayRenderer::new(base);

    for polyline in &outline.polylines {
        let points: Vec<[f32; 2]> = polyline
            .iter()
            .map(|p| [p.x as f32, p.y as f32])
            .collect();
        renderer.draw_polyline(&points, CONTOUR_COLOR);
    }
    for bbox in boxes {
        let [a, b, c, d] = bbox.corners();
        renderer.draw_polyline(&[a, b, c, d, a], BOX_COLOR);
    }

    let overlay_path = output_dir.join(format!("{stem}_overlay.png"));
    renderer.into_image().save(&overlay_path)?;
    Ok(())
}
