mod app;
mod layout;
mod shader_data;
mod worker;

use std::path::PathBuf;

use clap::Parser;
use log::info;

use app::{ForkTreeApp, ShaderSources};
use layout::LayoutParams;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON array of shader summaries, each with a `creator` field.
    #[arg(long, default_value = "starch_summary.json")]
    summary: PathBuf,
    /// JSON array of `{parentIndex, childIndices}` entries aligned with the summaries.
    #[arg(long, default_value = "starch_links.json")]
    links: PathBuf,
    /// Fixed seed for reproducible layouts.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_parser = parse_positive)]
    pool_radius: Option<f32>,
    #[arg(long, value_parser = parse_non_negative)]
    cluster_spread: Option<f32>,
    #[arg(long, value_parser = parse_positive)]
    edge_length: Option<f32>,
}

fn parse_finite(raw: &str) -> Result<f32, String> {
    let value: f32 = raw.parse().map_err(|err| format!("{err}"))?;
    if !value.is_finite() {
        return Err(format!("{raw} is not a finite number"));
    }
    Ok(value)
}

fn parse_positive(raw: &str) -> Result<f32, String> {
    let value = parse_finite(raw)?;
    if value <= 0.0 {
        return Err(format!("{raw} must be greater than zero"));
    }
    Ok(value)
}

fn parse_non_negative(raw: &str) -> Result<f32, String> {
    let value = parse_finite(raw)?;
    if value < 0.0 {
        return Err(format!("{raw} must not be negative"));
    }
    Ok(value)
}

impl Args {
    fn layout_params(&self) -> LayoutParams {
        let defaults = LayoutParams::default();
        LayoutParams {
            pool_radius: self.pool_radius.unwrap_or(defaults.pool_radius),
            cluster_spread: self.cluster_spread.unwrap_or(defaults.cluster_spread),
            start_edge_length: self.edge_length.unwrap_or(defaults.start_edge_length),
            seed: self.seed,
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.layout_params();
    let sources = ShaderSources {
        summary: args.summary,
        links: args.links,
    };
    info!(
        "reading {} and {} ({params:?})",
        sources.summary.display(),
        sources.links.display()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "fork-tree",
        options,
        Box::new(move |cc| Ok(Box::new(ForkTreeApp::new(cc, sources, params)))),
    )
}
