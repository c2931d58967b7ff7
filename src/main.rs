mod app;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use query_bubbles::export::{layout_document, write_layout};
use query_bubbles::source::{WeightMetric, load_series};
use query_bubbles::store::ResultStore;

use app::{BubbleApp, LaunchOptions, SourceFile};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricArg {
    Stars,
    Forks,
    Watchers,
}

impl From<MetricArg> for WeightMetric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Stars => Self::Stars,
            MetricArg::Forks => Self::Forks,
            MetricArg::Watchers => Self::Watchers,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Saved GitHub search responses; each file becomes one series
    files: Vec<PathBuf>,

    /// Series labels, applied to the files in order
    #[arg(long = "label")]
    labels: Vec<String>,

    #[arg(long, value_enum, default_value_t = MetricArg::Stars)]
    metric: MetricArg,

    /// Bubbles shown per series (clamped to 1..=100, non-positive means 5)
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    cap: i64,

    /// Minimum gap between bubble edges, in pixels
    #[arg(long, default_value_t = 12.0)]
    padding: f32,

    /// Seed for the random draw order
    #[arg(long)]
    seed: Option<u64>,

    /// Write the packed layout as JSON instead of opening a window
    #[arg(long)]
    export: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,
}

impl Args {
    fn sources(&self) -> Vec<SourceFile> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, path)| SourceFile {
                path: path.clone(),
                label: self.labels.get(index).cloned(),
            })
            .collect()
    }
}

fn export(args: &Args, path: &Path) -> Result<()> {
    let metric = WeightMetric::from(args.metric);
    let mut store = ResultStore::new();
    store.set_cap(args.cap);

    for source in args.sources() {
        let series = load_series(&source.path, source.label.as_deref(), metric)?;
        store.add_series(series.label, series.items);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let document = layout_document(
        &store,
        args.width,
        args.height,
        f64::from(args.padding),
        &mut rng,
    );
    write_layout(&document, path)?;
    info!(
        circles = document.circles.len(),
        path = %path.display(),
        "layout exported"
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Some(path) = &args.export {
        return export(&args, path).context("export failed");
    }

    let launch = LaunchOptions {
        sources: args.sources(),
        metric: args.metric.into(),
        cap: args.cap,
        padding: args.padding.max(0.0),
        seed: args.seed,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "query-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(BubbleApp::new(cc, launch)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}
