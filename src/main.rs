use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use secchi::config::{Config, TimeWindow};
use secchi::models::{TSI_BAND, TrophicClass};
use secchi::pipeline::Pipeline;

#[derive(Parser)]
#[command(
    name = "secchi",
    version,
    about = "Secchi depth and trophic state from MODIS ocean-color products"
)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, default_value = "./data/config/modis_wq.json")]
    config: PathBuf,

    /// Overrides the configured start date (YYYY-MM-DD)
    #[arg(long, requires = "end_date")]
    start_date: Option<String>,

    /// Overrides the configured end date (YYYY-MM-DD)
    #[arg(long, requires = "start_date")]
    end_date: Option<String>,

    /// Overrides the configured output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let mut config = Config::from_file(&cli.config)?;
    if let (Some(start), Some(end)) = (&cli.start_date, &cli.end_date) {
        config = config.with_time_window(TimeWindow::parse(start, end)?);
    }
    if let Some(output) = cli.output {
        config = config.with_output_directory(output);
    }

    println!("Starting water quality processing for {}...", config.time_window());

    let report = Pipeline::from_config(config)?.run()?;

    println!("Available imagery: {} images", report.images);
    for (id, timestamp) in &report.available {
        println!("  {} ({})", id, timestamp.format("%Y-%m-%d"));
    }
    for output in &report.series {
        println!(
            "✓ {}: {} points saved to: {}",
            output.title,
            output.series.len(),
            output.csv.display()
        );
    }
    for task in &report.exports {
        println!(
            "✓ {} ({}x{}, {} valid pixels) saved to: {}",
            task.description,
            task.width,
            task.height,
            task.valid_pixels,
            task.path.display()
        );
    }
    if let Some(tsi) = report
        .series
        .iter()
        .find_map(|output| (output.series.band == TSI_BAND).then(|| output.series.mean()))
        .flatten()
    {
        println!(
            "Mean TSI over the period: {:.2} ({})",
            tsi,
            TrophicClass::from_index(tsi)
        );
    }
    if let Some(image) = &report.single_image {
        println!("{} chlor_a:\n{}", image.id, image.summary);
    }

    Ok(())
}
