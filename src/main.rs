use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use helimap::fdsn::FdsnClient;
use helimap::generate::generate_site;
use helimap::inventory::read_inventory;
use helimap::loader::{bootstrap_map, bootstrap_map_sized, load_and_render, StationSource};
use helimap::logging::setup_logging;
use helimap::page::MapPage;

#[derive(Parser)]
#[command(name = "helimap", about = "Seismic station map generator")]
struct Cli {
    #[arg(long, env = "HELIMAP_LOG_DIR", default_value = "logs", global = true)]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up every configured station and write station_data.json and map_view.html
    Generate {
        #[arg(long, env = "HELIMAP_BASE_URL", default_value = "http://127.0.0.1:18081")]
        base_url: String,
        #[arg(long, env = "HELIMAP_CONFIG", default_value = "config.ini")]
        config: PathBuf,
        #[arg(long, env = "HELIMAP_OUTPUT_DIR", default_value = "helicorder_plots")]
        output_dir: PathBuf,
    },
    /// Write map_view.html only
    Page {
        #[arg(long, env = "HELIMAP_OUTPUT_DIR", default_value = "helicorder_plots")]
        output_dir: PathBuf,
    },
    /// Load a station list the way the map page does and print the resulting markers and viewport
    Preview {
        #[arg(default_value = "helicorder_plots/station_data.json")]
        source: String,
        /// Map container width in CSS pixels
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        /// Map container height in CSS pixels
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_dir).context("failed to set up logging")?;

    match cli.command {
        Command::Generate {
            base_url,
            config,
            output_dir,
        } => {
            let inventory = read_inventory(&config)
                .with_context(|| format!("failed to read station inventory {}", config.display()))?;
            let fdsn = FdsnClient::new(reqwest::Client::new(), base_url);
            generate_site(&fdsn, &inventory, &output_dir)
                .await
                .context("no station data generated, check the data source and configuration")?;
        }
        Command::Page { output_dir } => {
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("failed to create {}", output_dir.display()))?;
            MapPage::default().write(&bootstrap_map(), &output_dir)?;
        }
        Command::Preview {
            source,
            width,
            height,
        } => {
            let source = StationSource::parse(&source);
            let mut map = bootstrap_map_sized(width, height);
            load_and_render(&mut map, &source, &reqwest::Client::new())
                .await
                .with_context(|| format!("failed to load stations from {}", source))?;

            for marker in map.markers() {
                println!(
                    "marker ({}, {}): {}",
                    marker.position.lat,
                    marker.position.lng,
                    marker.popup.as_deref().unwrap_or_default()
                );
            }
            let viewport = map.viewport();
            println!(
                "viewport center ({:.5}, {:.5}) zoom {}",
                viewport.center.lat, viewport.center.lng, viewport.zoom
            );
            info!("Previewed {} stations", map.markers().len());
        }
    }

    Ok(())
}
