use std::fs;
use std::path::Path;

use futures_util::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::fdsn::FdsnClient;
use crate::inventory::StationConfig;
use crate::loader::bootstrap_map;
use crate::page::MapPage;
use crate::station::{write_station_data, Station, STATION_DATA_FILE};

pub const MAX_CONCURRENT_LOOKUPS: usize = 10;

/// Resolves coordinates for every configured station, keeping inventory
/// order. Stations the FDSN service cannot place are left out.
pub async fn collect_station_data(fdsn: &FdsnClient, inventory: &[StationConfig]) -> Vec<Station> {
    stream::iter(inventory)
        .map(|config| async move {
            match fdsn.station_location(&config.network, &config.station).await {
                Ok(Some(location)) => Some(Station {
                    id: config.seed_id(),
                    network: config.network.clone(),
                    station: config.station.clone(),
                    location: Some(config.location.clone()),
                    channel: Some(config.channel.clone()),
                    latitude: location.latitude,
                    longitude: location.longitude,
                    elevation: Some(location.elevation),
                }),
                Ok(None) => {
                    warn!("Skipping {}: no location", config.seed_id());
                    None
                }
                Err(e) => {
                    error!("Error fetching station info for {}.{}: {}", config.network, config.station, e);
                    None
                }
            }
        })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .filter_map(|station| async move { station })
        .collect()
        .await
}

/// Writes `station_data.json` and the map page into `output_dir`.
///
/// Returns how many stations made it into the data file. Nothing is written,
/// not even the directory, when no station could be placed.
pub async fn generate_site(
    fdsn: &FdsnClient,
    inventory: &[StationConfig],
    output_dir: &Path,
) -> Result<usize> {
    let stations = collect_station_data(fdsn, inventory).await;
    if stations.is_empty() {
        return Err(Error::NothingResolved(inventory.len()));
    }

    fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;

    write_station_data(&output_dir.join(STATION_DATA_FILE), &stations)?;
    MapPage::default().write(&bootstrap_map(), output_dir)?;

    info!(
        "Successfully mapped {} out of {} configured stations.",
        stations.len(),
        inventory.len()
    );
    Ok(stations.len())
}
