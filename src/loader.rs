use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo::{LatLng, LatLngBounds};
use crate::map::{MapView, Marker, TileLayer, MAP_CONTAINER_ID};
use crate::station::{parse_stations, Station};

/// Where the station list is read from: an HTTP(S) URL or a local file.
#[derive(Debug, Clone, PartialEq)]
pub enum StationSource {
    Remote(String),
    Local(PathBuf),
}

impl StationSource {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            StationSource::Remote(location.to_string())
        } else {
            StationSource::Local(PathBuf::from(location))
        }
    }

    // One request, one decode. The status code is not checked; whatever body
    // comes back must decode as a station list.
    pub async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<Station>> {
        match self {
            StationSource::Remote(url) => {
                let body = client.get(url).send().await?.text().await?;
                parse_stations(&body)
            }
            StationSource::Local(path) => {
                let body = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| Error::io(path, e))?;
                parse_stations(&body)
            }
        }
    }
}

impl fmt::Display for StationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationSource::Remote(url) => write!(f, "{}", url),
            StationSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Map bound to `#map` with the OpenStreetMap tile layer, at the default view.
pub fn bootstrap_map() -> MapView {
    let mut map = MapView::new(MAP_CONTAINER_ID);
    map.add_tile_layer(TileLayer::openstreetmap());
    map
}

pub fn bootstrap_map_sized(width: f64, height: f64) -> MapView {
    bootstrap_map().with_size(width, height)
}

// Place one marker per station, then fit the viewport when there is anything to fit.
pub fn render_stations(map: &mut MapView, stations: &[Station]) -> usize {
    for station in stations {
        debug!("Placing marker for {} at ({}, {})", station.id, station.latitude, station.longitude);
        let marker = Marker::new(LatLng::new(station.latitude, station.longitude))
            .bind_popup(station.popup_html());
        map.add_marker(marker);
    }

    let points = stations
        .iter()
        .map(|s| LatLng::new(s.latitude, s.longitude));
    if let Some(bounds) = LatLngBounds::from_points(points) {
        map.fit_bounds(&bounds);
    }

    stations.len()
}

/// Fetches the station list and renders it onto `map`.
///
/// Rendering only starts once the whole list has decoded, so a failed fetch
/// leaves the map exactly as it was.
pub async fn load_and_render(
    map: &mut MapView,
    source: &StationSource,
    client: &reqwest::Client,
) -> Result<usize> {
    let stations = source.fetch(client).await?;
    let placed = render_stations(map, &stations);
    info!("Placed {} station markers from {}", placed, source);
    Ok(placed)
}
