//! Station inventory read from `config.ini`.
//!
//! Every section is one station, named `NET.STA`:
//!
//! ```ini
//! [AM.R1234]
//! detecstream = EHZ
//! deteclocid = 00
//! ```

use std::path::Path;

use ini::Ini;
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct StationConfig {
    pub network: String,
    pub station: String,
    pub channel: String,
    pub location: String,
}

impl StationConfig {
    pub fn seed_id(&self) -> String {
        format!("{}.{}.{}.{}", self.network, self.station, self.location, self.channel)
    }
}

pub fn read_inventory(path: &Path) -> Result<Vec<StationConfig>> {
    let ini = Ini::load_from_file(path)?;
    let stations = stations_from_ini(&ini)?;
    info!("Loaded {} stations from {}", stations.len(), path.display());
    Ok(stations)
}

pub fn parse_inventory(text: &str) -> Result<Vec<StationConfig>> {
    let ini = Ini::load_from_str(text).map_err(ini::Error::Parse)?;
    stations_from_ini(&ini)
}

fn stations_from_ini(ini: &Ini) -> Result<Vec<StationConfig>> {
    let mut stations = Vec::new();
    for (section, props) in ini.iter() {
        // Keys above the first section header are not stations.
        let Some(section) = section else { continue };

        let (network, station) = section
            .split_once('.')
            .filter(|(net, sta)| !net.is_empty() && !sta.is_empty())
            .ok_or_else(|| Error::BadStationId(section.to_string()))?;
        let required = |key: &'static str| {
            props
                .get(key)
                .map(str::to_string)
                .ok_or_else(|| Error::MissingKey {
                    section: section.to_string(),
                    key,
                })
        };

        stations.push(StationConfig {
            network: network.to_string(),
            station: station.to_string(),
            channel: required("detecstream")?,
            location: required("deteclocid")?,
        });
    }
    Ok(stations)
}
