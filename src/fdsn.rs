use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

// Row of an FDSN `format=text` station listing at `level=station`:
// #Network | Station | Latitude | Longitude | Elevation | SiteName | StartTime | EndTime
#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Elevation")]
    elevation: f64,
}

/// Client for the `fdsnws-station` web service of a seismic data server.
#[derive(Debug, Clone)]
pub struct FdsnClient {
    http: reqwest::Client,
    base_url: String,
}

impl FdsnClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        FdsnClient {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn station_query_url(&self) -> String {
        format!("{}/fdsnws/station/1/query", self.base_url.trim_end_matches('/'))
    }

    // Ok(None) when the service has nothing for this station.
    pub async fn station_location(
        &self,
        network: &str,
        station: &str,
    ) -> Result<Option<StationLocation>> {
        let response = self
            .http
            .get(self.station_query_url())
            .query(&[
                ("network", network),
                ("station", station),
                ("level", "station"),
                ("format", "text"),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let location = parse_station_text(&body)?;
                if location.is_none() {
                    info!("No station metadata listed for {}.{}", network, station);
                }
                Ok(location)
            }
            StatusCode::NO_CONTENT => {
                info!("No station metadata available for {}.{}", network, station);
                Ok(None)
            }
            status => {
                warn!("Station query for {}.{} returned {}", network, station, status);
                Ok(None)
            }
        }
    }
}

/// First station row of a pipe-separated FDSN text listing.
pub fn parse_station_text(body: &str) -> Result<Option<StationLocation>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    match rdr.deserialize::<StationRow>().next() {
        Some(row) => {
            let row = row?;
            Ok(Some(StationLocation {
                latitude: row.latitude,
                longitude: row.longitude,
                elevation: row.elevation,
            }))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANMO: &str = "\
#Network | Station | Latitude | Longitude | Elevation | SiteName | StartTime | EndTime
IU|ANMO|34.9459|-106.4572|1850.0|Albuquerque, New Mexico, USA|2002-11-19T21:07:00|
";

    #[test]
    fn reads_first_station_row() {
        let location = parse_station_text(ANMO).unwrap().unwrap();
        assert_eq!(location.latitude, 34.9459);
        assert_eq!(location.longitude, -106.4572);
        assert_eq!(location.elevation, 1850.0);
    }

    #[test]
    fn header_only_listing_has_no_location() {
        let header = ANMO.lines().next().unwrap();
        assert_eq!(parse_station_text(header).unwrap(), None);
        assert_eq!(parse_station_text("").unwrap(), None);
    }

    #[test]
    fn non_numeric_coordinates_are_rejected() {
        let body = "#Network|Station|Latitude|Longitude|Elevation\nIU|ANMO|north|west|high\n";
        assert!(parse_station_text(body).is_err());
    }

    #[test]
    fn query_url_ignores_trailing_slash() {
        let client = FdsnClient::new(reqwest::Client::new(), "http://127.0.0.1:18081/");
        assert_eq!(
            client.station_query_url(),
            "http://127.0.0.1:18081/fdsnws/station/1/query"
        );
    }
}
