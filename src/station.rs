use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const STATION_DATA_FILE: &str = "station_data.json";

/// A seismic station as listed in `station_data.json`.
///
/// `id` doubles as the popup label and as the stem of the station's detail
/// page. The location, channel and elevation fields are written by the
/// generator but are not required when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub network: String,
    pub station: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl Station {
    pub fn detail_page(&self) -> String {
        format!("{}.html", self.id)
    }

    // Values go in as-is, the same way the browser page interpolates them.
    pub fn popup_html(&self) -> String {
        format!(
            "<strong>{}</strong><br>Network: {}<br>Station: {}<br><a href=\"{}\" target=\"_blank\">View Helicorder</a>",
            self.id,
            self.network,
            self.station,
            self.detail_page()
        )
    }
}

pub fn parse_stations(text: &str) -> Result<Vec<Station>> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_station_data(path: &Path) -> Result<Vec<Station>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;

    let reader = BufReader::new(file);

    Ok(serde_json::from_reader(reader)?)
}

pub fn write_station_data(path: &Path, stations: &[Station]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;

    let mut writer = BufWriter::new(file);

    serde_json::to_writer(&mut writer, stations)?;
    writer.flush().map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_record() {
        let stations = parse_stations(
            r#"[{"id":"ABC","network":"NET","station":"STA1","latitude":10,"longitude":20}]"#,
        )
        .unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "ABC");
        assert_eq!(stations[0].latitude, 10.0);
        assert_eq!(stations[0].longitude, 20.0);
        assert_eq!(stations[0].location, None);
    }

    #[test]
    fn popup_carries_fields_and_detail_link() {
        let station = Station {
            id: "ABC".into(),
            network: "NET".into(),
            station: "STA1".into(),
            location: None,
            channel: None,
            latitude: 10.0,
            longitude: 20.0,
            elevation: None,
        };

        let html = station.popup_html();
        assert!(html.contains("<strong>ABC</strong>"));
        assert!(html.contains("Network: NET"));
        assert!(html.contains("Station: STA1"));
        assert!(html.contains(r#"href="ABC.html""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn rejects_non_array_document() {
        assert!(matches!(
            parse_stations(r#"{"id":"ABC"}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn written_file_omits_missing_optionals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATION_DATA_FILE);
        let stations = vec![Station {
            id: "AM.R1234.00.EHZ".into(),
            network: "AM".into(),
            station: "R1234".into(),
            location: Some("00".into()),
            channel: Some("EHZ".into()),
            latitude: -33.5,
            longitude: 151.25,
            elevation: None,
        }];

        write_station_data(&path, &stations).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("elevation"));
        assert_eq!(read_station_data(&path).unwrap(), stations);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_device_write_is_an_error() {
        let stations = parse_stations(
            r#"[{"id":"ABC","network":"NET","station":"STA1","latitude":10,"longitude":20}]"#,
        )
        .unwrap();

        let err = write_station_data(Path::new("/dev/full"), &stations).unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path == Path::new("/dev/full")));
    }
}
