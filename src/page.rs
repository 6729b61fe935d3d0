use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::map::MapView;

pub const MAP_PAGE_FILE: &str = "map_view.html";
const LEAFLET_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/leaflet.css";
const LEAFLET_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/leaflet.js";

/// Host page for the station map. The bootstrap script takes its container,
/// view and tile layer from the `MapView` it is rendered with.
pub struct MapPage<'a> {
    pub title: &'a str,
    pub data_url: &'a str,
    pub back_link: &'a str,
}

impl Default for MapPage<'_> {
    fn default() -> Self {
        MapPage {
            title: "Helicorder Stations Map",
            data_url: crate::station::STATION_DATA_FILE,
            back_link: "index.html",
        }
    }
}

impl MapPage<'_> {
    pub fn render(&self, map: &MapView) -> Result<String> {
        let viewport = map.viewport();
        let tile_layer = match map.tile_layer() {
            Some(layer) => format!(
                "L.tileLayer({}, {{\n                attribution: {}\n            }}).addTo(map);",
                serde_json::to_string(&layer.url_template)?,
                serde_json::to_string(&layer.attribution)?
            ),
            None => String::new(),
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{css}" />
    <style>
        body, html {{
            height: 100%;
            margin: 0;
            padding: 0;
            font-family: Arial, sans-serif;
        }}
        .container {{
            display: flex;
            flex-direction: column;
            height: 100%;
        }}
        header, footer {{
            background-color: #f8f9fa;
            padding: 1rem;
            text-align: center;
        }}
        #{container} {{
            flex-grow: 1;
        }}
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>{title}</h1>
        </header>
        <div id="{container}"></div>
        <footer>
            <p><a href="{back_link}">Back to All Stations</a></p>
        </footer>
    </div>

    <script src="{js}"></script>
    <script>
        document.addEventListener('DOMContentLoaded', function() {{
            const map = L.map({container_js}).setView([{lat}, {lng}], {zoom});
            {tile_layer}

            fetch({data_url})
                .then(response => response.json())
                .then(stations => {{
                    stations.forEach(station => {{
                        const marker = L.marker([station.latitude, station.longitude]).addTo(map);
                        marker.bindPopup(`
                            <strong>${{station.id}}</strong><br>
                            Network: ${{station.network}}<br>
                            Station: ${{station.station}}<br>
                            <a href="${{station.id}}.html" target="_blank">View Helicorder</a>
                        `);
                    }});

                    if (stations.length > 0) {{
                        const bounds = L.latLngBounds(stations.map(s => [s.latitude, s.longitude]));
                        map.fitBounds(bounds);
                    }}
                }});
        }});
    </script>
</body>
</html>
"#,
            title = self.title,
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            container = map.container(),
            container_js = serde_json::to_string(map.container())?,
            back_link = self.back_link,
            lat = viewport.center.lat,
            lng = viewport.center.lng,
            zoom = viewport.zoom,
            tile_layer = tile_layer,
            data_url = serde_json::to_string(self.data_url)?,
        ))
    }

    pub fn write(&self, map: &MapView, output_dir: &Path) -> Result<()> {
        let path = output_dir.join(MAP_PAGE_FILE);
        fs::write(&path, self.render(map)?).map_err(|e| Error::io(&path, e))?;
        info!("Generated {} in {}", MAP_PAGE_FILE, output_dir.display());
        Ok(())
    }
}
