//! In-process model of the station map: the same bootstrap, markers, popups
//! and viewport fitting that the generated Leaflet page performs in a browser.

use scraper::{Html, Selector};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::{project, unproject, world_size, LatLng, LatLngBounds, Point};

pub const MAP_CONTAINER_ID: &str = "map";
pub const DEFAULT_CENTER: LatLng = LatLng::new(0.0, 0.0);
pub const DEFAULT_ZOOM: u8 = 2;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;
pub const OSM_MAX_ZOOM: u8 = 18;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn openstreetmap() -> Self {
        TileLayer {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            max_zoom: OSM_MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: LatLng,
    pub popup: Option<String>,
}

impl Marker {
    pub fn new(position: LatLng) -> Self {
        Marker {
            position,
            popup: None,
        }
    }

    pub fn bind_popup(mut self, html: impl Into<String>) -> Self {
        self.popup = Some(html.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

/// Container size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

impl Default for MapSize {
    fn default() -> Self {
        MapSize {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapView {
    container: String,
    size: MapSize,
    min_zoom: u8,
    max_zoom: u8,
    tile_layer: Option<TileLayer>,
    markers: Vec<Marker>,
    viewport: Viewport,
}

impl MapView {
    /// Map bound to `container`, centered on (0,0) at zoom 2.
    pub fn new(container: impl Into<String>) -> Self {
        MapView {
            container: container.into(),
            size: MapSize::default(),
            min_zoom: 0,
            max_zoom: OSM_MAX_ZOOM,
            tile_layer: None,
            markers: Vec::new(),
            viewport: Viewport {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
        }
    }

    /// Binds a map to the element `#container` of `host_page`, failing when
    /// the page has no such element.
    pub fn attach(host_page: &str, container: &str) -> Result<Self> {
        let selector = Selector::parse(&format!("#{}", container))
            .map_err(|_| Error::BadContainerId(container.to_string()))?;
        let document = Html::parse_document(host_page);
        if document.select(&selector).next().is_none() {
            return Err(Error::ContainerMissing(container.to_string()));
        }
        Ok(MapView::new(container))
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = MapSize { width, height };
        self
    }

    pub fn add_tile_layer(&mut self, layer: TileLayer) {
        self.max_zoom = layer.max_zoom;
        self.tile_layer = Some(layer);
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn tile_layer(&self) -> Option<&TileLayer> {
        self.tile_layer.as_ref()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        let zoom = self.bounds_zoom(bounds);
        let nw = project(bounds.north_west(), zoom as f64);
        let se = project(bounds.south_east(), zoom as f64);
        let center = unproject(
            Point {
                x: (nw.x + se.x) / 2.0,
                y: (nw.y + se.y) / 2.0,
            },
            zoom as f64,
        );
        self.viewport = Viewport { center, zoom };
    }

    // Largest zoom at which the projected extent of `bounds` fits the container.
    fn bounds_zoom(&self, bounds: &LatLngBounds) -> u8 {
        let nw = project(bounds.north_west(), 0.0);
        let se = project(bounds.south_east(), 0.0);
        let scale = (self.size.width / (se.x - nw.x)).min(self.size.height / (se.y - nw.y));
        let zoom = if scale.is_finite() {
            scale.log2().floor()
        } else {
            f64::INFINITY
        };
        zoom.clamp(self.min_zoom as f64, self.max_zoom as f64) as u8
    }

    /// Area covered by the container at the current viewport.
    ///
    /// Latitudes beyond the projection limit all map onto the world's top or
    /// bottom edge, so a window reaching an edge covers up to the pole.
    pub fn visible_bounds(&self) -> LatLngBounds {
        let zoom = self.viewport.zoom as f64;
        let center = project(self.viewport.center, zoom);
        let top_left = Point {
            x: center.x - self.size.width / 2.0,
            y: center.y - self.size.height / 2.0,
        };
        let bottom_right = Point {
            x: center.x + self.size.width / 2.0,
            y: center.y + self.size.height / 2.0,
        };

        let mut north_west = unproject(top_left, zoom);
        let mut south_east = unproject(bottom_right, zoom);
        if top_left.y <= 0.0 {
            north_west.lat = 90.0;
        }
        if bottom_right.y >= world_size(zoom) {
            south_east.lat = -90.0;
        }
        LatLngBounds::new(north_west, south_east)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_default_view() {
        let map = MapView::new(MAP_CONTAINER_ID);
        assert_eq!(map.viewport().center, LatLng::new(0.0, 0.0));
        assert_eq!(map.viewport().zoom, 2);
        assert!(map.markers().is_empty());
        assert!(map.tile_layer().is_none());
    }

    #[test]
    fn fitted_viewport_contains_all_points() {
        let mut map = MapView::new(MAP_CONTAINER_ID);
        map.add_tile_layer(TileLayer::openstreetmap());
        let points = [
            LatLng::new(-41.3, 174.8),
            LatLng::new(35.7, 139.7),
            LatLng::new(51.5, -0.1),
        ];
        map.fit_bounds(&LatLngBounds::from_points(points).unwrap());

        let visible = map.visible_bounds();
        for p in points {
            assert!(visible.contains(p), "{:?} outside {:?}", p, visible);
        }
    }

    #[test]
    fn tight_cluster_zooms_in() {
        let mut map = MapView::new(MAP_CONTAINER_ID);
        let bounds = LatLngBounds::new(LatLng::new(46.0, 7.0), LatLng::new(46.5, 7.8));
        map.fit_bounds(&bounds);

        assert!(map.viewport().zoom > DEFAULT_ZOOM);
        let center = map.viewport().center;
        assert!(center.lat > 46.0 && center.lat < 46.5);
        assert!((center.lng - 7.4).abs() < 1e-9);
    }

    #[test]
    fn single_point_fits_at_max_zoom() {
        let mut map = MapView::new(MAP_CONTAINER_ID);
        let p = LatLng::new(10.0, 20.0);
        map.fit_bounds(&LatLngBounds::new(p, p));

        assert_eq!(map.viewport().zoom, OSM_MAX_ZOOM);
        assert!((map.viewport().center.lat - 10.0).abs() < 1e-9);
        assert!((map.viewport().center.lng - 20.0).abs() < 1e-9);
        assert!(map.visible_bounds().contains(p));
    }

    #[test]
    fn polar_station_stays_in_view() {
        let pole = LatLng::new(-89.9289, 144.4382);
        let mut map = MapView::new(MAP_CONTAINER_ID);
        map.fit_bounds(&LatLngBounds::new(pole, pole));
        assert!(map.visible_bounds().contains(pole));

        let anmo = LatLng::new(34.9459, -106.4572);
        let mut map = MapView::new(MAP_CONTAINER_ID);
        map.fit_bounds(&LatLngBounds::from_points([pole, anmo]).unwrap());
        let visible = map.visible_bounds();
        assert!(visible.contains(pole), "pole outside {:?}", visible);
        assert!(visible.contains(anmo), "ANMO outside {:?}", visible);
    }

    #[test]
    fn mid_latitude_window_stops_short_of_the_poles() {
        let mut map = MapView::new(MAP_CONTAINER_ID);
        let bounds = LatLngBounds::new(LatLng::new(46.0, 7.0), LatLng::new(46.5, 7.8));
        map.fit_bounds(&bounds);
        let visible = map.visible_bounds();
        assert!(visible.north_east().lat < 90.0);
        assert!(visible.south_west().lat > -90.0);
    }

    #[test]
    fn smaller_container_fits_at_lower_zoom() {
        let bounds = LatLngBounds::new(LatLng::new(-41.3, -0.1), LatLng::new(51.5, 174.8));
        let mut large = MapView::new(MAP_CONTAINER_ID);
        large.fit_bounds(&bounds);
        let mut small = MapView::new(MAP_CONTAINER_ID).with_size(200.0, 150.0);
        small.fit_bounds(&bounds);

        assert_eq!(large.viewport().zoom, 2);
        assert_eq!(small.viewport().zoom, 0);
        assert!(small.visible_bounds().contains(LatLng::new(51.5, 174.8)));
    }

    #[test]
    fn attach_requires_container() {
        let page = r#"<html><body><div id="map"></div></body></html>"#;
        assert!(MapView::attach(page, MAP_CONTAINER_ID).is_ok());

        let err = MapView::attach("<html><body></body></html>", MAP_CONTAINER_ID).unwrap_err();
        assert!(matches!(err, Error::ContainerMissing(id) if id == "map"));
    }
}
