//! Seismic station map: station data generation from an FDSN server, the
//! Leaflet host page, and an in-process model of the page's map.

pub mod error;
pub mod fdsn;
pub mod generate;
pub mod geo;
pub mod inventory;
pub mod loader;
pub mod logging;
pub mod map;
pub mod page;
pub mod station;

pub use error::{Error, Result};
pub use map::MapView;
pub use station::Station;
