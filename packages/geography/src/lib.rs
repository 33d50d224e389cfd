#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geodesic distance between map selections.
//!
//! Distances are computed on the WGS84 ellipsoid with the `geo` crate's
//! [`Geodesic`] metric (Karney's algorithm), not a flat-plane or spherical
//! approximation. [`PointBuffer`] holds a session's two most recent map
//! clicks.

pub use carbon_tracker_geography_models::{GeoError, GeoPoint};

use geo::{Distance, Geodesic, Point};

/// Maximum number of points a [`PointBuffer`] retains.
pub const POINT_BUFFER_CAPACITY: usize = 2;

/// Geodesic distance between two points in kilometres.
#[must_use]
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let origin = Point::new(a.longitude, a.latitude);
    let destination = Point::new(b.longitude, b.latitude);
    Geodesic.distance(origin, destination) / 1000.0
}

/// The most recent map selections, oldest first.
///
/// Recording a third point drops the oldest so that at most
/// [`POINT_BUFFER_CAPACITY`] points are ever held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuffer {
    points: Vec<GeoPoint>,
}

impl PointBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Appends a point, evicting the oldest when over capacity.
    pub fn record_click(&mut self, point: GeoPoint) {
        self.points.push(point);
        if self.points.len() > POINT_BUFFER_CAPACITY {
            let evicted = self.points.remove(0);
            log::debug!("Point buffer full, evicted {evicted}");
        }
    }

    /// Distance between the two held points, or `None` unless exactly two
    /// are present.
    #[must_use]
    pub fn distance_km(&self) -> Option<f64> {
        match self.points.as_slice() {
            [a, b] => Some(distance_km(a, b)),
            _ => None,
        }
    }

    /// Held points, oldest first.
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Drops every point.
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Number of held points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no points are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
