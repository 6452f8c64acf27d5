//! Parsing for GraphHopper's `/spt` shortest-path-tree CSV responses.
//!
//! The endpoint streams one row per reachable network node with a
//! `longitude,latitude,time,distance` header. An unexpected body shape is a
//! normal "no data" signal, mirroring how the engine treats empty rings;
//! errors are reserved for rows that cannot be decoded at all.

use meander_core::{Point, RingPoint};

/// Prefix every well-formed `/spt` response starts with.
const EXPECTED_HEADER_PREFIX: &str = "longitude,latitude";

/// Parse an `/spt` CSV body into reachable ring points.
///
/// Returns an empty set for empty bodies, unexpected headers, or a header
/// missing the required columns. Rows with unparseable numbers are dropped
/// individually, matching the endpoint's occasional partial rows.
pub(crate) fn parse_spt(body: &str) -> Vec<RingPoint> {
    let body = body.trim();
    let mut lines = body.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    if !header.starts_with(EXPECTED_HEADER_PREFIX) {
        log::warn!("unexpected /spt response header: {header:?}");
        return Vec::new();
    }

    let columns: Vec<&str> = header.split(',').collect();
    let Some(indices) = ColumnIndices::from_columns(&columns) else {
        log::warn!("/spt header misses a required column: {header:?}");
        return Vec::new();
    };

    lines
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| indices.parse_row(line))
        .collect()
}

/// Positions of the required columns within an `/spt` header.
struct ColumnIndices {
    longitude: usize,
    latitude: usize,
    distance: usize,
}

impl ColumnIndices {
    fn from_columns(columns: &[&str]) -> Option<Self> {
        let position = |name: &str| columns.iter().position(|column| column.trim() == name);
        Some(Self {
            longitude: position("longitude")?,
            latitude: position("latitude")?,
            distance: position("distance")?,
        })
    }

    fn parse_row(&self, line: &str) -> Option<RingPoint> {
        let fields: Vec<&str> = line.split(',').collect();
        let number = |index: usize| -> Option<f64> {
            fields.get(index).and_then(|field| field.trim().parse().ok())
        };
        let longitude = number(self.longitude)?;
        let latitude = number(self.latitude)?;
        let distance_m = number(self.distance)?;
        Some(RingPoint::new(Point::new(latitude, longitude), distance_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_well_formed_rows() {
        let body = "longitude,latitude,time,distance\n\
                    -2.0786,51.8940,0,0\n\
                    -2.0801,51.8952,95000,1843.2\n\
                    -2.0695,51.9011,120000,2412.7\n";
        let points = parse_spt(body);
        assert_eq!(points.len(), 3);
        assert!((points[1].point.lat - 51.8952).abs() < 1e-9);
        assert!((points[1].point.lon - -2.0801).abs() < 1e-9);
        assert!((points[1].distance_m - 1843.2).abs() < 1e-9);
    }

    #[rstest]
    #[case("")]
    #[case("   \n  ")]
    #[case("<html>502 Bad Gateway</html>")]
    #[case("time,distance\n0,0")]
    fn unexpected_bodies_yield_empty_sets(#[case] body: &str) {
        assert!(parse_spt(body).is_empty());
    }

    #[test]
    fn header_only_bodies_yield_empty_sets() {
        assert!(parse_spt("longitude,latitude,time,distance\n").is_empty());
    }

    #[test]
    fn partial_rows_are_dropped_individually() {
        let body = "longitude,latitude,time,distance\n\
                    -2.0786,51.8940,0,0\n\
                    -2.0801,,95000,\n\
                    not,a,number,row\n\
                    -2.0695,51.9011,120000,2412.7\n";
        let points = parse_spt(body);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn missing_distance_column_yields_empty_set() {
        let body = "longitude,latitude,time\n-2.0786,51.8940,0\n";
        assert!(parse_spt(body).is_empty());
    }
}
