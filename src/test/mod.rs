//! Shared geometry fixtures for unit tests.

use crate::crs::Crs;
use crate::geometry::{Dimension, Geometry, GeometryType, Position};

pub(crate) mod linestring;
pub(crate) mod polygon;

pub(crate) const DIMENSIONS: [Dimension; 4] = [
    Dimension::XY,
    Dimension::XYZ,
    Dimension::XYM,
    Dimension::XYZM,
];

/// A position of dimension `dim` with components `base`, `base + 1`, ...
pub(crate) fn pos(dim: Dimension, base: f64) -> Position {
    let coords = [base, base + 1., base + 2., base + 3.];
    Position::from_slice(dim, &coords[..dim.size()]).unwrap()
}

/// One geometry of every kind in `crs`, plus an empty one of every kind.
pub(crate) fn geometries(crs: Crs) -> Vec<Geometry> {
    let mut geoms: Vec<Geometry> = vec![
        point::point(crs, 1.5).into(),
        linestring::line_string(crs, 0.).into(),
        linestring::linear_ring(crs).into(),
        polygon::polygon(crs).into(),
        multipoint::multi_point(crs).into(),
        multilinestring::multi_line_string(crs).into(),
        multipolygon::multi_polygon(crs).into(),
        geometrycollection::geometry_collection(crs).into(),
    ];
    for geometry_type in [
        GeometryType::Point,
        GeometryType::LineString,
        GeometryType::LinearRing,
        GeometryType::Polygon,
        GeometryType::MultiPoint,
        GeometryType::MultiLineString,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
    ] {
        geoms.push(Geometry::empty(geometry_type, crs));
    }
    geoms
}

/// [`geometries`] in every dimension, with and without an SRID.
pub(crate) fn all_geometries() -> Vec<Geometry> {
    let mut geoms = vec![];
    for dim in DIMENSIONS {
        for srid in [0, 4326] {
            geoms.extend(geometries(Crs::from_srid(srid).with_dimension(dim)));
        }
    }
    geoms
}
