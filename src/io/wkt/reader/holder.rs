//! Intermediate results of the WKT parser.
//!
//! The CRS of a geometry is only known once the whole input has been read (the dimension may be
//! fixed by the last position sequence), so the parser collects raw positions first and builds
//! the geometry afterwards.

use crate::crs::Crs;
use crate::error::Result;
use crate::geometry::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Position, PositionSequence,
};

/// A point, or `EMPTY`.
#[derive(Debug, Clone, Default)]
pub(crate) struct PointHolder(pub Option<Position>);

impl PointHolder {
    pub fn into_point(self, crs: &Crs) -> Result<Point> {
        match self.0 {
            Some(position) => Point::new(position, *crs),
            None => Ok(Point::empty(*crs)),
        }
    }
}

/// The positions of a line string or ring, or `EMPTY`.
#[derive(Debug, Clone, Default)]
pub(crate) struct LinearPositionsHolder(pub Option<PositionSequence>);

impl LinearPositionsHolder {
    pub fn into_line_string(self, crs: &Crs) -> Result<LineString> {
        match self.0 {
            Some(positions) => LineString::new(positions, *crs),
            None => Ok(LineString::empty(*crs)),
        }
    }

    pub fn into_linear_ring(self, crs: &Crs) -> Result<LinearRing> {
        match self.0 {
            Some(positions) => LinearRing::new(positions, *crs),
            None => Ok(LinearRing::empty(*crs)),
        }
    }
}

/// The rings of a polygon, or the lines of a multi line string.
#[derive(Debug, Clone, Default)]
pub(crate) struct LinearPositionsListHolder(pub Vec<LinearPositionsHolder>);

impl LinearPositionsListHolder {
    pub fn into_polygon(self, crs: &Crs) -> Result<Polygon> {
        let rings = self
            .0
            .into_iter()
            .map(|ring| ring.into_linear_ring(crs))
            .collect::<Result<Vec<_>>>()?;
        Polygon::new(rings, *crs)
    }

    pub fn into_multi_line_string(self, crs: &Crs) -> Result<MultiLineString> {
        let lines = self
            .0
            .into_iter()
            .map(|line| line.into_line_string(crs))
            .collect::<Result<Vec<_>>>()?;
        MultiLineString::new(lines, *crs)
    }
}

/// The polygons of a multi polygon.
#[derive(Debug, Clone, Default)]
pub(crate) struct PolygonListHolder(pub Vec<LinearPositionsListHolder>);

impl PolygonListHolder {
    pub fn into_multi_polygon(self, crs: &Crs) -> Result<MultiPolygon> {
        let polygons = self
            .0
            .into_iter()
            .map(|polygon| polygon.into_polygon(crs))
            .collect::<Result<Vec<_>>>()?;
        MultiPolygon::new(polygons, *crs)
    }
}

/// Any parsed geometry, before its CRS is known.
#[derive(Debug, Clone)]
pub(crate) enum GeometryHolder {
    Point(PointHolder),
    LineString(LinearPositionsHolder),
    LinearRing(LinearPositionsHolder),
    Polygon(LinearPositionsListHolder),
    MultiPoint(Vec<PointHolder>),
    MultiLineString(LinearPositionsListHolder),
    MultiPolygon(PolygonListHolder),
    GeometryCollection(Vec<GeometryHolder>),
}

impl GeometryHolder {
    /// Build the geometry, assigning `crs` to it and every member.
    pub fn into_geometry(self, crs: &Crs) -> Result<Geometry> {
        let geometry: Geometry = match self {
            GeometryHolder::Point(point) => point.into_point(crs)?.into(),
            GeometryHolder::LineString(line) => line.into_line_string(crs)?.into(),
            GeometryHolder::LinearRing(ring) => ring.into_linear_ring(crs)?.into(),
            GeometryHolder::Polygon(rings) => rings.into_polygon(crs)?.into(),
            GeometryHolder::MultiPoint(points) => {
                let points = points
                    .into_iter()
                    .map(|point| point.into_point(crs))
                    .collect::<Result<Vec<_>>>()?;
                MultiPoint::new(points, *crs)?.into()
            }
            GeometryHolder::MultiLineString(lines) => lines.into_multi_line_string(crs)?.into(),
            GeometryHolder::MultiPolygon(polygons) => polygons.into_multi_polygon(crs)?.into(),
            GeometryHolder::GeometryCollection(members) => {
                let geometries = members
                    .into_iter()
                    .map(|member| member.into_geometry(crs))
                    .collect::<Result<Vec<_>>>()?;
                GeometryCollection::new(geometries, *crs)?.into()
            }
        };
        Ok(geometry)
    }
}
