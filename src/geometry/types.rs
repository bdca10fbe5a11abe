use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::error::{GeoWkxError, Result};
use crate::geometry::{Dimension, Position, PositionSequence};

/// The kinds of geometry the codecs understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    /// The upper-case OGC name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::LinearRing => "LINEARRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn check_dimension(crs: &Crs, dim: Dimension) -> Result<()> {
    if crs.dimension() != dim {
        return Err(GeoWkxError::CrsMismatch(format!(
            "{dim} coordinates in a {} reference system",
            crs.dimension()
        )));
    }
    Ok(())
}

fn check_member_crs(crs: &Crs, member: &Crs) -> Result<()> {
    if crs != member {
        return Err(GeoWkxError::CrsMismatch(format!(
            "member with SRID {} ({}) in collection with SRID {} ({})",
            member.srid(),
            member.dimension(),
            crs.srid(),
            crs.dimension()
        )));
    }
    Ok(())
}

/// A single position, or the empty point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    position: Option<Position>,
    crs: Crs,
}

impl Point {
    pub fn new(position: Position, crs: Crs) -> Result<Self> {
        check_dimension(&crs, position.dimension())?;
        Ok(Self {
            position: Some(position),
            crs,
        })
    }

    pub fn empty(crs: Crs) -> Self {
        Self {
            position: None,
            crs,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
    }
}

/// A curve with linear interpolation between positions.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    positions: PositionSequence,
    crs: Crs,
}

impl LineString {
    pub fn new(positions: PositionSequence, crs: Crs) -> Result<Self> {
        check_dimension(&crs, positions.dimension())?;
        Ok(Self { positions, crs })
    }

    pub fn empty(crs: Crs) -> Self {
        Self {
            positions: PositionSequence::empty(crs.dimension()),
            crs,
        }
    }

    pub fn positions(&self) -> &PositionSequence {
        &self.positions
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A closed line string used as polygon boundary.
///
/// Closure is not checked; validity is the concern of geometry algorithms.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    positions: PositionSequence,
    crs: Crs,
}

impl LinearRing {
    pub fn new(positions: PositionSequence, crs: Crs) -> Result<Self> {
        check_dimension(&crs, positions.dimension())?;
        Ok(Self { positions, crs })
    }

    pub fn empty(crs: Crs) -> Self {
        Self {
            positions: PositionSequence::empty(crs.dimension()),
            crs,
        }
    }

    pub fn positions(&self) -> &PositionSequence {
        &self.positions
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// An exterior ring followed by any number of interior rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    rings: Vec<LinearRing>,
    crs: Crs,
}

impl Polygon {
    /// Build from rings, exterior first.
    pub fn new(rings: Vec<LinearRing>, crs: Crs) -> Result<Self> {
        for ring in &rings {
            check_member_crs(&crs, ring.crs())?;
        }
        Ok(Self { rings, crs })
    }

    pub fn empty(crs: Crs) -> Self {
        Self { rings: vec![], crs }
    }

    pub fn exterior(&self) -> Option<&LinearRing> {
        self.rings.first()
    }

    pub fn interiors(&self) -> &[LinearRing] {
        self.rings.get(1..).unwrap_or_default()
    }

    /// All rings, exterior first.
    pub fn rings(&self) -> &[LinearRing] {
        &self.rings
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

macro_rules! homogeneous_collection {
    ($(#[$meta:meta])* $name:ident, $member:ty, $field:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $field: Vec<$member>,
            crs: Crs,
        }

        impl $name {
            pub fn new($field: Vec<$member>, crs: Crs) -> Result<Self> {
                for member in &$field {
                    check_member_crs(&crs, member.crs())?;
                }
                Ok(Self { $field, crs })
            }

            pub fn empty(crs: Crs) -> Self {
                Self { $field: vec![], crs }
            }

            pub fn $field(&self) -> &[$member] {
                &self.$field
            }

            pub fn crs(&self) -> &Crs {
                &self.crs
            }

            pub fn is_empty(&self) -> bool {
                self.$field.is_empty()
            }
        }
    };
}

homogeneous_collection!(
    /// A collection of points.
    MultiPoint,
    Point,
    points
);
homogeneous_collection!(
    /// A collection of line strings.
    MultiLineString,
    LineString,
    lines
);
homogeneous_collection!(
    /// A collection of polygons.
    MultiPolygon,
    Polygon,
    polygons
);
homogeneous_collection!(
    /// A heterogeneous collection of geometries.
    GeometryCollection,
    Geometry,
    geometries
);

/// Any geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::LinearRing(_) => GeometryType::LinearRing,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn crs(&self) -> &Crs {
        match self {
            Geometry::Point(g) => g.crs(),
            Geometry::LineString(g) => g.crs(),
            Geometry::LinearRing(g) => g.crs(),
            Geometry::Polygon(g) => g.crs(),
            Geometry::MultiPoint(g) => g.crs(),
            Geometry::MultiLineString(g) => g.crs(),
            Geometry::MultiPolygon(g) => g.crs(),
            Geometry::GeometryCollection(g) => g.crs(),
        }
    }

    pub fn srid(&self) -> i32 {
        self.crs().srid()
    }

    pub fn dimension(&self) -> Dimension {
        self.crs().dimension()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(g) => g.is_empty(),
            Geometry::LineString(g) => g.is_empty(),
            Geometry::LinearRing(g) => g.is_empty(),
            Geometry::Polygon(g) => g.is_empty(),
            Geometry::MultiPoint(g) => g.is_empty(),
            Geometry::MultiLineString(g) => g.is_empty(),
            Geometry::MultiPolygon(g) => g.is_empty(),
            Geometry::GeometryCollection(g) => g.is_empty(),
        }
    }

    /// The empty geometry of the given type.
    pub fn empty(geometry_type: GeometryType, crs: Crs) -> Self {
        match geometry_type {
            GeometryType::Point => Point::empty(crs).into(),
            GeometryType::LineString => LineString::empty(crs).into(),
            GeometryType::LinearRing => LinearRing::empty(crs).into(),
            GeometryType::Polygon => Polygon::empty(crs).into(),
            GeometryType::MultiPoint => MultiPoint::empty(crs).into(),
            GeometryType::MultiLineString => MultiLineString::empty(crs).into(),
            GeometryType::MultiPolygon => MultiPolygon::empty(crs).into(),
            GeometryType::GeometryCollection => GeometryCollection::empty(crs).into(),
        }
    }
}

macro_rules! impl_into_geometry {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(value: $variant) -> Self {
                    Geometry::$variant(value)
                }
            }
        )*
    };
}

impl_into_geometry!(
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn point_dimension_must_match_crs() {
        let crs = Crs::from_srid(4326);
        assert!(Point::new(Position::xy(1., 2.), crs).is_ok());
        assert!(matches!(
            Point::new(Position::xyz(1., 2., 3.), crs),
            Err(GeoWkxError::CrsMismatch(_))
        ));
    }

    #[test]
    fn collection_members_share_crs() {
        let crs = Crs::from_srid(4326);
        let other = Crs::from_srid(3857);
        let p = Point::new(Position::xy(1., 2.), other).unwrap();
        assert!(MultiPoint::new(vec![p.clone()], crs).is_err());
        assert!(MultiPoint::new(vec![p], other).is_ok());
    }

    #[test]
    fn empty_geometries() {
        let crs = Crs::undefined(Dimension::XYM);
        for geometry_type in [
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::Polygon,
            GeometryType::GeometryCollection,
        ] {
            let geom = Geometry::empty(geometry_type, crs);
            assert!(geom.is_empty());
            assert_eq!(geom.geometry_type(), geometry_type);
            assert_eq!(geom.dimension(), Dimension::XYM);
        }
    }

    #[test]
    fn polygon_rings() {
        let crs = Crs::default();
        let ring = |offset: f64| {
            let seq = PositionSequence::from_positions(
                Dimension::XY,
                &[
                    Position::xy(offset, offset),
                    Position::xy(offset + 1., offset),
                    Position::xy(offset, offset + 1.),
                    Position::xy(offset, offset),
                ],
            )
            .unwrap();
            LinearRing::new(seq, crs).unwrap()
        };
        let polygon = Polygon::new(vec![ring(0.), ring(0.2)], crs).unwrap();
        assert_eq!(polygon.exterior(), Some(&ring(0.)));
        assert_eq!(polygon.interiors().len(), 1);
        assert!(Polygon::empty(crs).interiors().is_empty());
    }
}
