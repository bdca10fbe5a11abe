use crate::geometry::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

/// Double dispatch over the geometry kinds.
///
/// Implementors handle the recursion into members of collections themselves, so they can keep
/// per-level state such as whether a header has already been written.
pub trait GeometryVisitor {
    type Error;

    fn visit_point(&mut self, geom: &Point) -> Result<(), Self::Error>;

    fn visit_line_string(&mut self, geom: &LineString) -> Result<(), Self::Error>;

    fn visit_linear_ring(&mut self, geom: &LinearRing) -> Result<(), Self::Error>;

    fn visit_polygon(&mut self, geom: &Polygon) -> Result<(), Self::Error>;

    fn visit_multi_point(&mut self, geom: &MultiPoint) -> Result<(), Self::Error>;

    fn visit_multi_line_string(&mut self, geom: &MultiLineString) -> Result<(), Self::Error>;

    fn visit_multi_polygon(&mut self, geom: &MultiPolygon) -> Result<(), Self::Error>;

    fn visit_geometry_collection(&mut self, geom: &GeometryCollection) -> Result<(), Self::Error>;
}

impl Geometry {
    /// Dispatch to the `visit_*` method matching this geometry's kind.
    pub fn accept<V: GeometryVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Geometry::Point(g) => visitor.visit_point(g),
            Geometry::LineString(g) => visitor.visit_line_string(g),
            Geometry::LinearRing(g) => visitor.visit_linear_ring(g),
            Geometry::Polygon(g) => visitor.visit_polygon(g),
            Geometry::MultiPoint(g) => visitor.visit_multi_point(g),
            Geometry::MultiLineString(g) => visitor.visit_multi_line_string(g),
            Geometry::MultiPolygon(g) => visitor.visit_multi_polygon(g),
            Geometry::GeometryCollection(g) => visitor.visit_geometry_collection(g),
        }
    }
}
