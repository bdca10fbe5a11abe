//! The in-memory geometry model read and written by the codecs.

pub use dimension::Dimension;
pub use position::{Position, PositionSequence, PositionSequenceBuilder};
pub use types::{
    Geometry, GeometryCollection, GeometryType, LineString, LinearRing, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};
pub use visitor::GeometryVisitor;

mod dimension;
mod position;
mod types;
mod visitor;
