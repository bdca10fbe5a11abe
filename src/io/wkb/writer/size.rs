use crate::dialect::Dialect;
use crate::geometry::{Geometry, Point, Polygon, PositionSequence};

/// Byte order and type code.
const HEADER_BYTES: usize = 1 + 4;

/// The exact number of bytes [`to_wkb`][crate::io::wkb::to_wkb] writes for `geom`.
pub fn wkb_size(geom: &Geometry, dialect: &Dialect) -> usize {
    let srid = if dialect.srid_policy.writes(geom.srid()) {
        4
    } else {
        0
    };
    HEADER_BYTES + srid + body_size(geom, dialect)
}

fn body_size(geom: &Geometry, dialect: &Dialect) -> usize {
    let coord_size = dialect.effective_dimension(geom.dimension()).size() * 8;
    match geom {
        Geometry::Point(point) => point_size(point, coord_size, dialect),
        Geometry::LineString(line) => positions_size(line.positions(), coord_size),
        Geometry::LinearRing(ring) => positions_size(ring.positions(), coord_size),
        Geometry::Polygon(polygon) => polygon_size(polygon, coord_size),
        Geometry::MultiPoint(mp) => {
            4 + mp
                .points()
                .iter()
                .map(|point| HEADER_BYTES + point_size(point, coord_size, dialect))
                .sum::<usize>()
        }
        Geometry::MultiLineString(mls) => {
            4 + mls
                .lines()
                .iter()
                .map(|line| HEADER_BYTES + positions_size(line.positions(), coord_size))
                .sum::<usize>()
        }
        Geometry::MultiPolygon(mp) => {
            4 + mp
                .polygons()
                .iter()
                .map(|polygon| HEADER_BYTES + polygon_size(polygon, coord_size))
                .sum::<usize>()
        }
        Geometry::GeometryCollection(gc) => {
            4 + gc
                .geometries()
                .iter()
                .map(|member| HEADER_BYTES + body_size(member, dialect))
                .sum::<usize>()
        }
    }
}

fn point_size(point: &Point, coord_size: usize, dialect: &Dialect) -> usize {
    if point.is_empty() && !dialect.empty_point_as_nan() {
        // an empty geometry collection: numGeometries only
        4
    } else {
        coord_size
    }
}

fn positions_size(positions: &PositionSequence, coord_size: usize) -> usize {
    // - 4: numPoints
    // - coord_size per position
    4 + positions.len() * coord_size
}

fn polygon_size(polygon: &Polygon, coord_size: usize) -> usize {
    // - 4: numRings
    4 + polygon
        .rings()
        .iter()
        .map(|ring| positions_size(ring.positions(), coord_size))
        .sum::<usize>()
}
