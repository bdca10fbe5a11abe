//! Decoding of WKB records.

use crate::crs::{resolve_crs, Crs};
use crate::dialect::{Dialect, SridPolicy, TypeCode};
use crate::error::{GeoWkxError, Result};
use crate::geometry::{
    Geometry, GeometryCollection, GeometryType, LineString, LinearRing, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, Position, PositionSequence, PositionSequenceBuilder,
};
use crate::io::wkb::buffer::ByteBuffer;
use crate::io::wkb::common::Endianness;
use crate::io::MAX_NESTING_DEPTH;

/// Smallest possible nested record: byte order and type code.
const HEADER_BYTES: usize = 1 + 4;

/// Reads one geometry from a [`ByteBuffer`] according to a [`Dialect`].
pub struct WkbReader<'a> {
    buffer: ByteBuffer,
    dialect: &'a Dialect,
    crs: Option<&'a Crs>,
    depth: usize,
}

impl<'a> WkbReader<'a> {
    /// With `crs`, the geometry is placed in that CRS after checking it against the SRID and
    /// dimension found in the record.
    pub fn new(buffer: ByteBuffer, dialect: &'a Dialect, crs: Option<&'a Crs>) -> Self {
        Self {
            buffer,
            dialect,
            crs,
            depth: 0,
        }
    }

    /// Decode the record. Every byte of the buffer must belong to it.
    pub fn read(mut self) -> Result<Geometry> {
        let geometry = self.read_geometry(None)?;
        if self.buffer.has_remaining() {
            return Err(GeoWkxError::MalformedWkb(format!(
                "{} trailing bytes after {}",
                self.buffer.remaining(),
                geometry.geometry_type()
            )));
        }
        Ok(geometry)
    }

    fn read_header(&mut self) -> Result<TypeCode> {
        let byte_order = Endianness::try_from(self.buffer.get()?)?;
        self.buffer.set_byte_order(byte_order);
        let code = self.buffer.get_uint()?;
        self.dialect.parse_type(code)
    }

    fn read_srid(&mut self) -> Result<i32> {
        let srid = self.buffer.get_uint()?;
        i32::try_from(srid).map_err(|_| GeoWkxError::MalformedWkb(format!("invalid SRID {srid}")))
    }

    /// Read the count of a list whose items take at least `min_item_bytes` each.
    fn read_count(&mut self, min_item_bytes: usize) -> Result<usize> {
        let count = self.buffer.get_uint()? as usize;
        if count.saturating_mul(min_item_bytes) > self.buffer.remaining() {
            return Err(GeoWkxError::MalformedWkb(format!(
                "count {count} exceeds the {} remaining bytes",
                self.buffer.remaining()
            )));
        }
        Ok(count)
    }

    /// Read a record, including its header. `parent` is the CRS of the enclosing collection.
    fn read_geometry(&mut self, parent: Option<&Crs>) -> Result<Geometry> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(GeoWkxError::MalformedWkb(format!(
                "records nested deeper than {MAX_NESTING_DEPTH} levels at offset {}",
                self.buffer.position()
            )));
        }
        self.depth += 1;
        let geometry = self.read_record(parent);
        self.depth -= 1;
        geometry
    }

    fn read_record(&mut self, parent: Option<&Crs>) -> Result<Geometry> {
        let type_code = self.read_header()?;
        let crs = match parent {
            None => {
                let srid = if type_code.has_srid || self.dialect.srid_policy == SridPolicy::Always
                {
                    self.read_srid()?
                } else {
                    0
                };
                resolve_crs(self.crs, srid, Some(type_code.dimension))?
            }
            Some(parent) => {
                if type_code.has_srid {
                    self.read_srid()?;
                }
                if type_code.dimension != parent.dimension() {
                    return Err(GeoWkxError::MalformedWkb(format!(
                        "{} member in {} collection",
                        type_code.dimension,
                        parent.dimension()
                    )));
                }
                *parent
            }
        };
        log::trace!(
            "WKB {} {} at offset {}",
            type_code.geometry_type(),
            type_code.dimension,
            self.buffer.position()
        );

        let geometry: Geometry = match type_code.geometry_type() {
            GeometryType::Point => self.read_point(crs)?.into(),
            GeometryType::LineString | GeometryType::LinearRing => {
                LineString::new(self.read_positions(&crs)?, crs)?.into()
            }
            GeometryType::Polygon => self.read_polygon(crs)?.into(),
            GeometryType::MultiPoint => {
                let count = self.read_count(HEADER_BYTES)?;
                let mut points = Vec::with_capacity(count);
                for _ in 0..count {
                    points.push(self.read_multi_point_member(&crs)?);
                }
                MultiPoint::new(points, crs)?.into()
            }
            GeometryType::MultiLineString => {
                let count = self.read_count(HEADER_BYTES)?;
                let mut lines = Vec::with_capacity(count);
                for _ in 0..count {
                    match self.read_geometry(Some(&crs))? {
                        Geometry::LineString(line) => lines.push(line),
                        other => return Err(unexpected_member(GeometryType::LineString, &other)),
                    }
                }
                MultiLineString::new(lines, crs)?.into()
            }
            GeometryType::MultiPolygon => {
                let count = self.read_count(HEADER_BYTES)?;
                let mut polygons = Vec::with_capacity(count);
                for _ in 0..count {
                    match self.read_geometry(Some(&crs))? {
                        Geometry::Polygon(polygon) => polygons.push(polygon),
                        other => return Err(unexpected_member(GeometryType::Polygon, &other)),
                    }
                }
                MultiPolygon::new(polygons, crs)?.into()
            }
            GeometryType::GeometryCollection => {
                let count = self.read_count(HEADER_BYTES)?;
                let mut geometries = Vec::with_capacity(count);
                for _ in 0..count {
                    geometries.push(self.read_geometry(Some(&crs))?);
                }
                GeometryCollection::new(geometries, crs)?.into()
            }
        };
        Ok(geometry)
    }

    /// A point whose coordinates are all NaN is the empty point.
    fn read_point(&mut self, crs: Crs) -> Result<Point> {
        let dim = crs.dimension();
        let mut coords = [0.; 4];
        self.buffer.get_doubles(&mut coords[..dim.size()])?;
        let position = Position::from_slice(dim, &coords[..dim.size()])?;
        if position.is_nan() {
            Ok(Point::empty(crs))
        } else {
            Point::new(position, crs)
        }
    }

    fn read_positions(&mut self, crs: &Crs) -> Result<PositionSequence> {
        let dim = crs.dimension();
        let count = self.read_count(dim.size() * 8)?;
        let mut builder = PositionSequenceBuilder::with_capacity(dim, count);
        let mut coords = [0.; 4];
        for _ in 0..count {
            self.buffer.get_doubles(&mut coords[..dim.size()])?;
            for value in &coords[..dim.size()] {
                builder.push_coord(*value);
            }
        }
        Ok(builder.finish())
    }

    /// Polygon rings carry no header of their own.
    fn read_polygon(&mut self, crs: Crs) -> Result<Polygon> {
        let count = self.read_count(4)?;
        let mut rings = Vec::with_capacity(count);
        for _ in 0..count {
            rings.push(LinearRing::new(self.read_positions(&crs)?, crs)?);
        }
        Polygon::new(rings, crs)
    }

    /// An empty geometry collection stands for an empty point where NaN coordinates are not used.
    fn read_multi_point_member(&mut self, crs: &Crs) -> Result<Point> {
        match self.read_geometry(Some(crs))? {
            Geometry::Point(point) => Ok(point),
            Geometry::GeometryCollection(gc) if gc.is_empty() => Ok(Point::empty(*crs)),
            other => Err(unexpected_member(GeometryType::Point, &other)),
        }
    }
}

fn unexpected_member(expected: GeometryType, found: &Geometry) -> GeoWkxError {
    GeoWkxError::MalformedWkb(format!(
        "expected {expected} member, found {}",
        found.geometry_type()
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dialect::{HANA, POSTGIS_EWKB_1, SFA_1_1_0, SFA_1_2_1};
    use crate::geometry::Dimension;

    fn read(hex: &str, dialect: &Dialect) -> Result<Geometry> {
        WkbReader::new(ByteBuffer::from_hex(hex).unwrap(), dialect, None).read()
    }

    #[test]
    fn ewkb_point_with_srid() {
        let geom = read(
            "0101000020E6100000000000000000F03F0000000000000040",
            &POSTGIS_EWKB_1,
        )
        .unwrap();
        assert_eq!(geom.srid(), 4326);
        let Geometry::Point(point) = geom else {
            panic!("expected point")
        };
        assert_eq!(point.position(), Some(&Position::xy(1., 2.)));
    }

    #[test]
    fn big_endian_iso_point_z() {
        // POINT Z (1 2 3), type 1001
        let geom = read(
            "00000003E93FF000000000000040000000000000004008000000000000",
            &SFA_1_2_1,
        )
        .unwrap();
        assert_eq!(geom.dimension(), Dimension::XYZ);
    }

    #[test]
    fn hana_reads_srid_without_flag() {
        // POINT(1 2) with SRID 0 and no SRID flag
        let geom = read(
            "010100000000000000000000000000F03F0000000000000040",
            &HANA,
        )
        .unwrap();
        assert_eq!(geom.srid(), 0);
    }

    #[test]
    fn nan_point_is_empty() {
        let geom = read(
            "0101000000000000000000F87F000000000000F87F",
            &SFA_1_2_1,
        )
        .unwrap();
        assert!(geom.is_empty());
        assert_eq!(geom.geometry_type(), GeometryType::Point);
    }

    #[test]
    fn truncated() {
        let err = read("0101000000000000000000F03F", &SFA_1_1_0).unwrap_err();
        assert!(matches!(err, GeoWkxError::MalformedWkb(_)), "{err}");
    }

    #[test]
    fn trailing_bytes() {
        let err = read(
            "0101000000000000000000F03F000000000000004000",
            &SFA_1_1_0,
        )
        .unwrap_err();
        assert!(matches!(err, GeoWkxError::MalformedWkb(_)));
    }

    #[test]
    fn huge_count_is_rejected_before_allocating() {
        // LINESTRING with 0xFFFFFFFF points
        let err = read("0102000000FFFFFFFF", &SFA_1_1_0).unwrap_err();
        assert!(matches!(err, GeoWkxError::MalformedWkb(_)));
    }

    /// `levels` collections of one member each around `POINT(1 2)`.
    fn nested_collections(levels: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(levels * 9 + 21);
        for _ in 0..levels {
            bytes.extend_from_slice(&[1, 7, 0, 0, 0, 1, 0, 0, 0]);
        }
        bytes.extend_from_slice(&[1, 1, 0, 0, 0]);
        bytes.extend_from_slice(&1f64.to_le_bytes());
        bytes.extend_from_slice(&2f64.to_le_bytes());
        bytes
    }

    #[test]
    fn nesting_is_bounded() {
        let read_bytes = |bytes: Vec<u8>| {
            WkbReader::new(ByteBuffer::from_bytes(bytes), &SFA_1_2_1, None).read()
        };

        let geom = read_bytes(nested_collections(MAX_NESTING_DEPTH - 1)).unwrap();
        assert_eq!(geom.geometry_type(), GeometryType::GeometryCollection);

        let err = read_bytes(nested_collections(MAX_NESTING_DEPTH)).unwrap_err();
        assert!(matches!(err, GeoWkxError::MalformedWkb(_)), "{err}");

        let err = read_bytes(nested_collections(300_000)).unwrap_err();
        assert!(matches!(err, GeoWkxError::MalformedWkb(_)), "{err}");
    }

    #[test]
    fn invalid_byte_order() {
        assert!(read("0201000000", &SFA_1_1_0).is_err());
    }

    #[test]
    fn empty_collection_in_multi_point_is_empty_point() {
        // MULTIPOINT(EMPTY) with the empty point written as an empty collection
        let geom = read("010400000001000000010700000000000000", &POSTGIS_EWKB_1).unwrap();
        let Geometry::MultiPoint(mp) = geom else {
            panic!("expected multi point")
        };
        assert_eq!(mp.points().len(), 1);
        assert!(mp.points()[0].is_empty());
    }

    #[test]
    fn wrong_member_type() {
        // MULTILINESTRING containing a POINT
        let err = read(
            "010500000001000000010100000000000000000000000000000000000000",
            &SFA_1_1_0,
        )
        .unwrap_err();
        assert!(matches!(err, GeoWkxError::MalformedWkb(_)));
    }

    #[test]
    fn supplied_crs_must_match() {
        let crs = Crs::from_srid(3857);
        let buffer =
            ByteBuffer::from_hex("0101000020E6100000000000000000F03F0000000000000040").unwrap();
        let err = WkbReader::new(buffer, &POSTGIS_EWKB_1, Some(&crs))
            .read()
            .unwrap_err();
        assert!(matches!(err, GeoWkxError::CrsMismatch(_)));
    }
}
