//! Encoding of geometries as WKB records.

use crate::crs::Crs;
use crate::dialect::Dialect;
use crate::error::{GeoWkxError, Result};
use crate::geometry::{
    Geometry, GeometryCollection, GeometryType, GeometryVisitor, LineString, LinearRing,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, PositionSequence,
};
use crate::io::wkb::buffer::ByteBuffer;
use crate::io::wkb::common::Endianness;

pub use size::wkb_size;

mod size;

/// Writes geometries into a pre-sized [`ByteBuffer`] according to a [`Dialect`].
///
/// The SRID, when the dialect embeds one, is written on the first record only.
pub struct WkbWriter<'a> {
    dialect: &'a Dialect,
    buffer: ByteBuffer,
    has_written_srid: bool,
}

impl<'a> WkbWriter<'a> {
    pub fn new(dialect: &'a Dialect, byte_order: Endianness, capacity: usize) -> Self {
        let mut buffer = ByteBuffer::allocate(capacity);
        buffer.set_byte_order(byte_order);
        Self {
            dialect,
            buffer,
            has_written_srid: false,
        }
    }

    /// The written bytes. Fails unless the buffer has been filled exactly.
    pub fn finish(self) -> Result<ByteBuffer> {
        if self.buffer.has_remaining() {
            return Err(GeoWkxError::ValueOutOfRange(format!(
                "wrote {} of {} pre-calculated bytes",
                self.buffer.position(),
                self.buffer.capacity()
            )));
        }
        Ok(self.buffer)
    }

    fn write_header(&mut self, geometry_type: GeometryType, crs: &Crs) -> Result<()> {
        let with_srid = !self.has_written_srid && self.dialect.srid_policy.writes(crs.srid());
        self.has_written_srid = true;
        let code = self
            .dialect
            .geometry_type_code(geometry_type, crs.dimension(), with_srid)?;
        self.buffer.put(self.buffer.byte_order().into())?;
        self.buffer.put_uint(code.into())?;
        if with_srid {
            self.buffer.put_int(crs.srid())?;
        }
        Ok(())
    }

    fn write_coords(&mut self, coords: &[f64]) -> Result<()> {
        let size = if self.dialect.limited_to_2d {
            2
        } else {
            coords.len()
        };
        for value in &coords[..size] {
            self.buffer.put_double(*value)?;
        }
        Ok(())
    }

    fn write_positions(&mut self, positions: &PositionSequence) -> Result<()> {
        self.buffer.put_uint(positions.len() as u64)?;
        for coords in positions.coord_slices() {
            self.write_coords(coords)?;
        }
        Ok(())
    }

    fn write_rings(&mut self, polygon: &Polygon) -> Result<()> {
        self.buffer.put_uint(polygon.rings().len() as u64)?;
        for ring in polygon.rings() {
            self.write_positions(ring.positions())?;
        }
        Ok(())
    }
}

impl<'a> GeometryVisitor for WkbWriter<'a> {
    type Error = GeoWkxError;

    fn visit_point(&mut self, geom: &Point) -> Result<()> {
        match geom.position() {
            Some(position) => {
                self.write_header(GeometryType::Point, geom.crs())?;
                self.write_coords(position.coords())
            }
            None if self.dialect.empty_point_as_nan() => {
                self.write_header(GeometryType::Point, geom.crs())?;
                let size = self.dialect.effective_dimension(geom.crs().dimension()).size();
                for _ in 0..size {
                    self.buffer.put_double(f64::NAN)?;
                }
                Ok(())
            }
            None => {
                self.write_header(GeometryType::GeometryCollection, geom.crs())?;
                self.buffer.put_uint(0)
            }
        }
    }

    fn visit_line_string(&mut self, geom: &LineString) -> Result<()> {
        self.write_header(GeometryType::LineString, geom.crs())?;
        self.write_positions(geom.positions())
    }

    fn visit_linear_ring(&mut self, geom: &LinearRing) -> Result<()> {
        self.write_header(GeometryType::LinearRing, geom.crs())?;
        self.write_positions(geom.positions())
    }

    fn visit_polygon(&mut self, geom: &Polygon) -> Result<()> {
        self.write_header(GeometryType::Polygon, geom.crs())?;
        self.write_rings(geom)
    }

    fn visit_multi_point(&mut self, geom: &MultiPoint) -> Result<()> {
        self.write_header(GeometryType::MultiPoint, geom.crs())?;
        self.buffer.put_uint(geom.points().len() as u64)?;
        for point in geom.points() {
            self.visit_point(point)?;
        }
        Ok(())
    }

    fn visit_multi_line_string(&mut self, geom: &MultiLineString) -> Result<()> {
        self.write_header(GeometryType::MultiLineString, geom.crs())?;
        self.buffer.put_uint(geom.lines().len() as u64)?;
        for line in geom.lines() {
            self.visit_line_string(line)?;
        }
        Ok(())
    }

    fn visit_multi_polygon(&mut self, geom: &MultiPolygon) -> Result<()> {
        self.write_header(GeometryType::MultiPolygon, geom.crs())?;
        self.buffer.put_uint(geom.polygons().len() as u64)?;
        for polygon in geom.polygons() {
            self.visit_polygon(polygon)?;
        }
        Ok(())
    }

    fn visit_geometry_collection(&mut self, geom: &GeometryCollection) -> Result<()> {
        self.write_header(GeometryType::GeometryCollection, geom.crs())?;
        self.buffer.put_uint(geom.geometries().len() as u64)?;
        for member in geom.geometries() {
            member.accept(self)?;
        }
        Ok(())
    }
}

/// Encode `geom` into a buffer of exactly [`wkb_size`] bytes.
pub(crate) fn write_geometry(
    geom: &Geometry,
    dialect: &Dialect,
    byte_order: Endianness,
) -> Result<ByteBuffer> {
    let mut writer = WkbWriter::new(dialect, byte_order, wkb_size(geom, dialect));
    geom.accept(&mut writer)?;
    writer.finish()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dialect::{DialectKind, HANA, MYSQL, POSTGIS_EWKB_1, POSTGIS_EWKB_2, SFA_1_2_1};
    use crate::geometry::Position;
    use crate::test::all_geometries;
    use crate::test::geometrycollection::gc_xyzm;
    use crate::test::linestring::ls_xyz;

    fn hex(geom: &Geometry, dialect: &Dialect, byte_order: Endianness) -> String {
        write_geometry(geom, dialect, byte_order).unwrap().to_hex()
    }

    #[test]
    fn ewkb_point_with_srid() {
        let point: Geometry = Point::new(Position::xy(1., 2.), Crs::from_srid(4326))
            .unwrap()
            .into();
        assert_eq!(
            hex(&point, &POSTGIS_EWKB_1, Endianness::LittleEndian),
            "0101000020E6100000000000000000F03F0000000000000040"
        );
    }

    #[test]
    fn hana_writes_undefined_srid() {
        let point: Geometry = Point::new(Position::xy(1., 2.), Crs::default())
            .unwrap()
            .into();
        assert_eq!(
            hex(&point, &HANA, Endianness::LittleEndian),
            "010100002000000000000000000000F03F0000000000000040"
        );
    }

    #[test]
    fn big_endian_iso() {
        let geom: Geometry = ls_xyz().into();
        assert_eq!(
            hex(&geom, &SFA_1_2_1, Endianness::BigEndian),
            "00000003EA00000002\
             000000000000000000000000000000003FF0000000000000\
             3FF00000000000003FF00000000000004000000000000000"
        );
    }

    #[test]
    fn empty_point_conventions() {
        let empty: Geometry = Point::empty(Crs::from_srid(4326)).into();
        // NaN coordinates
        assert_eq!(
            hex(&empty, &POSTGIS_EWKB_2, Endianness::LittleEndian),
            "0101000020E6100000000000000000F87F000000000000F87F"
        );
        // empty geometry collection
        assert_eq!(
            hex(&empty, &POSTGIS_EWKB_1, Endianness::LittleEndian),
            "0107000020E610000000000000"
        );
    }

    #[test]
    fn srid_only_on_outer_record() {
        let gc: Geometry = gc_xyzm().into();
        let bytes = write_geometry(&gc, &POSTGIS_EWKB_1, Endianness::LittleEndian).unwrap();
        let bytes = bytes.as_slice();
        // outer header: order, code with SRID flag, SRID
        assert_eq!(&bytes[1..5], &(0xE000_0007u32).to_le_bytes());
        assert_eq!(&bytes[5..9], &4326u32.to_le_bytes());
        // first member: no SRID flag
        assert_eq!(&bytes[14..18], &(0xC000_0001u32).to_le_bytes());
    }

    #[test]
    fn limited_to_2d() {
        let geom: Geometry = ls_xyz().into();
        let bytes = write_geometry(&geom, &MYSQL, Endianness::LittleEndian).unwrap();
        assert_eq!(bytes.capacity(), 1 + 4 + 4 + 2 * 16);
    }

    #[test]
    fn size_is_exact() {
        for kind in DialectKind::all() {
            let dialect = kind.dialect();
            for geom in all_geometries() {
                if !dialect.keywords.contains_key(geom.geometry_type().name()) {
                    continue;
                }
                for byte_order in [Endianness::BigEndian, Endianness::LittleEndian] {
                    let buffer = write_geometry(&geom, dialect, byte_order).unwrap();
                    assert_eq!(buffer.capacity(), wkb_size(&geom, dialect), "{kind} {geom:?}");
                }
            }
        }
    }

    #[test]
    fn wrong_capacity_fails() {
        let geom: Geometry = ls_xyz().into();
        let mut writer = WkbWriter::new(&SFA_1_2_1, Endianness::LittleEndian, 10);
        assert!(matches!(
            geom.accept(&mut writer),
            Err(GeoWkxError::ValueOutOfRange(_))
        ));

        let mut writer = WkbWriter::new(&SFA_1_2_1, Endianness::LittleEndian, 100);
        geom.accept(&mut writer).unwrap();
        assert!(writer.finish().is_err());
    }
}
