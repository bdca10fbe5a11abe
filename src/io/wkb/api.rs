use crate::crs::Crs;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::io::wkb::buffer::ByteBuffer;
use crate::io::wkb::common::Endianness;
use crate::io::wkb::reader::WkbReader;
use crate::io::wkb::writer::write_geometry;

/// Decode a WKB record into a [`Geometry`].
///
/// If `crs` is given, the geometry is placed in that CRS; an embedded SRID or a dimension that
/// contradicts it is an error. Otherwise the CRS is resolved from the embedded SRID (if any) and
/// widened to the dimension of the type code.
pub fn from_wkb(bytes: &[u8], dialect: &Dialect, crs: Option<&Crs>) -> Result<Geometry> {
    log::debug!("decoding {} bytes of {} WKB", bytes.len(), dialect.name);
    WkbReader::new(ByteBuffer::from_bytes(bytes.to_vec()), dialect, crs).read()
}

/// Encode a [`Geometry`] as a WKB record with the given byte order.
///
/// ```
/// use geowkx::crs::Crs;
/// use geowkx::dialect::POSTGIS_EWKB_1;
/// use geowkx::geometry::{Point, Position};
/// use geowkx::io::wkb::{to_wkb, Endianness};
///
/// let point = Point::new(Position::xy(1., 2.), Crs::from_srid(4326)).unwrap();
/// let bytes = to_wkb(&point.into(), &POSTGIS_EWKB_1, Endianness::LittleEndian).unwrap();
/// assert_eq!(bytes.len(), 25);
/// ```
pub fn to_wkb(geom: &Geometry, dialect: &Dialect, byte_order: Endianness) -> Result<Vec<u8>> {
    log::debug!("encoding {} as {} WKB", geom.geometry_type(), dialect.name);
    Ok(write_geometry(geom, dialect, byte_order)?.into_inner())
}

/// Decode a hexadecimal WKB string, as printed by PostGIS.
pub fn from_hex_wkb(hex: &str, dialect: &Dialect, crs: Option<&Crs>) -> Result<Geometry> {
    log::debug!("decoding {} hex digits of {} WKB", hex.len(), dialect.name);
    WkbReader::new(ByteBuffer::from_hex(hex)?, dialect, crs).read()
}

/// Encode a [`Geometry`] as upper-case hexadecimal WKB.
pub fn to_hex_wkb(geom: &Geometry, dialect: &Dialect, byte_order: Endianness) -> Result<String> {
    Ok(write_geometry(geom, dialect, byte_order)?.to_hex())
}
