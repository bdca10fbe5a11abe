use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::GeoWkxError;
use crate::geometry::GeometryType;

/// The base WKB geometry type codes, before any dialect adds dimension or SRID information.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum WKBType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl WKBType {
    /// Parse a base code, failing with [`GeoWkxError::MalformedWkb`] on anything but 1..=7.
    pub fn from_code(code: u32) -> Result<Self, GeoWkxError> {
        Self::try_from_primitive(code)
            .map_err(|err| GeoWkxError::MalformedWkb(format!("invalid type code: {err}")))
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            WKBType::Point => GeometryType::Point,
            WKBType::LineString => GeometryType::LineString,
            WKBType::Polygon => GeometryType::Polygon,
            WKBType::MultiPoint => GeometryType::MultiPoint,
            WKBType::MultiLineString => GeometryType::MultiLineString,
            WKBType::MultiPolygon => GeometryType::MultiPolygon,
            WKBType::GeometryCollection => GeometryType::GeometryCollection,
        }
    }
}

impl From<GeometryType> for WKBType {
    /// WKB has no ring type; linear rings are written as line strings.
    fn from(value: GeometryType) -> Self {
        match value {
            GeometryType::Point => WKBType::Point,
            GeometryType::LineString | GeometryType::LinearRing => WKBType::LineString,
            GeometryType::Polygon => WKBType::Polygon,
            GeometryType::MultiPoint => WKBType::MultiPoint,
            GeometryType::MultiLineString => WKBType::MultiLineString,
            GeometryType::MultiPolygon => WKBType::MultiPolygon,
            GeometryType::GeometryCollection => WKBType::GeometryCollection,
        }
    }
}

/// Endianness
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// XDR
    BigEndian,
    /// NDR
    #[default]
    LittleEndian,
}

impl TryFrom<u8> for Endianness {
    type Error = GeoWkxError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Endianness::BigEndian),
            1 => Ok(Endianness::LittleEndian),
            other => Err(GeoWkxError::MalformedWkb(format!(
                "unexpected byte order {other:#04x}"
            ))),
        }
    }
}

impl From<Endianness> for u8 {
    fn from(value: Endianness) -> Self {
        use Endianness::*;
        match value {
            BigEndian => 0,
            LittleEndian => 1,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn base_codes() {
        assert_eq!(WKBType::from_code(6).unwrap(), WKBType::MultiPolygon);
        assert!(WKBType::from_code(0).is_err());
        assert!(WKBType::from_code(8).is_err());
        assert_eq!(u32::from(WKBType::from(GeometryType::LinearRing)), 2);
    }

    #[test]
    fn byte_order() {
        assert_eq!(Endianness::try_from(0).unwrap(), Endianness::BigEndian);
        assert_eq!(u8::from(Endianness::LittleEndian), 1);
        assert!(Endianness::try_from(2).is_err());
    }
}
