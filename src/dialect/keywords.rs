//! Keyword tables for the WKT dialects.
//!
//! Keys are upper-case; lookups upper-case the input word first.

use phf::phf_map;

use crate::geometry::{Dimension, GeometryType};

/// The meaning of a WKT word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// A geometry tag, e.g. `POINT` or the PostGIS measured form `POINTM`.
    Geometry {
        geometry_type: GeometryType,
        measured: bool,
    },

    /// `EMPTY`
    Empty,

    /// A separate dimension marker following the tag: `Z`, `M` or `ZM`.
    ZmMarker(Dimension),
}

const fn tag(geometry_type: GeometryType) -> Keyword {
    Keyword::Geometry {
        geometry_type,
        measured: false,
    }
}

const fn tag_m(geometry_type: GeometryType) -> Keyword {
    Keyword::Geometry {
        geometry_type,
        measured: true,
    }
}

/// Simple Features 1.1.0: two-dimensional tags only.
pub(crate) const SFA_1_1_0_KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "POINT" => tag(GeometryType::Point),
    "LINESTRING" => tag(GeometryType::LineString),
    "POLYGON" => tag(GeometryType::Polygon),
    "MULTIPOINT" => tag(GeometryType::MultiPoint),
    "MULTILINESTRING" => tag(GeometryType::MultiLineString),
    "MULTIPOLYGON" => tag(GeometryType::MultiPolygon),
    "GEOMETRYCOLLECTION" => tag(GeometryType::GeometryCollection),
    "EMPTY" => Keyword::Empty,
};

/// Simple Features 1.2.1 (ISO 19125) with separate `Z`, `M` and `ZM` markers.
pub(crate) const ISO_KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "POINT" => tag(GeometryType::Point),
    "LINESTRING" => tag(GeometryType::LineString),
    "LINEARRING" => tag(GeometryType::LinearRing),
    "POLYGON" => tag(GeometryType::Polygon),
    "MULTIPOINT" => tag(GeometryType::MultiPoint),
    "MULTILINESTRING" => tag(GeometryType::MultiLineString),
    "MULTIPOLYGON" => tag(GeometryType::MultiPolygon),
    "GEOMETRYCOLLECTION" => tag(GeometryType::GeometryCollection),
    "EMPTY" => Keyword::Empty,
    "Z" => Keyword::ZmMarker(Dimension::XYZ),
    "M" => Keyword::ZmMarker(Dimension::XYM),
    "ZM" => Keyword::ZmMarker(Dimension::XYZM),
};

/// PostGIS EWKT: measured tags carry an `M` suffix, the other dimensions follow from the number
/// of coordinates. ISO markers are accepted on input.
pub(crate) const POSTGIS_KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "POINT" => tag(GeometryType::Point),
    "LINESTRING" => tag(GeometryType::LineString),
    "LINEARRING" => tag(GeometryType::LinearRing),
    "POLYGON" => tag(GeometryType::Polygon),
    "MULTIPOINT" => tag(GeometryType::MultiPoint),
    "MULTILINESTRING" => tag(GeometryType::MultiLineString),
    "MULTIPOLYGON" => tag(GeometryType::MultiPolygon),
    "GEOMETRYCOLLECTION" => tag(GeometryType::GeometryCollection),
    "POINTM" => tag_m(GeometryType::Point),
    "LINESTRINGM" => tag_m(GeometryType::LineString),
    "LINEARRINGM" => tag_m(GeometryType::LinearRing),
    "POLYGONM" => tag_m(GeometryType::Polygon),
    "MULTIPOINTM" => tag_m(GeometryType::MultiPoint),
    "MULTILINESTRINGM" => tag_m(GeometryType::MultiLineString),
    "MULTIPOLYGONM" => tag_m(GeometryType::MultiPolygon),
    "GEOMETRYCOLLECTIONM" => tag_m(GeometryType::GeometryCollection),
    "EMPTY" => Keyword::Empty,
    "Z" => Keyword::ZmMarker(Dimension::XYZ),
    "M" => Keyword::ZmMarker(Dimension::XYM),
    "ZM" => Keyword::ZmMarker(Dimension::XYZM),
};

/// Longest key in any table, used to size the upper-casing buffer.
pub(crate) const MAX_KEYWORD_LEN: usize = 19;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keys_are_upper_case_and_bounded() {
        for table in [&SFA_1_1_0_KEYWORDS, &ISO_KEYWORDS, &POSTGIS_KEYWORDS] {
            for key in table.keys() {
                assert_eq!(*key, key.to_ascii_uppercase());
                assert!(key.len() <= MAX_KEYWORD_LEN);
            }
        }
    }

    #[test]
    fn measured_tags() {
        assert_eq!(
            POSTGIS_KEYWORDS.get("MULTIPOLYGONM"),
            Some(&tag_m(GeometryType::MultiPolygon))
        );
        assert!(ISO_KEYWORDS.get("POINTM").is_none());
        assert!(SFA_1_1_0_KEYWORDS.get("Z").is_none());
    }
}
