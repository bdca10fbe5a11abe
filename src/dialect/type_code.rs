//! Binary geometry type codes and how each dialect packs dimension and SRID information into them.

use crate::error::{GeoWkxError, Result};
use crate::geometry::{Dimension, GeometryType};
use crate::io::wkb::common::WKBType;

/// EWKB flag: the record has a vertical coordinate.
pub const EWKB_Z_FLAG: u32 = 0x8000_0000;
/// EWKB flag: the record has a measure.
pub const EWKB_M_FLAG: u32 = 0x4000_0000;
/// Flag set when an SRID follows the type code (PostGIS and HANA).
pub const SRID_FLAG: u32 = 0x2000_0000;

/// How dimension and SRID presence are packed into the 32-bit type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCodeLayout {
    /// Bare codes 1..=7; no dimension or SRID information.
    Plain,
    /// ISO 19125 / SFA 1.2.1 offsets: +1000 for Z, +2000 for M, +3000 for ZM.
    Iso,
    /// PostGIS EWKB: high bits for Z, M and SRID.
    Ewkb,
    /// HANA and DB2: ISO offsets in the low 16 bits, plus the SRID flag.
    Hana,
}

/// A decoded type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCode {
    pub wkb_type: WKBType,
    pub dimension: Dimension,
    pub has_srid: bool,
}

impl TypeCode {
    pub fn geometry_type(&self) -> GeometryType {
        self.wkb_type.geometry_type()
    }
}

fn iso_offset(dim: Dimension) -> u32 {
    match dim {
        Dimension::XY => 0,
        Dimension::XYZ => 1000,
        Dimension::XYM => 2000,
        Dimension::XYZM => 3000,
    }
}

impl TypeCodeLayout {
    /// Pack a geometry type, dimension and SRID presence into a type code.
    pub fn encode(&self, geometry_type: GeometryType, dim: Dimension, with_srid: bool) -> Result<u32> {
        let base: u32 = WKBType::from(geometry_type).into();
        let code = match self {
            TypeCodeLayout::Plain => {
                if dim != Dimension::XY {
                    return Err(GeoWkxError::UnsupportedGeometryType(format!(
                        "{geometry_type} with {dim} coordinates"
                    )));
                }
                base
            }
            TypeCodeLayout::Iso => base + iso_offset(dim),
            TypeCodeLayout::Ewkb => {
                let mut code = base;
                if dim.has_z() {
                    code |= EWKB_Z_FLAG;
                }
                if dim.has_m() {
                    code |= EWKB_M_FLAG;
                }
                if with_srid {
                    code |= SRID_FLAG;
                }
                code
            }
            TypeCodeLayout::Hana => {
                let code = base + iso_offset(dim);
                if with_srid {
                    code | SRID_FLAG
                } else {
                    code
                }
            }
        };
        Ok(code)
    }

    /// Unpack a type code. Exactly inverts [`encode`][Self::encode].
    pub fn decode(&self, code: u32) -> Result<TypeCode> {
        let invalid = || GeoWkxError::MalformedWkb(format!("invalid type code {code:#010x}"));
        let (base, dimension, has_srid) = match self {
            TypeCodeLayout::Plain => (code, Dimension::XY, false),
            TypeCodeLayout::Iso => {
                let dimension = match code / 1000 {
                    0 => Dimension::XY,
                    1 => Dimension::XYZ,
                    2 => Dimension::XYM,
                    3 => Dimension::XYZM,
                    _ => return Err(invalid()),
                };
                (code % 1000, dimension, false)
            }
            TypeCodeLayout::Ewkb => {
                let low = code & !(EWKB_Z_FLAG | EWKB_M_FLAG | SRID_FLAG);
                // PostGIS also reads ISO codes, so honor both conventions
                let iso = match low / 1000 {
                    0 => Dimension::XY,
                    1 => Dimension::XYZ,
                    2 => Dimension::XYM,
                    3 => Dimension::XYZM,
                    _ => return Err(invalid()),
                };
                let dimension = Dimension::from_flags(
                    code & EWKB_Z_FLAG != 0 || iso.has_z(),
                    code & EWKB_M_FLAG != 0 || iso.has_m(),
                );
                (low % 1000, dimension, code & SRID_FLAG != 0)
            }
            TypeCodeLayout::Hana => {
                if code & !(0xFFFF | SRID_FLAG) != 0 {
                    return Err(invalid());
                }
                let low = code & 0xFFFF;
                let dimension = if low > 3000 {
                    Dimension::XYZM
                } else if low > 2000 {
                    Dimension::XYM
                } else if low > 1000 {
                    Dimension::XYZ
                } else {
                    Dimension::XY
                };
                (low % 100, dimension, code & SRID_FLAG != 0)
            }
        };
        Ok(TypeCode {
            wkb_type: WKBType::from_code(base)?,
            dimension,
            has_srid,
        })
    }
}

/// When the SRID is embedded in a binary record.
///
/// The SRID is only ever written once per stream, on the outermost record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SridPolicy {
    /// Never written.
    Never,
    /// Written when the SRID is defined (greater than zero).
    WhenDefined,
    /// Always written, as 0 when undefined.
    Always,
}

impl SridPolicy {
    pub fn writes(&self, srid: i32) -> bool {
        match self {
            SridPolicy::Never => false,
            SridPolicy::WhenDefined => srid > 0,
            SridPolicy::Always => true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TYPES: [GeometryType; 7] = [
        GeometryType::Point,
        GeometryType::LineString,
        GeometryType::Polygon,
        GeometryType::MultiPoint,
        GeometryType::MultiLineString,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
    ];

    const DIMS: [Dimension; 4] = [
        Dimension::XY,
        Dimension::XYZ,
        Dimension::XYM,
        Dimension::XYZM,
    ];

    fn check_inverts(layout: TypeCodeLayout, dims: &[Dimension], srid_flags: &[bool]) {
        for geometry_type in TYPES {
            for dim in dims {
                for with_srid in srid_flags {
                    let code = layout.encode(geometry_type, *dim, *with_srid).unwrap();
                    let decoded = layout.decode(code).unwrap();
                    assert_eq!(decoded.geometry_type(), geometry_type, "{code:#x}");
                    assert_eq!(decoded.dimension, *dim, "{code:#x}");
                    assert_eq!(decoded.dimension.has_z(), dim.has_z());
                    assert_eq!(decoded.dimension.has_m(), dim.has_m());
                    assert_eq!(decoded.has_srid, *with_srid, "{code:#x}");
                }
            }
        }
    }

    #[test]
    fn plain_inverts() {
        check_inverts(TypeCodeLayout::Plain, &[Dimension::XY], &[false]);
        assert!(TypeCodeLayout::Plain
            .encode(GeometryType::Point, Dimension::XYZ, false)
            .is_err());
    }

    #[test]
    fn iso_inverts() {
        check_inverts(TypeCodeLayout::Iso, &DIMS, &[false]);
        assert_eq!(
            TypeCodeLayout::Iso
                .encode(GeometryType::Polygon, Dimension::XYZM, false)
                .unwrap(),
            3003
        );
    }

    #[test]
    fn ewkb_inverts() {
        check_inverts(TypeCodeLayout::Ewkb, &DIMS, &[false, true]);
        assert_eq!(
            TypeCodeLayout::Ewkb
                .encode(GeometryType::Point, Dimension::XY, true)
                .unwrap(),
            0x2000_0001
        );
        assert_eq!(
            TypeCodeLayout::Ewkb
                .encode(GeometryType::LineString, Dimension::XYZM, false)
                .unwrap(),
            0xC000_0002
        );
    }

    #[test]
    fn ewkb_reads_iso_codes() {
        let decoded = TypeCodeLayout::Ewkb.decode(2003).unwrap();
        assert_eq!(decoded.geometry_type(), GeometryType::Polygon);
        assert_eq!(decoded.dimension, Dimension::XYM);
    }

    #[test]
    fn hana_inverts() {
        check_inverts(TypeCodeLayout::Hana, &DIMS, &[false, true]);
        assert_eq!(
            TypeCodeLayout::Hana
                .encode(GeometryType::MultiPoint, Dimension::XYM, true)
                .unwrap(),
            0x2000_0000 + 2004
        );
    }

    #[test]
    fn linear_ring_is_written_as_line_string() {
        assert_eq!(
            TypeCodeLayout::Iso
                .encode(GeometryType::LinearRing, Dimension::XYZ, false)
                .unwrap(),
            1002
        );
    }

    #[test]
    fn invalid_codes() {
        assert!(TypeCodeLayout::Plain.decode(1001).is_err());
        assert!(TypeCodeLayout::Iso.decode(4001).is_err());
        assert!(TypeCodeLayout::Iso.decode(1008).is_err());
        assert!(TypeCodeLayout::Hana.decode(0x0001_0001).is_err());
        assert!(TypeCodeLayout::Ewkb.decode(0).is_err());
    }

    #[test]
    fn srid_policy() {
        assert!(!SridPolicy::Never.writes(4326));
        assert!(SridPolicy::WhenDefined.writes(4326));
        assert!(!SridPolicy::WhenDefined.writes(0));
        assert!(SridPolicy::Always.writes(0));
    }
}
