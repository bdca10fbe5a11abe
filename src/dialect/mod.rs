//! Vendor and standard dialects of WKT and WKB.
//!
//! A [`Dialect`] is an immutable descriptor: punctuation, keyword table and ZM-marker conventions
//! for text, type-code layout, SRID policy and empty-point convention for binary. The built-in
//! dialects are statics shared by every decode and encode call; a new dialect is a new
//! [`Dialect`] value, not a new type.

use std::fmt::{Display, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GeoWkxError, Result};
use crate::geometry::{Dimension, GeometryType};
use crate::io::wkt::reader::Token;

pub use keywords::Keyword;
pub use type_code::{SridPolicy, TypeCode, TypeCodeLayout, EWKB_M_FLAG, EWKB_Z_FLAG, SRID_FLAG};

mod keywords;
mod type_code;

/// How a WKT tag announces the coordinate dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZmMarkerStyle {
    /// No marker; the dimension follows from the number of coordinates.
    None,
    /// PostGIS: `POINTM` for measured 2D geometries, no marker otherwise.
    PostgisSuffix,
    /// ISO 19125: `POINT Z`, `POINT M`, `POINT ZM`.
    Iso,
}

/// Vendor- or standard-specific parameterization of the WKT and WKB codecs.
///
/// A new dialect is a new value, usually derived from an existing one:
///
/// ```
/// use geowkx::dialect::{Dialect, POSTGIS_EWKB_2};
///
/// let compact = Dialect {
///     name: "compact",
///     max_fraction_digits: 6,
///     ..POSTGIS_EWKB_2
/// };
/// assert!(compact.empty_point_as_nan);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    pub name: &'static str,

    pub open_list: char,
    pub close_list: char,
    pub element_separator: char,
    /// Upper-case word to meaning.
    pub keywords: &'static phf::Map<&'static str, Keyword>,
    /// Whether WKT carries an `SRID=n;` prefix.
    pub srid_prefix: bool,
    pub zm_markers: ZmMarkerStyle,
    /// Whether members of a geometry collection repeat the ZM marker of the collection.
    pub markers_in_collection: bool,
    /// Upper bound on the number of fraction digits written for a coordinate.
    pub max_fraction_digits: usize,
    /// `MULTIPOINT(1 2,3 4)` instead of `MULTIPOINT((1 2),(3 4))`.
    pub write_multi_point_as_positions: bool,

    pub type_code_layout: TypeCodeLayout,
    pub srid_policy: SridPolicy,
    /// Write an empty point as a point with NaN coordinates instead of an empty collection.
    pub empty_point_as_nan: bool,
    /// Only x and y are written; higher dimensions are dropped.
    pub limited_to_2d: bool,
}

const SFA_1_1_0_RULES: Dialect = Dialect {
    name: "SFA 1.1.0",
    open_list: '(',
    close_list: ')',
    element_separator: ',',
    keywords: &keywords::SFA_1_1_0_KEYWORDS,
    srid_prefix: false,
    zm_markers: ZmMarkerStyle::None,
    markers_in_collection: true,
    max_fraction_digits: 15,
    write_multi_point_as_positions: false,
    type_code_layout: TypeCodeLayout::Plain,
    srid_policy: SridPolicy::Never,
    empty_point_as_nan: false,
    limited_to_2d: true,
};

const POSTGIS_RULES: Dialect = Dialect {
    name: "PostGIS EWKB v1",
    open_list: '(',
    close_list: ')',
    element_separator: ',',
    keywords: &keywords::POSTGIS_KEYWORDS,
    srid_prefix: true,
    zm_markers: ZmMarkerStyle::PostgisSuffix,
    markers_in_collection: false,
    max_fraction_digits: 24,
    write_multi_point_as_positions: true,
    type_code_layout: TypeCodeLayout::Ewkb,
    srid_policy: SridPolicy::WhenDefined,
    empty_point_as_nan: false,
    limited_to_2d: false,
};

/// OGC Simple Feature Access 1.1.0.
pub static SFA_1_1_0: Dialect = SFA_1_1_0_RULES;

/// OGC Simple Feature Access 1.2.1 (ISO 19125).
pub static SFA_1_2_1: Dialect = Dialect {
    name: "SFA 1.2.1",
    open_list: '(',
    close_list: ')',
    element_separator: ',',
    keywords: &keywords::ISO_KEYWORDS,
    srid_prefix: false,
    zm_markers: ZmMarkerStyle::Iso,
    markers_in_collection: true,
    max_fraction_digits: 15,
    write_multi_point_as_positions: false,
    type_code_layout: TypeCodeLayout::Iso,
    srid_policy: SridPolicy::Never,
    empty_point_as_nan: true,
    limited_to_2d: false,
};

/// PostGIS 1.x EWKT/EWKB.
pub static POSTGIS_EWKB_1: Dialect = POSTGIS_RULES;

/// PostGIS 2.x and later EWKT/EWKB.
pub static POSTGIS_EWKB_2: Dialect = Dialect {
    name: "PostGIS EWKB v2",
    empty_point_as_nan: true,
    ..POSTGIS_RULES
};

/// MySQL spatial types: two-dimensional SFA 1.1 geometries.
pub static MYSQL: Dialect = Dialect {
    name: "MySQL",
    ..SFA_1_1_0_RULES
};

/// SAP HANA: EWKT with ISO markers; the SRID is always embedded in WKB.
pub static HANA: Dialect = Dialect {
    name: "HANA",
    open_list: '(',
    close_list: ')',
    element_separator: ',',
    keywords: &keywords::ISO_KEYWORDS,
    srid_prefix: true,
    zm_markers: ZmMarkerStyle::Iso,
    markers_in_collection: true,
    max_fraction_digits: 15,
    write_multi_point_as_positions: false,
    type_code_layout: TypeCodeLayout::Hana,
    srid_policy: SridPolicy::Always,
    empty_point_as_nan: true,
    limited_to_2d: false,
};

/// IBM DB2: the HANA wire format with plain ISO WKT.
pub static DB2: Dialect = Dialect {
    name: "DB2",
    open_list: '(',
    close_list: ')',
    element_separator: ',',
    keywords: &keywords::ISO_KEYWORDS,
    srid_prefix: false,
    zm_markers: ZmMarkerStyle::Iso,
    markers_in_collection: true,
    max_fraction_digits: 15,
    write_multi_point_as_positions: false,
    type_code_layout: TypeCodeLayout::Hana,
    srid_policy: SridPolicy::Always,
    empty_point_as_nan: true,
    limited_to_2d: false,
};

impl Dialect {
    /// Look up the word `text[start..end]` in the keyword table, ignoring case.
    pub fn match_keyword(&self, text: &str, start: usize, end: usize) -> Result<Token> {
        let unrecognized = || GeoWkxError::UnrecognizedKeyword {
            keyword: text.get(start..end).unwrap_or_default().to_string(),
            position: start,
        };
        let word = text.get(start..end).ok_or_else(unrecognized)?.as_bytes();
        if word.len() > keywords::MAX_KEYWORD_LEN {
            return Err(unrecognized());
        }
        let mut upper = [0u8; keywords::MAX_KEYWORD_LEN];
        for (dst, src) in upper.iter_mut().zip(word) {
            *dst = src.to_ascii_uppercase();
        }
        let upper = std::str::from_utf8(&upper[..word.len()]).map_err(|_| unrecognized())?;
        self.keywords
            .get(upper)
            .map(|keyword| Token::Keyword(*keyword))
            .ok_or_else(unrecognized)
    }

    /// The dimension positions are written with under this dialect.
    pub fn effective_dimension(&self, dim: Dimension) -> Dimension {
        if self.limited_to_2d {
            Dimension::XY
        } else {
            dim
        }
    }

    /// The binary type code for a record.
    pub fn geometry_type_code(
        &self,
        geometry_type: GeometryType,
        dim: Dimension,
        with_srid: bool,
    ) -> Result<u32> {
        self.type_code_layout
            .encode(geometry_type, self.effective_dimension(dim), with_srid)
    }

    /// Decode a binary type code.
    pub fn parse_type(&self, code: u32) -> Result<TypeCode> {
        self.type_code_layout.decode(code)
    }

    pub fn has_z(&self, code: u32) -> Result<bool> {
        Ok(self.parse_type(code)?.dimension.has_z())
    }

    pub fn has_m(&self, code: u32) -> Result<bool> {
        Ok(self.parse_type(code)?.dimension.has_m())
    }

    pub fn empty_point_as_nan(&self) -> bool {
        self.empty_point_as_nan
    }

    /// Write the `SRID=n;` prefix if the dialect has one and the SRID is defined.
    pub fn add_srid(&self, out: &mut String, srid: i32) {
        if self.srid_prefix && srid > 0 {
            // Writing to a String cannot fail
            let _ = write!(out, "SRID={srid};");
        }
    }

    /// Write the geometry keyword and, where the dialect wants one, the ZM marker.
    pub fn add_geometry_tag(
        &self,
        out: &mut String,
        geometry_type: GeometryType,
        dim: Dimension,
        in_geometry_collection: bool,
    ) -> Result<()> {
        let name = geometry_type.name();
        if !self.keywords.contains_key(name) {
            return Err(GeoWkxError::UnsupportedGeometryType(format!(
                "{name} in {}",
                self.name
            )));
        }
        out.push_str(name);
        if !in_geometry_collection || self.markers_in_collection {
            self.add_geometry_zm_marker(out, self.effective_dimension(dim));
        }
        Ok(())
    }

    /// Write the dimension marker following a geometry keyword.
    pub fn add_geometry_zm_marker(&self, out: &mut String, dim: Dimension) {
        match (self.zm_markers, dim) {
            (ZmMarkerStyle::PostgisSuffix, Dimension::XYM) => out.push('M'),
            (ZmMarkerStyle::Iso, Dimension::XYZ) => out.push_str(" Z "),
            (ZmMarkerStyle::Iso, Dimension::XYM) => out.push_str(" M "),
            (ZmMarkerStyle::Iso, Dimension::XYZM) => out.push_str(" ZM "),
            _ => {}
        }
    }
}

/// Selects one of the built-in dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectKind {
    #[serde(rename = "sfa-1.1.0")]
    Sfa110,
    #[serde(rename = "sfa-1.2.1")]
    Sfa121,
    #[serde(rename = "postgis-ewkb-1")]
    PostgisEwkb1,
    #[serde(rename = "postgis-ewkb-2")]
    PostgisEwkb2,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "hana")]
    Hana,
    #[serde(rename = "db2")]
    Db2,
}

impl DialectKind {
    /// Every built-in dialect.
    pub fn all() -> [DialectKind; 7] {
        use DialectKind::*;
        [Sfa110, Sfa121, PostgisEwkb1, PostgisEwkb2, MySql, Hana, Db2]
    }

    pub fn dialect(&self) -> &'static Dialect {
        match self {
            DialectKind::Sfa110 => &SFA_1_1_0,
            DialectKind::Sfa121 => &SFA_1_2_1,
            DialectKind::PostgisEwkb1 => &POSTGIS_EWKB_1,
            DialectKind::PostgisEwkb2 => &POSTGIS_EWKB_2,
            DialectKind::MySql => &MYSQL,
            DialectKind::Hana => &HANA,
            DialectKind::Db2 => &DB2,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            DialectKind::Sfa110 => "sfa-1.1.0",
            DialectKind::Sfa121 => "sfa-1.2.1",
            DialectKind::PostgisEwkb1 => "postgis-ewkb-1",
            DialectKind::PostgisEwkb2 => "postgis-ewkb-2",
            DialectKind::MySql => "mysql",
            DialectKind::Hana => "hana",
            DialectKind::Db2 => "db2",
        }
    }
}

impl Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = GeoWkxError;

    fn from_str(s: &str) -> Result<Self> {
        DialectKind::all()
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GeoWkxError::UnrecognizedKeyword {
                keyword: s.to_string(),
                position: 0,
            })
    }
}
