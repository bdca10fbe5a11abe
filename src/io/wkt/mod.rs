//! Reading and writing Well-Known Text in any [`Dialect`].

use crate::crs::Crs;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::geometry::Geometry;

pub mod reader;
pub mod writer;

pub use reader::{WktParser, WktTokenizer};
pub use writer::WktWriter;

/// Parse WKT text into a [`Geometry`].
///
/// If `crs` is given, the geometry is placed in that CRS; an `SRID=n;` prefix or coordinate
/// dimension that contradicts it is an error. Otherwise the CRS is resolved from the prefix and
/// widened to the dimension found in the text.
///
/// ```
/// use geowkx::dialect::POSTGIS_EWKB_2;
/// use geowkx::io::wkt::from_wkt;
///
/// let geom = from_wkt("SRID=4326;POINT(1 2)", &POSTGIS_EWKB_2, None).unwrap();
/// assert_eq!(geom.srid(), 4326);
/// ```
pub fn from_wkt(text: &str, dialect: &Dialect, crs: Option<&Crs>) -> Result<Geometry> {
    log::debug!("decoding {} bytes of {} WKT", text.len(), dialect.name);
    WktParser::new(text, dialect).parse(crs)
}

/// Write a [`Geometry`] as WKT text.
pub fn to_wkt(geom: &Geometry, dialect: &Dialect) -> Result<String> {
    log::debug!("encoding {} as {} WKT", geom.geometry_type(), dialect.name);
    WktWriter::new(dialect).write(geom)
}
