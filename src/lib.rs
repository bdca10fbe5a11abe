//! Dialect-aware readers and writers for the Well-Known Text (WKT) and Well-Known Binary (WKB)
//! geometry encodings.
//!
//! The same codecs serve OGC Simple Features 1.1.0 and 1.2.1, PostGIS EWKT/EWKB, MySQL, SAP HANA
//! and IBM DB2; the differences between them are captured by a [`Dialect`](dialect::Dialect).
//!
//! ```
//! use geowkx::dialect::{POSTGIS_EWKB_2, SFA_1_2_1};
//! use geowkx::io::wkb::{from_wkb, to_wkb, Endianness};
//! use geowkx::io::wkt::{from_wkt, to_wkt};
//!
//! let geom = from_wkt("SRID=4326;POINTM(1 2 3)", &POSTGIS_EWKB_2, None).unwrap();
//! assert_eq!(to_wkt(&geom, &SFA_1_2_1).unwrap(), "POINT M (1 2 3)");
//!
//! let bytes = to_wkb(&geom, &POSTGIS_EWKB_2, Endianness::LittleEndian).unwrap();
//! assert_eq!(from_wkb(&bytes, &POSTGIS_EWKB_2, None).unwrap(), geom);
//! ```

#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub use crs::Crs;
pub use dialect::{Dialect, DialectKind};
pub use error::{GeoWkxError, Result};
pub use geometry::Geometry;

pub mod crs;
pub mod dialect;
pub mod error;
pub mod geometry;
pub mod io;
#[cfg(test)]
pub(crate) mod test;
