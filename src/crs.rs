//! Coordinate reference system descriptors as far as the codecs need them.

use serde::{Deserialize, Serialize};

use crate::error::{GeoWkxError, Result};
use crate::geometry::Dimension;

/// A coordinate reference system, identified by SRID.
///
/// The full CRS definition lives in an external registry; the codecs only need the SRID and the
/// coordinate dimension of the positions that reference it.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Crs {
    /// Spatial reference identifier. Zero means "undefined".
    srid: i32,

    /// Dimension of positions in this reference system.
    dimension: Dimension,
}

impl Crs {
    /// Resolve an SRID to a two-dimensional CRS.
    ///
    /// Zero or negative SRIDs are normalized to 0, the undefined reference system.
    pub fn from_srid(srid: i32) -> Self {
        Self {
            srid: srid.max(0),
            dimension: Dimension::XY,
        }
    }

    /// The undefined CRS with the given dimension.
    pub fn undefined(dimension: Dimension) -> Self {
        Self {
            srid: 0,
            dimension,
        }
    }

    /// Return a copy of this CRS widened (or narrowed) to `dimension`.
    pub fn with_dimension(self, dimension: Dimension) -> Self {
        Self { dimension, ..self }
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// Whether the SRID identifies an actual reference system.
    pub fn is_srid_defined(&self) -> bool {
        self.srid > 0
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn has_z(&self) -> bool {
        self.dimension.has_z()
    }

    pub fn has_m(&self) -> bool {
        self.dimension.has_m()
    }

    /// Check that data decoded with `srid` and `dimension` may be placed in this CRS.
    ///
    /// An undefined `srid` or a `None` dimension are compatible with anything.
    pub(crate) fn validate(&self, srid: i32, dimension: Option<Dimension>) -> Result<()> {
        if srid > 0 && srid != self.srid {
            return Err(GeoWkxError::CrsMismatch(format!(
                "input declares SRID {srid} but the supplied CRS has SRID {}",
                self.srid
            )));
        }
        match dimension {
            Some(dimension) if dimension != self.dimension => {
                Err(GeoWkxError::CrsMismatch(format!(
                    "input has {dimension} coordinates but the supplied CRS is {}",
                    self.dimension
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Pick the CRS of a decoded geometry.
///
/// A caller-supplied CRS wins after validation; otherwise the SRID found in the input is resolved
/// and widened to the decoded dimension.
pub(crate) fn resolve_crs(
    supplied: Option<&Crs>,
    srid: i32,
    dimension: Option<Dimension>,
) -> Result<Crs> {
    match supplied {
        Some(crs) => {
            crs.validate(srid, dimension)?;
            Ok(*crs)
        }
        None => Ok(Crs::from_srid(srid).with_dimension(dimension.unwrap_or_default())),
    }
}
