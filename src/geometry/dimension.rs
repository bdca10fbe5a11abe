use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{GeoWkxError, Result};

/// The coordinate dimension of a position or geometry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Two-dimensional.
    #[default]
    XY,

    /// Three-dimensional.
    XYZ,

    /// XYM (2D with measure).
    XYM,

    /// XYZM (3D with measure).
    XYZM,
}

impl Dimension {
    /// Build from the presence of the vertical and measure axes.
    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Dimension::XY,
            (true, false) => Dimension::XYZ,
            (false, true) => Dimension::XYM,
            (true, true) => Dimension::XYZM,
        }
    }

    /// Infer the dimension from a number of coordinate components.
    ///
    /// Three components are ambiguous; `measured` decides between XYZ and XYM.
    pub fn from_size(size: usize, measured: bool) -> Result<Self> {
        match size {
            2 => Ok(Dimension::XY),
            3 if measured => Ok(Dimension::XYM),
            3 => Ok(Dimension::XYZ),
            4 => Ok(Dimension::XYZM),
            _ => Err(GeoWkxError::ValueOutOfRange(format!(
                "Unsupported coordinate dimension {size}"
            ))),
        }
    }

    /// Returns the number of dimensions.
    pub fn size(&self) -> usize {
        match self {
            Dimension::XY => 2,
            Dimension::XYZ => 3,
            Dimension::XYM => 3,
            Dimension::XYZM => 4,
        }
    }

    /// Whether positions of this dimension carry a vertical coordinate.
    pub fn has_z(&self) -> bool {
        matches!(self, Dimension::XYZ | Dimension::XYZM)
    }

    /// Whether positions of this dimension carry a measure.
    pub fn has_m(&self) -> bool {
        matches!(self, Dimension::XYM | Dimension::XYZM)
    }

    /// Index of the measure in a coordinate tuple, if any.
    pub fn m_index(&self) -> Option<usize> {
        match self {
            Dimension::XYM => Some(2),
            Dimension::XYZM => Some(3),
            _ => None,
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::XY => write!(f, "XY"),
            Dimension::XYZ => write!(f, "XYZ"),
            Dimension::XYM => write!(f, "XYM"),
            Dimension::XYZM => write!(f, "XYZM"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags_round_trip() {
        for dim in [
            Dimension::XY,
            Dimension::XYZ,
            Dimension::XYM,
            Dimension::XYZM,
        ] {
            assert_eq!(Dimension::from_flags(dim.has_z(), dim.has_m()), dim);
            assert_eq!(Dimension::from_size(dim.size(), dim.has_m()).unwrap(), dim);
        }
    }

    #[test]
    fn from_bad_size() {
        assert!(Dimension::from_size(1, false).is_err());
        assert!(Dimension::from_size(5, true).is_err());
    }

    #[test]
    fn serialized_form() {
        assert_eq!(serde_json::to_string(&Dimension::XYM).unwrap(), r#""XYM""#);
    }
}
