use serde::{Deserialize, Serialize};

use crate::error::{GeoWkxError, Result};
use crate::geometry::Dimension;

/// A single coordinate tuple.
///
/// Components are always stored in (x, y, z, m) order; unused slots hold zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    coords: [f64; 4],
    dim: Dimension,
}

impl Position {
    /// A 2D position.
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            coords: [x, y, 0., 0.],
            dim: Dimension::XY,
        }
    }

    /// A 3D position.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            coords: [x, y, z, 0.],
            dim: Dimension::XYZ,
        }
    }

    /// A 2D position with measure.
    pub fn xym(x: f64, y: f64, m: f64) -> Self {
        Self {
            coords: [x, y, m, 0.],
            dim: Dimension::XYM,
        }
    }

    /// A 3D position with measure.
    pub fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            coords: [x, y, z, m],
            dim: Dimension::XYZM,
        }
    }

    /// Build from a slice holding exactly `dim.size()` components.
    pub fn from_slice(dim: Dimension, values: &[f64]) -> Result<Self> {
        if values.len() != dim.size() {
            return Err(GeoWkxError::ValueOutOfRange(format!(
                "{dim} position needs {} components, got {}",
                dim.size(),
                values.len()
            )));
        }
        let mut coords = [0.; 4];
        coords[..values.len()].copy_from_slice(values);
        Ok(Self { coords, dim })
    }

    /// The dimension of this position.
    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    /// The used components, in (x, y, z, m) order.
    pub fn coords(&self) -> &[f64] {
        &self.coords[..self.dim.size()]
    }

    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    pub fn z(&self) -> Option<f64> {
        self.dim.has_z().then(|| self.coords[2])
    }

    pub fn m(&self) -> Option<f64> {
        self.dim.m_index().map(|i| self.coords[i])
    }

    /// Whether every component is NaN, the WKB convention for an empty point.
    pub fn is_nan(&self) -> bool {
        self.coords().iter().all(|c| c.is_nan())
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim && self.coords() == other.coords()
    }
}

/// An ordered run of positions that share one dimension.
///
/// Coordinates are stored interleaved in a single buffer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionSequence {
    coords: Vec<f64>,
    dim: Dimension,
}

impl PositionSequence {
    /// An empty sequence.
    pub fn empty(dim: Dimension) -> Self {
        Self {
            coords: Vec::new(),
            dim,
        }
    }

    /// Collect positions, failing if any position does not have dimension `dim`.
    pub fn from_positions(dim: Dimension, positions: &[Position]) -> Result<Self> {
        let mut builder = PositionSequenceBuilder::with_capacity(dim, positions.len());
        for position in positions {
            builder.push(position)?;
        }
        Ok(builder.finish())
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.coords.len() / self.dim.size()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Access the i'th position.
    pub fn get(&self, i: usize) -> Option<Position> {
        let size = self.dim.size();
        let values = self.coords.get(i * size..(i + 1) * size)?;
        Some(Position {
            coords: fill(values),
            dim: self.dim,
        })
    }

    /// Iterate over the coordinate tuples as slices.
    pub fn coord_slices(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.coords.chunks_exact(self.dim.size())
    }

    /// Iterate over the positions.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.coord_slices().map(|values| Position {
            coords: fill(values),
            dim: self.dim,
        })
    }

    /// Drop every component beyond x and y.
    pub fn to_2d(&self) -> Self {
        let mut coords = Vec::with_capacity(self.len() * 2);
        for values in self.coord_slices() {
            coords.extend_from_slice(&values[..2]);
        }
        Self {
            coords,
            dim: Dimension::XY,
        }
    }
}

fn fill(values: &[f64]) -> [f64; 4] {
    let mut coords = [0.; 4];
    coords[..values.len()].copy_from_slice(values);
    coords
}

/// Write-once builder for a [`PositionSequence`].
///
/// Parsers count positions ahead of time and pass the count to
/// [`with_capacity`][Self::with_capacity] so that pushing never reallocates.
#[derive(Debug)]
pub struct PositionSequenceBuilder {
    coords: Vec<f64>,
    dim: Dimension,
}

impl PositionSequenceBuilder {
    pub fn with_capacity(dim: Dimension, num_positions: usize) -> Self {
        Self {
            coords: Vec::with_capacity(num_positions * dim.size()),
            dim,
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    /// Append a position of the builder's dimension.
    pub fn push(&mut self, position: &Position) -> Result<()> {
        if position.dimension() != self.dim {
            return Err(GeoWkxError::ValueOutOfRange(format!(
                "Cannot add {} position to {} sequence",
                position.dimension(),
                self.dim
            )));
        }
        self.coords.extend_from_slice(position.coords());
        Ok(())
    }

    /// Append one raw coordinate component.
    ///
    /// Callers push exactly `dimension().size()` components per position.
    pub fn push_coord(&mut self, value: f64) {
        self.coords.push(value);
    }

    /// Number of complete positions pushed so far.
    pub fn len(&self) -> usize {
        self.coords.len() / self.dim.size()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn finish(self) -> PositionSequence {
        PositionSequence {
            coords: self.coords,
            dim: self.dim,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn position_accessors() {
        let p = Position::xym(1., 2., 3.);
        assert_eq!(p.z(), None);
        assert_eq!(p.m(), Some(3.));
        assert_eq!(p.coords(), &[1., 2., 3.]);

        let p = Position::xyzm(1., 2., 3., 4.);
        assert_eq!(p.z(), Some(3.));
        assert_eq!(p.m(), Some(4.));
    }

    #[test]
    fn position_equality_ignores_unused_slots() {
        let a = Position::from_slice(Dimension::XY, &[1., 2.]).unwrap();
        assert_eq!(a, Position::xy(1., 2.));
        assert_ne!(Position::xy(1., 2.), Position::xyz(1., 2., 0.));
    }

    #[test]
    fn builder_rejects_other_dimension() {
        let mut builder = PositionSequenceBuilder::with_capacity(Dimension::XYZ, 2);
        builder.push(&Position::xyz(0., 1., 2.)).unwrap();
        assert!(builder.push(&Position::xy(0., 1.)).is_err());

        let seq = builder.finish();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(0), Some(Position::xyz(0., 1., 2.)));
        assert_eq!(seq.get(1), None);
    }

    #[test]
    fn sequence_to_2d() {
        let seq = PositionSequence::from_positions(
            Dimension::XYZM,
            &[Position::xyzm(1., 2., 3., 4.), Position::xyzm(5., 6., 7., 8.)],
        )
        .unwrap();
        let flat = seq.to_2d();
        assert_eq!(flat.dimension(), Dimension::XY);
        assert_eq!(flat.positions().collect::<Vec<_>>(), vec![
            Position::xy(1., 2.),
            Position::xy(5., 6.)
        ]);
    }
}
