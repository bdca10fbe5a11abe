use crate::crs::Crs;
use crate::geometry::{Dimension, LineString, LinearRing, Position, PositionSequence};
use crate::test::pos;

pub(crate) fn ls_xyz() -> LineString {
    let dim = Dimension::XYZ;
    let positions = PositionSequence::from_positions(
        dim,
        &[Position::xyz(0., 0., 1.), Position::xyz(1., 1., 2.)],
    )
    .unwrap();
    LineString::new(positions, Crs::undefined(dim)).unwrap()
}

pub(crate) fn line_string(crs: Crs, offset: f64) -> LineString {
    let dim = crs.dimension();
    let positions = PositionSequence::from_positions(
        dim,
        &[pos(dim, offset), pos(dim, offset + 10.), pos(dim, offset - 2.25)],
    )
    .unwrap();
    LineString::new(positions, crs).unwrap()
}

pub(crate) fn ring(crs: Crs, min: f64, max: f64) -> LinearRing {
    let dim = crs.dimension();
    let corner = |x: f64, y: f64| {
        let mut coords = pos(dim, x).coords().to_vec();
        coords[1] = y;
        Position::from_slice(dim, &coords).unwrap()
    };
    let positions = PositionSequence::from_positions(
        dim,
        &[
            corner(min, min),
            corner(max, min),
            corner(max, max),
            corner(min, min),
        ],
    )
    .unwrap();
    LinearRing::new(positions, crs).unwrap()
}

pub(crate) fn linear_ring(crs: Crs) -> LinearRing {
    ring(crs, 0., 4.)
}
