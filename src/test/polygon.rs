use crate::crs::Crs;
use crate::geometry::{Dimension, LinearRing, Polygon, Position, PositionSequence};
use crate::test::linestring::ring;

/// Square with a square hole.
pub(crate) fn poly_xy() -> Polygon {
    let crs = Crs::default();
    let ring_of = |coords: [(f64, f64); 4]| {
        let positions: Vec<_> = coords.iter().map(|(x, y)| Position::xy(*x, *y)).collect();
        LinearRing::new(
            PositionSequence::from_positions(Dimension::XY, &positions).unwrap(),
            crs,
        )
        .unwrap()
    };
    Polygon::new(
        vec![
            ring_of([(0., 0.), (4., 0.), (4., 4.), (0., 0.)]),
            ring_of([(1., 1.), (2., 1.), (2., 2.), (1., 1.)]),
        ],
        crs,
    )
    .unwrap()
}

pub(crate) fn polygon(crs: Crs) -> Polygon {
    Polygon::new(vec![ring(crs, 0., 10.), ring(crs, 2., 3.5)], crs).unwrap()
}
