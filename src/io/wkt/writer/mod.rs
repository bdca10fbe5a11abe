//! Encoding of geometries as WKT text.

use std::fmt::Write;

use crate::dialect::Dialect;
use crate::error::{GeoWkxError, Result};
use crate::geometry::{
    Geometry, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
    PositionSequence,
};

/// Writes a geometry as WKT according to a [`Dialect`].
pub struct WktWriter<'a> {
    dialect: &'a Dialect,
    out: String,
}

impl<'a> WktWriter<'a> {
    pub fn new(dialect: &'a Dialect) -> Self {
        Self {
            dialect,
            out: String::new(),
        }
    }

    /// Write `geom`, prefixed with its SRID where the dialect has a prefix, and return the text.
    pub fn write(mut self, geom: &Geometry) -> Result<String> {
        self.dialect.add_srid(&mut self.out, geom.srid());
        self.write_geometry(geom, false)?;
        Ok(self.out)
    }

    fn write_geometry(&mut self, geom: &Geometry, in_geometry_collection: bool) -> Result<()> {
        self.dialect.add_geometry_tag(
            &mut self.out,
            geom.geometry_type(),
            geom.dimension(),
            in_geometry_collection,
        )?;
        if geom.is_empty() {
            self.write_empty();
            return Ok(());
        }
        match geom {
            Geometry::Point(g) => self.write_point_text(g)?,
            Geometry::LineString(g) => self.write_line_string_text(g)?,
            Geometry::LinearRing(g) => self.write_linear_ring_text(g)?,
            Geometry::Polygon(g) => self.write_polygon_text(g)?,
            Geometry::MultiPoint(g) => self.write_multi_point_text(g)?,
            Geometry::MultiLineString(g) => self.write_multi_line_string_text(g)?,
            Geometry::MultiPolygon(g) => self.write_multi_polygon_text(g)?,
            Geometry::GeometryCollection(g) => {
                self.out.push(self.dialect.open_list);
                for (i, member) in g.geometries().iter().enumerate() {
                    if i > 0 {
                        self.out.push(self.dialect.element_separator);
                    }
                    self.write_geometry(member, true)?;
                }
                self.out.push(self.dialect.close_list);
            }
        }
        Ok(())
    }

    fn write_empty(&mut self) {
        if !self.out.ends_with(' ') {
            self.out.push(' ');
        }
        self.out.push_str("EMPTY");
    }

    fn write_coords(&mut self, coords: &[f64]) -> Result<()> {
        let size = if self.dialect.limited_to_2d {
            2
        } else {
            coords.len()
        };
        for (i, value) in coords[..size].iter().enumerate() {
            if !value.is_finite() {
                return Err(GeoWkxError::ValueOutOfRange(format!(
                    "coordinate {value} has no WKT representation"
                )));
            }
            if i > 0 {
                self.out.push(' ');
            }
            write_number(&mut self.out, *value, self.dialect.max_fraction_digits);
        }
        Ok(())
    }

    /// Positions separated by the element separator, without enclosing list characters.
    fn write_positions(&mut self, positions: &PositionSequence) -> Result<()> {
        for (i, coords) in positions.coord_slices().enumerate() {
            if i > 0 {
                self.out.push(self.dialect.element_separator);
            }
            self.write_coords(coords)?;
        }
        Ok(())
    }

    fn write_positions_list(&mut self, positions: &PositionSequence) -> Result<()> {
        if positions.is_empty() {
            self.write_empty();
            return Ok(());
        }
        self.out.push(self.dialect.open_list);
        self.write_positions(positions)?;
        self.out.push(self.dialect.close_list);
        Ok(())
    }

    fn write_point_text(&mut self, point: &Point) -> Result<()> {
        match point.position() {
            Some(position) => {
                self.out.push(self.dialect.open_list);
                self.write_coords(position.coords())?;
                self.out.push(self.dialect.close_list);
            }
            None => self.write_empty(),
        }
        Ok(())
    }

    fn write_line_string_text(&mut self, line: &LineString) -> Result<()> {
        self.write_positions_list(line.positions())
    }

    fn write_linear_ring_text(&mut self, ring: &LinearRing) -> Result<()> {
        self.write_positions_list(ring.positions())
    }

    fn write_polygon_text(&mut self, polygon: &Polygon) -> Result<()> {
        if polygon.is_empty() {
            self.write_empty();
            return Ok(());
        }
        self.out.push(self.dialect.open_list);
        for (i, ring) in polygon.rings().iter().enumerate() {
            if i > 0 {
                self.out.push(self.dialect.element_separator);
            }
            self.write_linear_ring_text(ring)?;
        }
        self.out.push(self.dialect.close_list);
        Ok(())
    }

    fn write_multi_point_text(&mut self, multi_point: &MultiPoint) -> Result<()> {
        let points = multi_point.points();
        let bare =
            self.dialect.write_multi_point_as_positions && !points.iter().any(Point::is_empty);
        self.out.push(self.dialect.open_list);
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                self.out.push(self.dialect.element_separator);
            }
            match point.position() {
                Some(position) if bare => self.write_coords(position.coords())?,
                _ => self.write_point_text(point)?,
            }
        }
        self.out.push(self.dialect.close_list);
        Ok(())
    }

    fn write_multi_line_string_text(&mut self, multi_line_string: &MultiLineString) -> Result<()> {
        self.out.push(self.dialect.open_list);
        for (i, line) in multi_line_string.lines().iter().enumerate() {
            if i > 0 {
                self.out.push(self.dialect.element_separator);
            }
            self.write_line_string_text(line)?;
        }
        self.out.push(self.dialect.close_list);
        Ok(())
    }

    fn write_multi_polygon_text(&mut self, multi_polygon: &MultiPolygon) -> Result<()> {
        self.out.push(self.dialect.open_list);
        for (i, polygon) in multi_polygon.polygons().iter().enumerate() {
            if i > 0 {
                self.out.push(self.dialect.element_separator);
            }
            self.write_polygon_text(polygon)?;
        }
        self.out.push(self.dialect.close_list);
        Ok(())
    }
}

/// Shortest round-trip representation of `value`, with at most `max_fraction_digits` fraction
/// digits.
pub(crate) fn write_number(out: &mut String, value: f64, max_fraction_digits: usize) {
    let start = out.len();
    let _ = write!(out, "{value}");
    let Some(dot) = out[start..].find('.') else {
        return;
    };
    if out.len() - (start + dot + 1) <= max_fraction_digits {
        return;
    }
    out.truncate(start);
    let _ = write!(out, "{value:.max_fraction_digits$}");
    if max_fraction_digits == 0 {
        return;
    }
    let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
    out.truncate(trimmed);
    if &out[start..] == "-0" {
        out.truncate(start);
        out.push('0');
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crs::Crs;
    use crate::dialect::{HANA, MYSQL, POSTGIS_EWKB_1, SFA_1_1_0, SFA_1_2_1};
    use crate::geometry::{Dimension, GeometryCollection, Position};
    use crate::test::linestring::ls_xyz;
    use crate::test::multipoint::mp_xy;
    use crate::test::polygon::poly_xy;

    fn number(value: f64, max: usize) -> String {
        let mut out = String::new();
        write_number(&mut out, value, max);
        out
    }

    #[test]
    fn numbers() {
        assert_eq!(number(1., 15), "1");
        assert_eq!(number(-2.5, 15), "-2.5");
        assert_eq!(number(0.1 + 0.2, 15), "0.3");
        assert_eq!(number(0.1 + 0.2, 24), "0.30000000000000004");
        assert_eq!(number(1e-20, 15), "0");
        assert_eq!(number(-1e-20, 15), "0");
        assert_eq!(number(1234.5, 2), "1234.5");
    }

    #[test]
    fn point() {
        let crs = Crs::from_srid(4326);
        let point: Geometry = Point::new(Position::xy(1., 2.), crs).unwrap().into();
        assert_eq!(WktWriter::new(&SFA_1_1_0).write(&point).unwrap(), "POINT(1 2)");
        assert_eq!(
            WktWriter::new(&POSTGIS_EWKB_1).write(&point).unwrap(),
            "SRID=4326;POINT(1 2)"
        );
    }

    #[test]
    fn iso_markers() {
        let geom: Geometry = ls_xyz().into();
        assert_eq!(
            WktWriter::new(&SFA_1_2_1).write(&geom).unwrap(),
            "LINESTRING Z (0 0 1,1 1 2)"
        );
        // dropped to two dimensions
        assert_eq!(
            WktWriter::new(&MYSQL).write(&geom).unwrap(),
            "LINESTRING(0 0,1 1)"
        );
    }

    #[test]
    fn empties() {
        let xyz = Crs::undefined(Dimension::XYZ);
        let xym = Crs::undefined(Dimension::XYM);
        let write =
            |dialect: &Dialect, geom: Geometry| WktWriter::new(dialect).write(&geom).unwrap();

        assert_eq!(write(&SFA_1_2_1, Point::empty(xyz).into()), "POINT Z EMPTY");
        assert_eq!(write(&SFA_1_1_0, Point::empty(xyz).into()), "POINT EMPTY");
        assert_eq!(write(&POSTGIS_EWKB_1, Point::empty(xyz).into()), "POINT EMPTY");
        assert_eq!(write(&POSTGIS_EWKB_1, Point::empty(xym).into()), "POINTM EMPTY");
        assert_eq!(
            write(&HANA, Polygon::empty(Crs::from_srid(4326)).into()),
            "SRID=4326;POLYGON EMPTY"
        );
    }

    #[test]
    fn multi_point_styles() {
        let geom: Geometry = mp_xy().into();
        assert_eq!(
            WktWriter::new(&POSTGIS_EWKB_1).write(&geom).unwrap(),
            "MULTIPOINT(0 1,2 3)"
        );
        assert_eq!(
            WktWriter::new(&SFA_1_1_0).write(&geom).unwrap(),
            "MULTIPOINT((0 1),(2 3))"
        );

        let crs = Crs::default();
        let with_empty: Geometry = MultiPoint::new(
            vec![Point::new(Position::xy(0., 1.), crs).unwrap(), Point::empty(crs)],
            crs,
        )
        .unwrap()
        .into();
        assert_eq!(
            WktWriter::new(&POSTGIS_EWKB_1).write(&with_empty).unwrap(),
            "MULTIPOINT((0 1),EMPTY)"
        );
    }

    #[test]
    fn polygon() {
        let geom: Geometry = poly_xy().into();
        assert_eq!(
            WktWriter::new(&SFA_1_1_0).write(&geom).unwrap(),
            "POLYGON((0 0,4 0,4 4,0 0),(1 1,2 1,2 2,1 1))"
        );
    }

    #[test]
    fn collection_members_are_tagged() {
        let crs = Crs::undefined(Dimension::XYM);
        let gc: Geometry = GeometryCollection::new(
            vec![
                Point::new(Position::xym(1., 2., 3.), crs).unwrap().into(),
                LineString::empty(crs).into(),
            ],
            crs,
        )
        .unwrap()
        .into();
        assert_eq!(
            WktWriter::new(&POSTGIS_EWKB_1).write(&gc).unwrap(),
            "GEOMETRYCOLLECTIONM(POINT(1 2 3),LINESTRING EMPTY)"
        );
        assert_eq!(
            WktWriter::new(&SFA_1_2_1).write(&gc).unwrap(),
            "GEOMETRYCOLLECTION M (POINT M (1 2 3),LINESTRING M EMPTY)"
        );
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let crs = Crs::default();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let point: Geometry = Point::new(Position::xy(1., value), crs).unwrap().into();
            assert!(matches!(
                WktWriter::new(&SFA_1_2_1).write(&point),
                Err(GeoWkxError::ValueOutOfRange(_))
            ));
        }

        // only the written coordinates are checked
        let xyz = Crs::undefined(Dimension::XYZ);
        let point: Geometry = Point::new(Position::xyz(1., 2., f64::NAN), xyz)
            .unwrap()
            .into();
        assert_eq!(WktWriter::new(&MYSQL).write(&point).unwrap(), "POINT(1 2)");
    }

    #[test]
    fn linear_ring_unsupported_in_sfa_1_1_0() {
        let geom: Geometry = LinearRing::empty(Crs::default()).into();
        assert!(WktWriter::new(&SFA_1_1_0).write(&geom).is_err());
        assert_eq!(
            WktWriter::new(&SFA_1_2_1).write(&geom).unwrap(),
            "LINEARRING EMPTY"
        );
    }
}
