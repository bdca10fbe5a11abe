use crate::crs::{resolve_crs, Crs};
use crate::dialect::{Dialect, Keyword};
use crate::error::{GeoWkxError, Result};
use crate::geometry::{Dimension, Geometry, GeometryType, PositionSequence};
use crate::io::wkt::reader::holder::{
    GeometryHolder, LinearPositionsHolder, LinearPositionsListHolder, PointHolder,
    PolygonListHolder,
};
use crate::io::wkt::reader::tokenizer::{Token, WktTokenizer};
use crate::io::MAX_NESTING_DEPTH;

/// Recursive-descent WKT parser over a [`WktTokenizer`].
pub struct WktParser<'a> {
    tokenizer: WktTokenizer<'a>,
    dialect: &'a Dialect,
    current: Token,
    depth: usize,
}

impl<'a> WktParser<'a> {
    pub fn new(text: &'a str, dialect: &'a Dialect) -> Self {
        Self {
            tokenizer: WktTokenizer::new(text, dialect),
            dialect,
            current: Token::End,
            depth: 0,
        }
    }

    /// Parse the whole input as a single geometry.
    ///
    /// With `crs`, the result is placed in that CRS after checking it against the SRID prefix and
    /// the coordinate dimension of the input.
    pub fn parse(mut self, crs: Option<&Crs>) -> Result<Geometry> {
        let srid = if self.dialect.srid_prefix {
            self.tokenizer.match_optional_srid()?
        } else {
            None
        };
        self.advance()?;
        let holder = self.parse_geometry()?;
        if self.current != Token::End {
            return Err(self.unexpected("end of input"));
        }

        let dimension = match self.tokenizer.dimension() {
            Some(dim) if self.tokenizer.is_measured() && !dim.has_m() => {
                return Err(self
                    .tokenizer
                    .error_at(0, format!("measured geometry with {dim} coordinates")));
            }
            Some(dim) => Some(dim),
            None if self.tokenizer.is_measured() => Some(Dimension::XYM),
            None => None,
        };
        let crs = resolve_crs(crs, srid.unwrap_or_default(), dimension)?;
        holder.into_geometry(&crs)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.tokenizer.next_token()?;
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> GeoWkxError {
        let found = match &self.current {
            Token::OpenList => format!("'{}'", self.dialect.open_list),
            Token::CloseList => format!("'{}'", self.dialect.close_list),
            Token::ElementSeparator => format!("'{}'", self.dialect.element_separator),
            Token::Keyword(Keyword::Geometry { geometry_type, .. }) => geometry_type.to_string(),
            Token::Keyword(Keyword::Empty) => "EMPTY".to_string(),
            Token::Keyword(Keyword::ZmMarker(dim)) => format!("{dim} marker"),
            Token::Positions(_) => "coordinates".to_string(),
            Token::Text(text) => format!("\"{text}\""),
            Token::End => "end of input".to_string(),
        };
        self.tokenizer.error_at(
            self.tokenizer.token_start(),
            format!("expected {expected}, found {found}"),
        )
    }

    fn expect_open_list(&mut self) -> Result<()> {
        if self.current != Token::OpenList {
            return Err(self.unexpected(&format!("'{}'", self.dialect.open_list)));
        }
        self.advance()
    }

    fn expect_close_list(&mut self) -> Result<()> {
        if self.current != Token::CloseList {
            return Err(self.unexpected(&format!("'{}'", self.dialect.close_list)));
        }
        self.advance()
    }

    /// Consume `EMPTY` if it is the current token.
    fn match_empty(&mut self) -> Result<bool> {
        if self.current == Token::Keyword(Keyword::Empty) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Consume an optional `Z`, `M` or `ZM` marker. The tokenizer records its dimension.
    fn skip_zm_marker(&mut self) -> Result<()> {
        if matches!(self.current, Token::Keyword(Keyword::ZmMarker(_))) {
            self.advance()?;
        }
        Ok(())
    }

    /// Consume a member tag if present, failing if it names another type.
    fn skip_member_tag(&mut self, expected: GeometryType) -> Result<()> {
        if let Token::Keyword(Keyword::Geometry { geometry_type, .. }) = self.current {
            if geometry_type != expected {
                return Err(self.unexpected(expected.name()));
            }
            self.advance()?;
            self.skip_zm_marker()?;
        }
        Ok(())
    }

    fn take_positions(&mut self) -> Result<PositionSequence> {
        match std::mem::replace(&mut self.current, Token::End) {
            Token::Positions(positions) => {
                self.advance()?;
                Ok(positions)
            }
            other => {
                self.current = other;
                Err(self.unexpected("coordinates"))
            }
        }
    }

    /// `'(' element (',' element)* ')'`
    fn parse_list<T>(&mut self, mut element: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        self.expect_open_list()?;
        let mut items = vec![];
        loop {
            items.push(element(self)?);
            match self.current {
                Token::CloseList => {
                    self.advance()?;
                    return Ok(items);
                }
                Token::ElementSeparator => self.advance()?,
                _ => {
                    let expected = format!(
                        "'{}' or '{}'",
                        self.dialect.element_separator, self.dialect.close_list
                    );
                    return Err(self.unexpected(&expected));
                }
            }
        }
    }

    fn parse_geometry(&mut self) -> Result<GeometryHolder> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(self.tokenizer.error_at(
                self.tokenizer.token_start(),
                format!("geometries nested deeper than {MAX_NESTING_DEPTH} levels"),
            ));
        }
        self.depth += 1;
        let holder = self.parse_tagged_text();
        self.depth -= 1;
        holder
    }

    /// `tag [marker] (EMPTY | text)`
    fn parse_tagged_text(&mut self) -> Result<GeometryHolder> {
        let Token::Keyword(Keyword::Geometry { geometry_type, .. }) = self.current else {
            return Err(self.unexpected("geometry keyword"));
        };
        self.advance()?;
        self.skip_zm_marker()?;
        if self.match_empty()? {
            return Ok(empty_holder(geometry_type));
        }

        let holder = match geometry_type {
            GeometryType::Point => GeometryHolder::Point(self.parse_point_text()?),
            GeometryType::LineString => GeometryHolder::LineString(self.parse_linear_text()?),
            GeometryType::LinearRing => GeometryHolder::LinearRing(self.parse_linear_text()?),
            GeometryType::Polygon => GeometryHolder::Polygon(self.parse_polygon_text()?),
            GeometryType::MultiPoint => GeometryHolder::MultiPoint(self.parse_multi_point_text()?),
            GeometryType::MultiLineString => {
                GeometryHolder::MultiLineString(self.parse_multi_line_string_text()?)
            }
            GeometryType::MultiPolygon => {
                GeometryHolder::MultiPolygon(self.parse_multi_polygon_text()?)
            }
            GeometryType::GeometryCollection => {
                GeometryHolder::GeometryCollection(self.parse_list(Self::parse_geometry)?)
            }
        };
        Ok(holder)
    }

    /// `'(' position ')'`
    fn parse_point_text(&mut self) -> Result<PointHolder> {
        self.expect_open_list()?;
        let start = self.tokenizer.token_start();
        let positions = self.take_positions()?;
        if positions.len() != 1 {
            return Err(self.tokenizer.error_at(
                start,
                format!("a point has one position, found {}", positions.len()),
            ));
        }
        self.expect_close_list()?;
        Ok(PointHolder(positions.get(0)))
    }

    /// `EMPTY | '(' positions ')'`
    fn parse_linear_text(&mut self) -> Result<LinearPositionsHolder> {
        if self.match_empty()? {
            return Ok(LinearPositionsHolder(None));
        }
        self.expect_open_list()?;
        let positions = self.take_positions()?;
        self.expect_close_list()?;
        Ok(LinearPositionsHolder(Some(positions)))
    }

    /// `EMPTY | '(' linear_text (',' linear_text)* ')'`
    fn parse_polygon_text(&mut self) -> Result<LinearPositionsListHolder> {
        if self.match_empty()? {
            return Ok(LinearPositionsListHolder::default());
        }
        Ok(LinearPositionsListHolder(
            self.parse_list(Self::parse_linear_text)?,
        ))
    }

    /// Both `MULTIPOINT(1 2,3 4)` and `MULTIPOINT((1 2),(3 4))`; members may be `EMPTY` or tagged.
    fn parse_multi_point_text(&mut self) -> Result<Vec<PointHolder>> {
        self.expect_open_list()?;
        if matches!(self.current, Token::Positions(_)) {
            let positions = self.take_positions()?;
            self.expect_close_list()?;
            return Ok(positions.positions().map(|p| PointHolder(Some(p))).collect());
        }

        let mut points = vec![];
        loop {
            self.skip_member_tag(GeometryType::Point)?;
            if self.match_empty()? {
                points.push(PointHolder(None));
            } else {
                points.push(self.parse_point_text()?);
            }
            match self.current {
                Token::CloseList => {
                    self.advance()?;
                    return Ok(points);
                }
                Token::ElementSeparator => self.advance()?,
                _ => {
                    let expected = format!(
                        "'{}' or '{}'",
                        self.dialect.element_separator, self.dialect.close_list
                    );
                    return Err(self.unexpected(&expected));
                }
            }
        }
    }

    fn parse_multi_line_string_text(&mut self) -> Result<LinearPositionsListHolder> {
        let lines = self.parse_list(|parser| {
            parser.skip_member_tag(GeometryType::LineString)?;
            parser.parse_linear_text()
        })?;
        Ok(LinearPositionsListHolder(lines))
    }

    fn parse_multi_polygon_text(&mut self) -> Result<PolygonListHolder> {
        let polygons = self.parse_list(|parser| {
            parser.skip_member_tag(GeometryType::Polygon)?;
            parser.parse_polygon_text()
        })?;
        Ok(PolygonListHolder(polygons))
    }
}

fn empty_holder(geometry_type: GeometryType) -> GeometryHolder {
    match geometry_type {
        GeometryType::Point => GeometryHolder::Point(PointHolder(None)),
        GeometryType::LineString => GeometryHolder::LineString(LinearPositionsHolder(None)),
        GeometryType::LinearRing => GeometryHolder::LinearRing(LinearPositionsHolder(None)),
        GeometryType::Polygon => GeometryHolder::Polygon(LinearPositionsListHolder::default()),
        GeometryType::MultiPoint => GeometryHolder::MultiPoint(vec![]),
        GeometryType::MultiLineString => {
            GeometryHolder::MultiLineString(LinearPositionsListHolder::default())
        }
        GeometryType::MultiPolygon => GeometryHolder::MultiPolygon(PolygonListHolder::default()),
        GeometryType::GeometryCollection => GeometryHolder::GeometryCollection(vec![]),
    }
}
