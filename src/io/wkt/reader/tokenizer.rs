use crate::dialect::{Dialect, Keyword};
use crate::error::{GeoWkxError, Result};
use crate::geometry::{Dimension, PositionSequence, PositionSequenceBuilder};
use crate::io::wkt::reader::number::{is_number_char, is_number_start, parse_number};

/// A lexical unit of WKT.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `(` or `[`
    OpenList,
    /// `)` or `]`
    CloseList,
    /// `,`
    ElementSeparator,
    Keyword(Keyword),
    /// A run of numeric positions, already converted.
    Positions(PositionSequence),
    /// A double-quoted string, without the quotes.
    Text(String),
    End,
}

/// Splits WKT into [`Token`]s according to a [`Dialect`].
///
/// The coordinate dimension is fixed by the first position sequence (or an explicit ZM marker)
/// and applies to every later sequence in the same input.
pub struct WktTokenizer<'a> {
    text: &'a str,
    dialect: &'a Dialect,
    position: usize,
    token_start: usize,
    dimension: Option<Dimension>,
    measured: bool,
    finished: bool,
}

impl<'a> WktTokenizer<'a> {
    pub fn new(text: &'a str, dialect: &'a Dialect) -> Self {
        Self {
            text,
            dialect,
            position: 0,
            token_start: 0,
            dimension: None,
            measured: false,
            finished: false,
        }
    }

    /// Byte offset of the most recently returned token.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The coordinate dimension of the decoded positions, once known. Always XY for a 2D-only
    /// dialect.
    pub fn dimension(&self) -> Option<Dimension> {
        self.dimension.map(|dim| self.dialect.effective_dimension(dim))
    }

    /// Whether a measured tag or `M` marker has been seen.
    pub fn is_measured(&self) -> bool {
        self.measured && !self.dialect.limited_to_2d
    }

    pub(crate) fn error_at(&self, position: usize, message: impl Into<String>) -> GeoWkxError {
        GeoWkxError::malformed_wkt(self.text, position, message)
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    fn is_open(&self, c: char) -> bool {
        c == '(' || c == '[' || c == self.dialect.open_list
    }

    fn is_close(&self, c: char) -> bool {
        c == ')' || c == ']' || c == self.dialect.close_list
    }

    fn is_separator(&self, c: char) -> bool {
        c == self.dialect.element_separator
    }

    /// Consume a leading `SRID=<int>;` if present, ignoring case.
    pub fn match_optional_srid(&mut self) -> Result<Option<i32>> {
        self.skip_whitespace();
        let start = self.position;
        let rest = &self.text[start..];
        if !rest
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("SRID="))
        {
            return Ok(None);
        }
        let digits_start = start + 5;
        let Some(semicolon) = self.text[digits_start..].find(';') else {
            return Err(self.error_at(digits_start, "expected ';' after SRID"));
        };
        let digits = self.text[digits_start..digits_start + semicolon].trim();
        let srid = digits
            .parse::<i32>()
            .map_err(|_| self.error_at(digits_start, format!("invalid SRID \"{digits}\"")))?;
        self.position = digits_start + semicolon + 1;
        log::trace!("WKT SRID prefix {srid}");
        Ok(Some(srid))
    }

    /// Read the next token. Returns [`Token::End`] at the end of input, repeatedly.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.token_start = self.position;
        let Some(c) = self.text[self.position..].chars().next() else {
            return Ok(Token::End);
        };

        if self.is_open(c) {
            self.position += c.len_utf8();
            return Ok(Token::OpenList);
        }
        if self.is_close(c) {
            self.position += c.len_utf8();
            return Ok(Token::CloseList);
        }
        if self.is_separator(c) {
            self.position += c.len_utf8();
            return Ok(Token::ElementSeparator);
        }
        if c == '"' {
            return self.read_text();
        }
        if c.is_ascii_alphabetic() {
            return self.read_word();
        }
        if c.is_ascii() && is_number_start(c as u8) {
            return self.read_positions().map(Token::Positions);
        }
        Err(self.error_at(self.position, format!("unexpected character '{c}'")))
    }

    fn read_text(&mut self) -> Result<Token> {
        let start = self.position + 1;
        let Some(len) = self.text[start..].find('"') else {
            return Err(self.error_at(self.position, "unterminated string"));
        };
        self.position = start + len + 1;
        Ok(Token::Text(self.text[start..start + len].to_string()))
    }

    fn read_word(&mut self) -> Result<Token> {
        let start = self.position;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.position += 1;
        }
        let token = self.dialect.match_keyword(self.text, start, self.position)?;
        match token {
            Token::Keyword(Keyword::Geometry { measured: true, .. }) => self.measured = true,
            Token::Keyword(Keyword::ZmMarker(dim)) => self.set_dimension(dim, start)?,
            _ => {}
        }
        Ok(token)
    }

    fn set_dimension(&mut self, dim: Dimension, position: usize) -> Result<()> {
        match self.dimension {
            Some(known) if known != dim => Err(self.error_at(
                position,
                format!("{dim} marker conflicts with {known} coordinates"),
            )),
            _ => {
                self.dimension = Some(dim);
                self.measured |= dim.has_m();
                Ok(())
            }
        }
    }

    /// Count the positions up to the closing list character, and the components of the first.
    fn scan_ahead(&self) -> (usize, usize) {
        let mut positions = 1;
        let mut components = 0;
        let mut in_number = false;
        let mut first = true;
        for c in self.text[self.position..].chars() {
            if self.is_close(c) || self.is_open(c) {
                break;
            }
            if self.is_separator(c) {
                positions += 1;
                first = false;
                in_number = false;
                continue;
            }
            let numeric = c.is_ascii() && is_number_char(c as u8);
            if first && numeric && !in_number {
                components += 1;
            }
            in_number = numeric;
        }
        (positions, components)
    }

    fn read_positions(&mut self) -> Result<PositionSequence> {
        let (count, components) = self.scan_ahead();
        let dim = match self.dimension {
            Some(dim) => dim,
            None => {
                let dim = Dimension::from_size(components, self.measured).map_err(|_| {
                    self.error_at(
                        self.position,
                        format!("positions must have 2 to 4 coordinates, found {components}"),
                    )
                })?;
                self.dimension = Some(dim);
                dim
            }
        };
        // a 2D-only dialect keeps x and y and skips the rest
        let kept = self.dialect.effective_dimension(dim);
        log::trace!("WKT position sequence: {count} x {dim}, kept as {kept}");

        let mut builder = PositionSequenceBuilder::with_capacity(kept, count);
        loop {
            for i in 0..dim.size() {
                self.skip_whitespace();
                let start = self.position;
                if !self.peek().is_some_and(is_number_start) {
                    return Err(self.error_at(start, format!("expected {dim} coordinate")));
                }
                let (value, end) = parse_number(self.text, start)
                    .ok_or_else(|| self.error_at(start, "malformed number"))?;
                if i < kept.size() {
                    builder.push_coord(value);
                }
                self.position = end;
            }
            self.skip_whitespace();
            match self.peek() {
                Some(b) if self.is_separator(b as char) => self.position += 1,
                Some(b) if self.is_close(b as char) => break,
                None => break,
                Some(_) => {
                    let message = format!(
                        "expected '{}' or '{}'",
                        self.dialect.element_separator, self.dialect.close_list
                    );
                    return Err(self.error_at(self.position, message));
                }
            }
        }
        Ok(builder.finish())
    }
}

impl<'a> Iterator for WktTokenizer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if matches!(token, Ok(Token::End) | Err(_)) {
            self.finished = true;
        }
        Some(token)
    }
}
