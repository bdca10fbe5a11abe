//! Decoding of WKT text.

mod holder;
mod number;
mod parser;
mod tokenizer;

pub use number::parse_number;
pub use parser::WktParser;
pub use tokenizer::{Token, WktTokenizer};
