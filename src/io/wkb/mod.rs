//! Reading and writing Well-Known Binary in any [`Dialect`][crate::dialect::Dialect].

mod api;
pub mod buffer;
pub mod common;
pub(crate) mod reader;
pub(crate) mod writer;

pub use api::{from_hex_wkb, from_wkb, to_hex_wkb, to_wkb};
pub use buffer::ByteBuffer;
pub use common::{Endianness, WKBType};
pub use reader::WkbReader;
pub use writer::{wkb_size, WkbWriter};
