//! Codecs for the well-known geometry representations.

pub mod wkb;
pub mod wkt;

/// Deepest nesting of geometry records the decoders accept. Each collection level counts, as does
/// the innermost geometry.
pub const MAX_NESTING_DEPTH: usize = 128;
