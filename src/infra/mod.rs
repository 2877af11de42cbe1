//! Profile decoding and schema validation

pub mod codec;
mod profile;
mod schema;

pub use codec::{DecodeError, ProfileCodec};
pub use profile::{ProfileReadError, parse_plain, read_profile};
pub use schema::{EMBEDDED_SCHEMA, SchemaError, SchemaLoadError, SchemaValidator};
