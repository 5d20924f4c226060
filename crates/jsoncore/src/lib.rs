// JsonCore crate
pub mod access;
pub mod error;
pub mod fold;
pub mod parse;
pub mod render;
pub mod value;

pub use access::{Accessor, FromJson, Segment};
pub use error::{AccessError, ParseError, ParseErrorKind, PathError, PathErrorReason, TypeMismatchError};
pub use fold::{Fold, JsonFold};
pub use parse::{parse, parse_slice, parse_slice_with, parse_with, ParseOptions, DEFAULT_MAX_DEPTH};
pub use render::{render, render_pretty, write_canonical};
pub use value::{Json, JsonMap, JsonTag};
