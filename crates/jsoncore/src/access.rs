//! Typed extraction along a key/index path.
//!
//! Each navigation step folds the current node into either the addressed
//! child or a [`PathErrorReason`]; the final node is converted by a
//! [`FromJson`] rule, which also goes through folds.

use std::fmt;

use crate::error::{AccessError, PathError, PathErrorReason, TypeMismatchError};
use crate::fold::Fold;
use crate::render::emit_json_string;
use crate::value::{Json, JsonMap, JsonTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'p> {
    Key(&'p str),
    Index(usize),
}

impl<'p> From<&'p str> for Segment<'p> {
    fn from(k: &'p str) -> Self {
        Segment::Key(k)
    }
}

impl<'p> From<&'p String> for Segment<'p> {
    fn from(k: &'p String) -> Self {
        Segment::Key(k)
    }
}

impl From<usize> for Segment<'_> {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

/// Keys other than identifiers (`a.b`, `0`, `""`) print as quoted strings so
/// they cannot be read as an index or as two segments.
impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) if is_plain_key(k) => f.write_str(k),
            Segment::Key(k) => f.write_str(&quoted(k)),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

fn is_plain_key(k: &str) -> bool {
    let mut chars = k.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quoted(k: &str) -> String {
    let mut out = String::with_capacity(k.len() + 2);
    emit_json_string(&mut out, k);
    out
}

/// Builds a `[Segment; N]` from keys and indices.
///
/// ```
/// use jsoncore::{path, Segment};
///
/// let p = path!["friends", 1];
/// assert_eq!(p, [Segment::Key("friends"), Segment::Index(1)]);
/// ```
#[macro_export]
macro_rules! path {
    ($($seg:expr),* $(,)?) => {
        [$($crate::Segment::from($seg)),*]
    };
}

fn render_path(path: &[Segment<'_>]) -> String {
    let mut out = String::from("$");
    for seg in path {
        match seg {
            Segment::Key(k) if is_plain_key(k) => {
                out.push('.');
                out.push_str(k);
            }
            Segment::Key(k) => {
                out.push('[');
                emit_json_string(&mut out, k);
                out.push(']');
            }
            Segment::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
        }
    }
    out
}

fn step<'a>(node: &'a Json, seg: Segment<'_>) -> Result<&'a Json, PathErrorReason> {
    let not_container = |found| Err(PathErrorReason::NotAContainer { found });
    node.fold(&mut Fold::new(
        || not_container(JsonTag::Null),
        |_| not_container(JsonTag::Bool),
        |_| not_container(JsonTag::Number),
        |_| not_container(JsonTag::String),
        |items: &'a [Json]| match seg {
            Segment::Index(i) => items
                .get(i)
                .ok_or(PathErrorReason::IndexOutOfRange { len: items.len() }),
            Segment::Key(_) => not_container(JsonTag::List),
        },
        |entries: &'a JsonMap| match seg {
            Segment::Key(k) => entries.get(k).ok_or(PathErrorReason::MissingKey),
            Segment::Index(_) => not_container(JsonTag::Object),
        },
    ))
}

/// A read-only view of one node of a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accessor<'a> {
    node: &'a Json,
}

impl<'a> Accessor<'a> {
    pub fn new(node: &'a Json) -> Self {
        Accessor { node }
    }

    pub fn node(&self) -> &'a Json {
        self.node
    }

    /// Walks `path`, stopping at the first segment that cannot be followed.
    pub fn at(&self, path: &[Segment<'_>]) -> Result<&'a Json, PathError> {
        let mut cur = self.node;
        for (segment_index, seg) in path.iter().enumerate() {
            cur = step(cur, *seg).map_err(|reason| PathError {
                segment_index,
                segment: seg.to_string(),
                reason,
            })?;
        }
        Ok(cur)
    }

    pub fn get<T: FromJson<'a>>(&self, path: &[Segment<'_>]) -> Result<T, AccessError> {
        let node = self.at(path)?;
        T::from_json(node).map_err(|expected| {
            AccessError::TypeMismatch(TypeMismatchError {
                path: render_path(path),
                expected,
                actual: node.tag(),
                target: T::TARGET,
            })
        })
    }

    /// Keys in insertion order, or `None` when this node is not an object.
    pub fn keys(&self) -> Option<Vec<&'a str>> {
        self.node
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
    }

    /// One accessor per item, or `None` when this node is not a list.
    pub fn items(&self) -> Option<Vec<Accessor<'a>>> {
        self.node
            .as_list()
            .map(|xs| xs.iter().map(Accessor::new).collect())
    }
}

impl Json {
    pub fn accessor(&self) -> Accessor<'_> {
        Accessor::new(self)
    }

    pub fn get<'a, T: FromJson<'a>>(&'a self, path: &[Segment<'_>]) -> Result<T, AccessError> {
        Accessor::new(self).get(path)
    }
}

/// Conversion from a node to a host type.
pub trait FromJson<'a>: Sized {
    /// Host type name used in mismatch reports.
    const TARGET: &'static str;

    /// Converts `node`, or names the variant that would have been accepted.
    fn from_json(node: &'a Json) -> Result<Self, JsonTag>;
}

impl<'a> FromJson<'a> for bool {
    const TARGET: &'static str = "bool";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        node.as_bool().ok_or(JsonTag::Bool)
    }
}

impl<'a> FromJson<'a> for f64 {
    const TARGET: &'static str = "f64";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        node.as_f64().ok_or(JsonTag::Number)
    }
}

impl<'a> FromJson<'a> for f32 {
    const TARGET: &'static str = "f32";

    #[allow(clippy::cast_possible_truncation)]
    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        node.as_f64().map(|n| n as f32).ok_or(JsonTag::Number)
    }
}

// Integral targets accept only whole numbers inside the target's range.
macro_rules! from_json_integer {
    ($($t:ty),*) => {
        $(
            impl<'a> FromJson<'a> for $t {
                const TARGET: &'static str = stringify!($t);

                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_precision_loss,
                    clippy::cast_sign_loss,
                    clippy::cast_lossless
                )]
                fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
                    let n = node.as_f64().ok_or(JsonTag::Number)?;
                    let lo = <$t>::MIN as f64;
                    // MAX + 1 is a power of two, exact in f64
                    let hi = <$t>::MAX as f64 + 1.0;
                    if n.fract() == 0.0 && n >= lo && n < hi {
                        Ok(n as $t)
                    } else {
                        Err(JsonTag::Number)
                    }
                }
            }
        )*
    };
}

from_json_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<'a> FromJson<'a> for String {
    const TARGET: &'static str = "String";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        node.as_str().map(str::to_owned).ok_or(JsonTag::String)
    }
}

impl<'a> FromJson<'a> for &'a str {
    const TARGET: &'static str = "&str";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        node.as_str().ok_or(JsonTag::String)
    }
}

impl<'a> FromJson<'a> for () {
    const TARGET: &'static str = "()";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        if node.is_null() {
            Ok(())
        } else {
            Err(JsonTag::Null)
        }
    }
}

impl<'a> FromJson<'a> for Accessor<'a> {
    const TARGET: &'static str = "Accessor";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        node.as_object()
            .map(|_| Accessor::new(node))
            .ok_or(JsonTag::Object)
    }
}

impl<'a> FromJson<'a> for Vec<Accessor<'a>> {
    const TARGET: &'static str = "Vec<Accessor>";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        Accessor::new(node).items().ok_or(JsonTag::List)
    }
}

impl<'a> FromJson<'a> for &'a [Json] {
    const TARGET: &'static str = "&[Json]";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        node.as_list().ok_or(JsonTag::List)
    }
}

impl<'a> FromJson<'a> for &'a JsonMap {
    const TARGET: &'static str = "&JsonMap";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        node.as_object().ok_or(JsonTag::Object)
    }
}

impl<'a> FromJson<'a> for &'a Json {
    const TARGET: &'static str = "&Json";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        Ok(node)
    }
}

impl<'a> FromJson<'a> for Json {
    const TARGET: &'static str = "Json";

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        Ok(node.clone())
    }
}

/// `null` reads as `None`; anything else must convert to `T`.
impl<'a, T: FromJson<'a>> FromJson<'a> for Option<T> {
    const TARGET: &'static str = T::TARGET;

    fn from_json(node: &'a Json) -> Result<Self, JsonTag> {
        if node.is_null() {
            Ok(None)
        } else {
            T::from_json(node).map(Some)
        }
    }
}
