use std::fmt;

use indexmap::IndexMap;

/// Insertion-ordered object payload. Equality ignores key order.
pub type JsonMap = IndexMap<String, Json>;

/// An immutable JSON tree.
///
/// The representation is private: contents are read through [`Json::fold`]
/// (or the projections built on it), never by matching on variants directly.
/// Numbers are always `f64`; integers beyond 2^53 lose exactness.
#[derive(Clone, PartialEq)]
pub struct Json(pub(crate) Repr);

// Invariant for Repr::Object:
// - keys strictly unique (duplicates collapse last-write-wins on construction)
// - iteration order is first-insertion order of each key
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Repr {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Json>),
    Object(JsonMap),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JsonTag {
    Null,
    Bool,
    Number,
    String,
    List,
    Object,
}

impl JsonTag {
    pub fn as_str(self) -> &'static str {
        match self {
            JsonTag::Null => "null",
            JsonTag::Bool => "bool",
            JsonTag::Number => "number",
            JsonTag::String => "string",
            JsonTag::List => "list",
            JsonTag::Object => "object",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "null" => Some(JsonTag::Null),
            "bool" => Some(JsonTag::Bool),
            "number" => Some(JsonTag::Number),
            "string" => Some(JsonTag::String),
            "list" => Some(JsonTag::List),
            "object" => Some(JsonTag::Object),
            _ => None,
        }
    }
}

impl fmt::Display for JsonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Json {
    pub fn null() -> Self {
        Json(Repr::Null)
    }
    pub fn bool_(b: bool) -> Self {
        Json(Repr::Bool(b))
    }
    pub fn number(n: f64) -> Self {
        Json(Repr::Number(n))
    }
    pub fn string<S: Into<String>>(s: S) -> Self {
        Json(Repr::String(s.into()))
    }
    pub fn list<I: IntoIterator<Item = Json>>(items: I) -> Self {
        Json(Repr::List(items.into_iter().collect()))
    }

    /// Builds an object from pairs in order. A repeated key replaces the
    /// earlier value and keeps the earlier position.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Json)>,
    {
        let mut map = JsonMap::new();
        for (k, v) in entries {
            map.insert(k.into(), v);
        }
        Json(Repr::Object(map))
    }

    pub fn tag(&self) -> JsonTag {
        match &self.0 {
            Repr::Null => JsonTag::Null,
            Repr::Bool(_) => JsonTag::Bool,
            Repr::Number(_) => JsonTag::Number,
            Repr::String(_) => JsonTag::String,
            Repr::List(_) => JsonTag::List,
            Repr::Object(_) => JsonTag::Object,
        }
    }
}

impl fmt::Debug for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Default for Json {
    fn default() -> Self {
        Json::null()
    }
}

impl From<bool> for Json {
    fn from(b: bool) -> Self {
        Json::bool_(b)
    }
}

impl From<f64> for Json {
    fn from(n: f64) -> Self {
        Json::number(n)
    }
}

impl From<f32> for Json {
    fn from(n: f32) -> Self {
        Json::number(f64::from(n))
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Json {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn from(n: $t) -> Self {
                    Json::number(n as f64)
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<&str> for Json {
    fn from(s: &str) -> Self {
        Json::string(s)
    }
}

impl From<String> for Json {
    fn from(s: String) -> Self {
        Json::string(s)
    }
}

impl From<Vec<Json>> for Json {
    fn from(items: Vec<Json>) -> Self {
        Json(Repr::List(items))
    }
}

impl From<JsonMap> for Json {
    fn from(map: JsonMap) -> Self {
        Json(Repr::Object(map))
    }
}

impl<T: Into<Json>> From<Option<T>> for Json {
    fn from(v: Option<T>) -> Self {
        v.map_or_else(Json::null, Into::into)
    }
}

impl FromIterator<Json> for Json {
    fn from_iter<I: IntoIterator<Item = Json>>(iter: I) -> Self {
        Json::list(iter)
    }
}

impl<K: Into<String>> FromIterator<(K, Json)> for Json {
    fn from_iter<I: IntoIterator<Item = (K, Json)>>(iter: I) -> Self {
        Json::object(iter)
    }
}

impl From<&serde_json::Value> for Json {
    fn from(v: &serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => Json::null(),
            J::Bool(b) => Json::bool_(*b),
            J::Number(n) => Json::number(n.as_f64().unwrap_or(f64::NAN)),
            J::String(s) => Json::string(s.as_str()),
            J::Array(xs) => xs.iter().map(Json::from).collect(),
            J::Object(m) => m.iter().map(|(k, v)| (k.as_str(), Json::from(v))).collect(),
        }
    }
}

impl From<&Json> for serde_json::Value {
    fn from(v: &Json) -> Self {
        use serde_json::Value as J;
        match &v.0 {
            Repr::Null => J::Null,
            Repr::Bool(b) => J::Bool(*b),
            Repr::Number(n) => serde_json::Number::from_f64(*n).map_or(J::Null, J::Number),
            Repr::String(s) => J::String(s.clone()),
            Repr::List(xs) => J::Array(xs.iter().map(J::from).collect()),
            Repr::Object(m) => J::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), J::from(v)))
                    .collect(),
            ),
        }
    }
}
