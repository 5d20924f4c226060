//! One-level catamorphism over [`Json`].
//!
//! A fold sees the payload of exactly one node. Recursion into list items or
//! object values is done by the caller folding each child, so the traversal
//! order stays with whoever needs it.

use std::marker::PhantomData;

use crate::value::{Json, JsonMap, Repr};

/// Six handlers, one per variant. None has a default body: an implementation
/// that forgets a variant does not compile.
pub trait JsonFold<'a> {
    type Output;

    fn on_null(&mut self) -> Self::Output;
    fn on_bool(&mut self, value: bool) -> Self::Output;
    fn on_number(&mut self, value: f64) -> Self::Output;
    fn on_string(&mut self, value: &'a str) -> Self::Output;
    fn on_list(&mut self, items: &'a [Json]) -> Self::Output;
    fn on_object(&mut self, entries: &'a JsonMap) -> Self::Output;
}

impl Json {
    /// Invokes the handler matching this node's variant, and only that one.
    pub fn fold<'a, F: JsonFold<'a>>(&'a self, folder: &mut F) -> F::Output {
        match &self.0 {
            Repr::Null => folder.on_null(),
            Repr::Bool(b) => folder.on_bool(*b),
            Repr::Number(n) => folder.on_number(*n),
            Repr::String(s) => folder.on_string(s),
            Repr::List(xs) => folder.on_list(xs),
            Repr::Object(m) => folder.on_object(m),
        }
    }
}

/// A fold assembled from six closures.
///
/// ```
/// use jsoncore::{Fold, Json};
///
/// let v = Json::list([Json::null(), Json::bool_(true)]);
/// let width = v.fold(&mut Fold::new(
///     || 0,
///     |_| 0,
///     |_| 0,
///     |s| s.len(),
///     |items| items.len(),
///     |entries| entries.len(),
/// ));
/// assert_eq!(width, 2);
/// ```
pub struct Fold<'a, T, N, B, Num, S, L, O> {
    on_null: N,
    on_bool: B,
    on_number: Num,
    on_string: S,
    on_list: L,
    on_object: O,
    _marker: PhantomData<fn(&'a Json) -> T>,
}

impl<'a, T, N, B, Num, S, L, O> Fold<'a, T, N, B, Num, S, L, O>
where
    N: FnMut() -> T,
    B: FnMut(bool) -> T,
    Num: FnMut(f64) -> T,
    S: FnMut(&'a str) -> T,
    L: FnMut(&'a [Json]) -> T,
    O: FnMut(&'a JsonMap) -> T,
{
    pub fn new(
        on_null: N,
        on_bool: B,
        on_number: Num,
        on_string: S,
        on_list: L,
        on_object: O,
    ) -> Self {
        Self {
            on_null,
            on_bool,
            on_number,
            on_string,
            on_list,
            on_object,
            _marker: PhantomData,
        }
    }
}

impl<'a, T, N, B, Num, S, L, O> JsonFold<'a> for Fold<'a, T, N, B, Num, S, L, O>
where
    N: FnMut() -> T,
    B: FnMut(bool) -> T,
    Num: FnMut(f64) -> T,
    S: FnMut(&'a str) -> T,
    L: FnMut(&'a [Json]) -> T,
    O: FnMut(&'a JsonMap) -> T,
{
    type Output = T;

    fn on_null(&mut self) -> T {
        (self.on_null)()
    }
    fn on_bool(&mut self, value: bool) -> T {
        (self.on_bool)(value)
    }
    fn on_number(&mut self, value: f64) -> T {
        (self.on_number)(value)
    }
    fn on_string(&mut self, value: &'a str) -> T {
        (self.on_string)(value)
    }
    fn on_list(&mut self, items: &'a [Json]) -> T {
        (self.on_list)(items)
    }
    fn on_object(&mut self, entries: &'a JsonMap) -> T {
        (self.on_object)(entries)
    }
}

// Scalar projections. Each is a fold that answers for one variant.
impl Json {
    pub fn is_null(&self) -> bool {
        self.fold(&mut Fold::new(
            || true,
            |_| false,
            |_| false,
            |_| false,
            |_| false,
            |_| false,
        ))
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.fold(&mut Fold::new(|| None, Some, |_| None, |_| None, |_| None, |_| None))
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.fold(&mut Fold::new(|| None, |_| None, Some, |_| None, |_| None, |_| None))
    }

    pub fn as_str(&self) -> Option<&str> {
        self.fold(&mut Fold::new(|| None, |_| None, |_| None, Some, |_| None, |_| None))
    }

    pub fn as_list(&self) -> Option<&[Json]> {
        self.fold(&mut Fold::new(|| None, |_| None, |_| None, |_| None, Some, |_| None))
    }

    pub fn as_object(&self) -> Option<&JsonMap> {
        self.fold(&mut Fold::new(|| None, |_| None, |_| None, |_| None, |_| None, Some))
    }

    /// Container nesting: 0 for a scalar, 1 for `[]`. Reading the rendered
    /// text back needs `ParseOptions::max_depth` of at least this.
    pub fn depth(&self) -> usize {
        self.fold(&mut Fold::new(
            || 0,
            |_| 0,
            |_| 0,
            |_| 0,
            |items: &[Json]| 1 + items.iter().map(Json::depth).max().unwrap_or(0),
            |entries: &JsonMap| 1 + entries.values().map(Json::depth).max().unwrap_or(0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls {
        hits: Vec<&'static str>,
    }

    impl<'a> JsonFold<'a> for Calls {
        type Output = &'static str;

        fn on_null(&mut self) -> &'static str {
            self.hits.push("null");
            "null"
        }
        fn on_bool(&mut self, _: bool) -> &'static str {
            self.hits.push("bool");
            "bool"
        }
        fn on_number(&mut self, _: f64) -> &'static str {
            self.hits.push("number");
            "number"
        }
        fn on_string(&mut self, _: &'a str) -> &'static str {
            self.hits.push("string");
            "string"
        }
        fn on_list(&mut self, _: &'a [Json]) -> &'static str {
            self.hits.push("list");
            "list"
        }
        fn on_object(&mut self, _: &'a JsonMap) -> &'static str {
            self.hits.push("object");
            "object"
        }
    }

    #[test]
    fn exactly_one_handler_runs_per_fold() {
        let vals = [
            Json::null(),
            Json::bool_(false),
            Json::number(1.5),
            Json::string("s"),
            Json::list([Json::null(), Json::null()]),
            Json::object([("k", Json::list([]))]),
        ];
        for v in &vals {
            let mut calls = Calls::default();
            let out = v.fold(&mut calls);
            assert_eq!(calls.hits, vec![out]);
            assert_eq!(out, v.tag().as_str());
        }
    }

    #[test]
    fn fold_is_one_level_deep() {
        let v = Json::list([Json::list([Json::list([])])]);
        let mut calls = Calls::default();
        v.fold(&mut calls);
        assert_eq!(calls.hits, vec!["list"]);
    }

    #[test]
    fn recursive_fold_composed_by_caller() {
        let v = Json::object([("a", Json::list([Json::object([("b", Json::null())])]))]);
        assert_eq!(v.depth(), 3);
        assert_eq!(Json::list([]).depth(), 1);
        assert_eq!(Json::number(0.0).depth(), 0);
    }

    #[test]
    fn projections_answer_only_for_their_variant() {
        assert!(Json::null().is_null());
        assert!(!Json::bool_(false).is_null());
        assert_eq!(Json::bool_(true).as_bool(), Some(true));
        assert_eq!(Json::number(2.5).as_f64(), Some(2.5));
        assert_eq!(Json::string("2.5").as_f64(), None);
        assert_eq!(Json::string("hi").as_str(), Some("hi"));
        assert_eq!(Json::list([Json::null()]).as_list().map(<[Json]>::len), Some(1));
        assert!(Json::list([]).as_object().is_none());
    }
}
