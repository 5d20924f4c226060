//! Canonical text for a [`Json`] tree.
//!
//! Output is strict JSON: `"`-quoted strings, no insignificant whitespace,
//! object keys in insertion order. Numbers use the shortest decimal that
//! reads back to the same `f64`; exponent form outside `[1e-6, 1e21)`.
//! Non-finite numbers have no JSON spelling and render as `null`.
//!
//! Rendering recurses once per container level, as does dropping a tree.
//! Parsed trees are bounded by `ParseOptions::max_depth`; a tree built in
//! code tens of thousands of levels deep can exhaust the thread's stack.
//! Text rendered from a tree deeper than the reader's `max_depth` is
//! rejected on the way back in; [`Json::depth`] gives the bound to pass.

use std::fmt::{self, Write as _};

use crate::fold::JsonFold;
use crate::value::{Json, JsonMap};

pub fn render(v: &Json) -> String {
    let mut out = String::new();
    write_canonical(v, &mut out);
    out
}

/// Same scalars as [`render`], two-space indented containers.
pub fn render_pretty(v: &Json) -> String {
    let mut out = String::new();
    v.fold(&mut Renderer {
        out: &mut out,
        indent: Some(0),
    });
    out
}

pub fn write_canonical(v: &Json, out: &mut String) {
    v.fold(&mut Renderer { out, indent: None });
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

struct Renderer<'o> {
    out: &'o mut String,
    /// Current depth when pretty-printing.
    indent: Option<usize>,
}

impl Renderer<'_> {
    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }

    fn child(&mut self, v: &Json) {
        let outer = self.indent;
        self.indent = outer.map(|d| d + 1);
        v.fold(self);
        self.indent = outer;
    }

    fn open(&mut self, first: bool, separator: char) {
        if !first {
            self.out.push(separator);
        }
        if let Some(d) = self.indent {
            self.newline(d + 1);
        }
    }

    fn close(&mut self, bracket: char) {
        if let Some(d) = self.indent {
            self.newline(d);
        }
        self.out.push(bracket);
    }
}

impl<'a> JsonFold<'a> for Renderer<'_> {
    type Output = ();

    fn on_null(&mut self) {
        self.out.push_str("null");
    }

    fn on_bool(&mut self, value: bool) {
        self.out.push_str(if value { "true" } else { "false" });
    }

    fn on_number(&mut self, value: f64) {
        emit_number(self.out, value);
    }

    fn on_string(&mut self, value: &'a str) {
        emit_json_string(self.out, value);
    }

    fn on_list(&mut self, items: &'a [Json]) {
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            self.open(i == 0, ',');
            self.child(item);
        }
        self.close(']');
    }

    fn on_object(&mut self, entries: &'a JsonMap) {
        if entries.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        for (i, (k, v)) in entries.iter().enumerate() {
            self.open(i == 0, ',');
            emit_json_string(self.out, k);
            self.out.push(':');
            if self.indent.is_some() {
                self.out.push(' ');
            }
            self.child(v);
        }
        self.close('}');
    }
}

pub(crate) fn emit_number(out: &mut String, n: f64) {
    if !n.is_finite() {
        out.push_str("null");
        return;
    }
    let mag = n.abs();
    // fmt::Write for String is infallible
    let _ = if n == 0.0 || (1e-6..1e21).contains(&mag) {
        write!(out, "{n}")
    } else {
        write!(out, "{n:e}")
    };
}

pub(crate) fn emit_json_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str(r#"\""#),
            '\\' => out.push_str(r"\\"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '\t' => out.push_str(r"\t"),
            '\u{08}' => out.push_str(r"\b"),
            '\u{0C}' => out.push_str(r"\f"),
            c if (c as u32) <= 0x1F => {
                let v = c as u32;
                out.push_str(r"\u00");
                out.push(nybble_lower(v >> 4));
                out.push(nybble_lower(v & 0xF));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn nybble_lower(n: u32) -> char {
    char::from_digit(n, 16).unwrap_or('?')
}
