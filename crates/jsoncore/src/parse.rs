//! Lenient JSON reader: strict JSON plus `'`-quoted strings.
//!
//! Recursive descent over bytes with one byte of lookahead. Tokenising and
//! tree building are interleaved; nothing is buffered besides the output.

use std::str::FromStr;

use crate::error::{ParseError, ParseErrorKind};
use crate::value::{Json, JsonMap};

pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest container nesting accepted; deeper input fails instead of
    /// recursing further.
    pub max_depth: usize,
    pub allow_single_quotes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_single_quotes: true,
        }
    }
}

impl ParseOptions {
    /// Plain RFC 8259 quoting.
    pub fn strict() -> Self {
        ParseOptions {
            allow_single_quotes: false,
            ..ParseOptions::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_single_quotes(mut self, allow: bool) -> Self {
        self.allow_single_quotes = allow;
        self
    }
}

pub fn parse(text: &str) -> Result<Json, ParseError> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Json, ParseError> {
    tracing::trace!(len = text.len(), "parse start");
    let mut p = Parser {
        src: text,
        bytes: text.as_bytes(),
        pos: 0,
        depth: 0,
        options,
    };
    let v = p.parse_value()?;
    p.skip_ws();
    if p.pos != p.bytes.len() {
        return Err(p.error(ParseErrorKind::TrailingCharacters));
    }
    tracing::trace!(tag = %v.tag(), "parse done");
    Ok(v)
}

pub fn parse_slice(bytes: &[u8]) -> Result<Json, ParseError> {
    parse_slice_with(bytes, &ParseOptions::default())
}

pub fn parse_slice_with(bytes: &[u8], options: &ParseOptions) -> Result<Json, ParseError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => parse_with(s, options),
        Err(e) => Err(ParseError::at(bytes, e.valid_up_to(), ParseErrorKind::InvalidUtf8)),
    }
}

impl FromStr for Json {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    options: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(self.bytes, self.pos, kind)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    // `pos` only ever rests on a char boundary between tokens.
    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.src.get(self.pos..).and_then(|s| s.chars().next()) {
            Some(found) => self.error(ParseErrorKind::UnexpectedChar { found, expected }),
            None => self.error(ParseErrorKind::UnexpectedEof { expected }),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn parse_value(&mut self) -> Result<Json, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(b'n') => {
                self.consume_literal("null")?;
                Ok(Json::null())
            }
            Some(b't') => {
                self.consume_literal("true")?;
                Ok(Json::bool_(true))
            }
            Some(b'f') => {
                self.consume_literal("false")?;
                Ok(Json::bool_(false))
            }
            Some(q @ (b'"' | b'\'')) => Ok(Json::string(self.parse_string(q)?)),
            Some(b'[') => self.parse_array(),
            Some(b'{') => self.parse_object(),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            _ => Err(self.unexpected("value")),
        }
    }

    fn consume_literal(&mut self, lit: &'static str) -> Result<(), ParseError> {
        if self.bytes[self.pos..].starts_with(lit.as_bytes()) {
            self.pos += lit.len();
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::InvalidLiteral { expected: lit }))
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            tracing::debug!(limit = self.options.max_depth, offset = self.pos, "nesting limit hit");
            return Err(self.error(ParseErrorKind::DepthLimitExceeded {
                limit: self.options.max_depth,
            }));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_string(&mut self, quote: u8) -> Result<String, ParseError> {
        if quote == b'\'' && !self.options.allow_single_quotes {
            return Err(self.error(ParseErrorKind::SingleQuotesDisabled));
        }
        self.pos += 1;
        let mut s = String::new();
        let mut run = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEof { expected: "closing quote" })),
                Some(b) if b == quote => {
                    s.push_str(&self.src[run..self.pos]);
                    self.pos += 1;
                    return Ok(s);
                }
                Some(b'\\') => {
                    s.push_str(&self.src[run..self.pos]);
                    self.parse_escape(&mut s)?;
                    run = self.pos;
                }
                Some(b) if b < 0x20 => return Err(self.error(ParseErrorKind::ControlCharacter(b))),
                // non-ASCII bytes never match the arms above, so runs split on ASCII only
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self, s: &mut String) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        let Some(esc) = self.peek() else {
            return Err(self.error(ParseErrorKind::UnexpectedEof { expected: "escape sequence" }));
        };
        self.pos += 1;
        match esc {
            b'"' => s.push('"'),
            b'\'' => s.push('\''),
            b'\\' => s.push('\\'),
            b'/' => s.push('/'),
            b'b' => s.push('\x08'),
            b'f' => s.push('\x0c'),
            b'n' => s.push('\n'),
            b'r' => s.push('\r'),
            b't' => s.push('\t'),
            b'u' => {
                let hi = self.parse_hex4()?;
                let cp = if (0xD800..=0xDBFF).contains(&hi) {
                    if !self.bytes[self.pos..].starts_with(b"\\u") {
                        self.pos = start;
                        return Err(self.error(ParseErrorKind::InvalidUnicode(format!(
                            "unpaired high surrogate {hi:04x}"
                        ))));
                    }
                    self.pos += 2;
                    let lo = self.parse_hex4()?;
                    if !(0xDC00..=0xDFFF).contains(&lo) {
                        self.pos = start;
                        return Err(self.error(ParseErrorKind::InvalidUnicode(format!(
                            "{hi:04x} followed by non-low surrogate {lo:04x}"
                        ))));
                    }
                    0x10000 + ((u32::from(hi) - 0xD800) << 10) + (u32::from(lo) - 0xDC00)
                } else {
                    u32::from(hi)
                };
                match char::from_u32(cp) {
                    Some(c) => s.push(c),
                    None => {
                        self.pos = start;
                        return Err(self.error(ParseErrorKind::InvalidUnicode(format!(
                            "unpaired low surrogate {cp:04x}"
                        ))));
                    }
                }
            }
            _ => {
                self.pos = start;
                let c = self.src[start + 1..].chars().next().unwrap_or('\u{fffd}');
                return Err(self.error(ParseErrorKind::InvalidEscape(c)));
            }
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u16, ParseError> {
        let mut v = 0u16;
        for _ in 0..4 {
            let d = match self.peek() {
                Some(b @ b'0'..=b'9') => b - b'0',
                Some(b @ b'a'..=b'f') => b - b'a' + 10,
                Some(b @ b'A'..=b'F') => b - b'A' + 10,
                _ => return Err(self.unexpected("hex digit")),
            };
            self.pos += 1;
            v = (v << 4) | u16::from(d);
        }
        Ok(v)
    }

    fn eat_digits(&mut self) -> usize {
        let from = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - from
    }

    fn invalid_number(&self, start: usize) -> ParseError {
        let text = self.src[start..self.pos].to_string();
        ParseError::at(self.bytes, start, ParseErrorKind::InvalidNumber(text))
    }

    fn parse_number(&mut self) -> Result<Json, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        if self.eat_digits() == 0 {
            return Err(self.invalid_number(start));
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.eat_digits() == 0 {
                return Err(self.invalid_number(start));
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                return Err(self.invalid_number(start));
            }
        }
        match self.src[start..self.pos].parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Json::number(n)),
            _ => Err(self.invalid_number(start)),
        }
    }

    fn parse_array(&mut self) -> Result<Json, ParseError> {
        self.enter()?;
        self.pos += 1;
        self.skip_ws();
        let mut items = Vec::new();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.leave();
            return Ok(Json::from(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b',') => self.pos += 1,
                _ => return Err(self.unexpected("`,` or `]`")),
            }
        }
        self.leave();
        Ok(Json::from(items))
    }

    fn parse_object(&mut self) -> Result<Json, ParseError> {
        self.enter()?;
        self.pos += 1;
        self.skip_ws();
        let mut map = JsonMap::new();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.leave();
            return Ok(Json::from(map));
        }
        loop {
            self.skip_ws();
            let key = match self.peek() {
                Some(q @ (b'"' | b'\'')) => self.parse_string(q)?,
                _ => return Err(self.unexpected("string key")),
            };
            self.skip_ws();
            if self.peek() != Some(b':') {
                return Err(self.unexpected("`:`"));
            }
            self.pos += 1;
            let val = self.parse_value()?;
            // last write wins
            map.insert(key, val);
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b',') => self.pos += 1,
                _ => return Err(self.unexpected("`,` or `}`")),
            }
        }
        self.leave();
        Ok(Json::from(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(src: &str) -> ParseErrorKind {
        parse(src).unwrap_err().kind
    }

    #[test]
    fn literals_are_exact_and_case_sensitive() {
        assert_eq!(parse("null").unwrap(), Json::null());
        assert_eq!(parse(" true ").unwrap(), Json::bool_(true));
        assert_eq!(parse("false").unwrap(), Json::bool_(false));
        assert_eq!(kind("nul"), ParseErrorKind::InvalidLiteral { expected: "null" });
        assert!(matches!(kind("True"), ParseErrorKind::UnexpectedChar { found: 'T', .. }));
        assert_eq!(kind("truex"), ParseErrorKind::TrailingCharacters);
    }

    #[test]
    fn numbers() {
        for (src, n) in [
            ("0", 0.0),
            ("-0", -0.0),
            ("4", 4.0),
            ("-12.5", -12.5),
            ("1e3", 1000.0),
            ("2E-2", 0.02),
            ("1.5e+2", 150.0),
            ("007", 7.0),
        ] {
            assert_eq!(parse(src).unwrap(), Json::number(n), "{src}");
        }
    }

    #[test]
    fn malformed_numbers_are_errors() {
        for src in ["-", "-x", "1.", "1.e3", "1e", "1e+", "1e400", "-1E-"] {
            let e = parse(src).unwrap_err();
            assert!(
                matches!(e.kind, ParseErrorKind::InvalidNumber(_)),
                "{src}: {e}"
            );
            assert_eq!(e.offset, 0, "{src}");
        }
        assert!(matches!(kind(".5"), ParseErrorKind::UnexpectedChar { found: '.', .. }));
    }

    #[test]
    fn both_quote_styles_share_escapes() {
        assert_eq!(parse(r#""a\tb""#).unwrap(), Json::string("a\tb"));
        assert_eq!(parse(r"'a\tb'").unwrap(), Json::string("a\tb"));
        assert_eq!(parse(r#"'say "hi"'"#).unwrap(), Json::string("say \"hi\""));
        assert_eq!(parse(r#""it's""#).unwrap(), Json::string("it's"));
        assert_eq!(parse(r"'it\'s'").unwrap(), Json::string("it's"));
        assert_eq!(parse(r#""\/\\\b\f\n\r""#).unwrap(), Json::string("/\\\u{8}\u{c}\n\r"));
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(parse(r#""\u0041""#).unwrap(), Json::string("A"));
        assert_eq!(parse(r#"'\u00e9'"#).unwrap(), Json::string("é"));
        assert_eq!(parse(r#""\ud83d\ude00""#).unwrap(), Json::string("😀"));
        assert_eq!(parse("\"naïve ☃\"").unwrap(), Json::string("naïve ☃"));
        assert!(matches!(kind(r#""\ud83d""#), ParseErrorKind::InvalidUnicode(_)));
        assert!(matches!(kind(r#""\ude00""#), ParseErrorKind::InvalidUnicode(_)));
        assert!(matches!(kind(r#""\ud83d\u0041""#), ParseErrorKind::InvalidUnicode(_)));
        assert!(matches!(kind(r#""\u12g4""#), ParseErrorKind::UnexpectedChar { found: 'g', .. }));
    }

    #[test]
    fn bad_strings() {
        assert_eq!(kind(r#""\x""#), ParseErrorKind::InvalidEscape('x'));
        assert_eq!(kind("\"a\nb\""), ParseErrorKind::ControlCharacter(b'\n'));
        assert_eq!(
            kind("'abc"),
            ParseErrorKind::UnexpectedEof { expected: "closing quote" }
        );
    }

    #[test]
    fn containers() {
        assert_eq!(parse("[]").unwrap(), Json::list([]));
        assert_eq!(parse("{ }").unwrap(), Json::object(Vec::<(String, Json)>::new()));
        assert_eq!(
            parse("[1, [true], {'k': null}]").unwrap(),
            Json::list([
                Json::number(1.0),
                Json::list([Json::bool_(true)]),
                Json::object([("k", Json::null())]),
            ])
        );
        assert_eq!("{'k': [null]}".parse::<Json>(), parse("{'k': [null]}"));
        assert_eq!(
            "[1,".parse::<Json>().unwrap_err().kind,
            ParseErrorKind::UnexpectedEof { expected: "value" }
        );
    }

    #[test]
    fn trailing_commas_rejected() {
        assert!(matches!(kind("[1,]"), ParseErrorKind::UnexpectedChar { found: ']', .. }));
        assert!(matches!(kind("{'a':1,}"), ParseErrorKind::UnexpectedChar { found: '}', .. }));
        assert_eq!(kind("[1,2,"), ParseErrorKind::UnexpectedEof { expected: "value" });
    }

    #[test]
    fn object_structure_errors() {
        assert!(matches!(kind("{a:1}"), ParseErrorKind::UnexpectedChar { found: 'a', expected: "string key" }));
        assert!(matches!(kind("{'a' 1}"), ParseErrorKind::UnexpectedChar { found: '1', expected: "`:`" }));
        assert!(matches!(kind("{'a':1 'b':2}"), ParseErrorKind::UnexpectedChar { found: '\'', .. }));
        assert_eq!(kind(""), ParseErrorKind::UnexpectedEof { expected: "value" });
    }

    #[test]
    fn depth_limit() {
        let opts = ParseOptions::default().with_max_depth(3);
        assert!(parse_with("[[[]]]", &opts).is_ok());
        let e = parse_with("[[[[]]]]", &opts).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::DepthLimitExceeded { limit: 3 });
        assert_eq!(e.offset, 3);

        let deep = "[".repeat(100_000);
        assert!(matches!(
            parse(&deep).unwrap_err().kind,
            ParseErrorKind::DepthLimitExceeded { limit: DEFAULT_MAX_DEPTH }
        ));
    }

    #[test]
    fn strict_mode_rejects_single_quotes() {
        let e = parse_with("{'a':1}", &ParseOptions::strict()).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::SingleQuotesDisabled);
        assert_eq!(e.offset, 1);
        assert!(parse_with(r#"{"a":"it's"}"#, &ParseOptions::strict()).is_ok());
    }

    #[test]
    fn invalid_utf8() {
        let e = parse_slice(b"[\"a\xff\"]").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::InvalidUtf8);
        assert_eq!(e.offset, 3);
        assert_eq!(parse_slice(b"[1]").unwrap(), Json::list([Json::number(1.0)]));
    }

    #[test]
    fn error_position_is_reported() {
        let e = parse("{\n  'a': tru\n}").unwrap_err();
        assert_eq!((e.line, e.column), (2, 8));
        assert!(e.to_string().contains("line 2 column 8"), "{e}");
    }
}
