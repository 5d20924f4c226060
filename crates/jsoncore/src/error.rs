use std::fmt;

use crate::value::JsonTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedEof { expected: &'static str },
    UnexpectedChar { found: char, expected: &'static str },
    InvalidLiteral { expected: &'static str },
    InvalidNumber(String),
    InvalidEscape(char),
    InvalidUnicode(String),
    ControlCharacter(u8),
    TrailingCharacters,
    DepthLimitExceeded { limit: usize },
    SingleQuotesDisabled,
    InvalidUtf8,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            ParseErrorKind::UnexpectedChar { found, expected } => {
                write!(f, "unexpected character {found:?}, expected {expected}")
            }
            ParseErrorKind::InvalidLiteral { expected } => write!(f, "invalid literal, expected `{expected}`"),
            ParseErrorKind::InvalidNumber(s) => write!(f, "invalid number `{s}`"),
            ParseErrorKind::InvalidEscape(c) => write!(f, "invalid escape sequence `\\{c}`"),
            ParseErrorKind::InvalidUnicode(why) => write!(f, "invalid unicode escape: {why}"),
            ParseErrorKind::ControlCharacter(b) => {
                write!(f, "unescaped control character 0x{b:02x} in string")
            }
            ParseErrorKind::TrailingCharacters => f.write_str("trailing characters after value"),
            ParseErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting deeper than {limit} levels")
            }
            ParseErrorKind::SingleQuotesDisabled => f.write_str("single-quoted strings are disabled"),
            ParseErrorKind::InvalidUtf8 => f.write_str("input is not valid UTF-8"),
        }
    }
}

/// Malformed input. No partial tree is ever produced alongside one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn at(bytes: &[u8], offset: usize, kind: ParseErrorKind) -> Self {
        let offset = offset.min(bytes.len());
        let before = &bytes[..offset];
        let line = 1 + before.iter().filter(|&&b| b == b'\n').count();
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        // count UTF-8 lead bytes only
        let column = 1 + before[line_start..]
            .iter()
            .filter(|&&b| b & 0xC0 != 0x80)
            .count();
        ParseError {
            offset,
            line,
            column,
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at line {} column {} (offset {}): {}",
            self.line, self.column, self.offset, self.kind
        )
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathErrorReason {
    MissingKey,
    IndexOutOfRange { len: usize },
    /// Key addressed into a list, index addressed into an object, or any
    /// segment addressed into a scalar.
    NotAContainer { found: JsonTag },
}

/// Navigation failed at `segment`, the `segment_index`-th step of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub segment_index: usize,
    pub segment: String,
    pub reason: PathErrorReason,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path segment #{} `{}`: ", self.segment_index, self.segment)?;
        match &self.reason {
            PathErrorReason::MissingKey => f.write_str("no such key"),
            PathErrorReason::IndexOutOfRange { len } => {
                write!(f, "index out of range for list of length {len}")
            }
            PathErrorReason::NotAContainer { found } => {
                write!(f, "cannot address this segment into a {found}")
            }
        }
    }
}

impl std::error::Error for PathError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatchError {
    /// Rendered path of the offending node (`$` for the root).
    pub path: String,
    pub expected: JsonTag,
    pub actual: JsonTag,
    /// Host type that was requested, e.g. `i32`.
    pub target: &'static str,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expected == self.actual {
            write!(
                f,
                "type mismatch at {}: {} does not fit {}",
                self.path, self.actual, self.target
            )
        } else {
            write!(
                f,
                "type mismatch at {}: expected {} (as {}), found {}",
                self.path, self.expected, self.target, self.actual
            )
        }
    }
}

impl std::error::Error for TypeMismatchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    Path(PathError),
    TypeMismatch(TypeMismatchError),
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::Path(e) => fmt::Display::fmt(e, f),
            AccessError::TypeMismatch(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for AccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccessError::Path(e) => Some(e),
            AccessError::TypeMismatch(e) => Some(e),
        }
    }
}

impl From<PathError> for AccessError {
    fn from(e: PathError) -> Self {
        AccessError::Path(e)
    }
}

impl From<TypeMismatchError> for AccessError {
    fn from(e: TypeMismatchError) -> Self {
        AccessError::TypeMismatch(e)
    }
}
