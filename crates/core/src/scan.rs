//! Require-expression scanning for Lua sources.
//!
//! Finds `require` call sites while skipping comments and string literals,
//! and classifies each call as literal (a fixed module name the bundler can
//! resolve) or non-literal (an argument computed at runtime).

/// A `require` call site found in a source chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequireExpr {
    pub(crate) kind: RequireKind,
    /// 1-based line of the `require` token.
    pub(crate) line: u32,
    /// 1-based column of the `require` token.
    pub(crate) column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RequireKind {
    /// `require("name")`, `require 'name'`, `require [[name]]`
    Literal(String),
    /// Any other argument shape, e.g. `require(mods[i])`
    NonLiteral,
}

/// Scan a Lua chunk for `require` expressions.
///
/// Bare references to `require` (no call) and field accesses like
/// `foo.require(...)` are not reported.
pub(crate) fn scan_requires(source: &str) -> Vec<RequireExpr> {
    let mut cur = Cursor::new(source);
    let mut found = Vec::new();
    // Set after a single `.` or a `:`, so `foo.require` and `obj:require`
    // are recognized as field accesses, not the global. `..` (concat) and
    // `...` (varargs) clear it.
    let mut after_dot = false;

    while let Some(b) = cur.peek() {
        match b {
            b'-' if cur.peek_at(1) == Some(b'-') => {
                cur.bump();
                cur.bump();
                if let Some(level) = long_bracket_level(&cur) {
                    skip_long_string(&mut cur, level);
                } else {
                    while let Some(c) = cur.bump() {
                        if c == b'\n' {
                            break;
                        }
                    }
                }
                after_dot = false;
            }
            b'"' | b'\'' => {
                skip_short_string(&mut cur, b);
                after_dot = false;
            }
            b'[' if long_bracket_level(&cur).is_some() => {
                let level = long_bracket_level(&cur).unwrap_or(0);
                skip_long_string(&mut cur, level);
                after_dot = false;
            }
            b'.' => {
                let mut dots = 0;
                while cur.peek() == Some(b'.') {
                    cur.bump();
                    dots += 1;
                }
                after_dot = dots == 1;
            }
            b':' => {
                cur.bump();
                after_dot = true;
            }
            b' ' | b'\t' | b'\r' | b'\n' => {
                cur.bump();
            }
            _ if is_ident_start(b) => {
                let line = cur.line;
                let column = cur.column;
                let start = cur.pos;
                while cur.peek().is_some_and(is_ident) {
                    cur.bump();
                }
                if !after_dot && &cur.bytes[start..cur.pos] == b"require" {
                    if let Some(kind) = classify_argument(&mut cur) {
                        found.push(RequireExpr { kind, line, column });
                    }
                }
                after_dot = false;
            }
            _ => {
                cur.bump();
                after_dot = false;
            }
        }
    }

    found
}

/// Classify what follows a `require` token. `None` means it was a bare
/// reference, not a call.
fn classify_argument(cur: &mut Cursor) -> Option<RequireKind> {
    skip_whitespace(cur);
    match cur.peek()? {
        b'(' => {
            cur.bump();
            skip_whitespace(cur);
            match read_string_argument(cur) {
                Some(name) => {
                    skip_whitespace(cur);
                    if cur.eat(b')') {
                        Some(RequireKind::Literal(name))
                    } else {
                        // `require("a" .. suffix)` and friends
                        Some(RequireKind::NonLiteral)
                    }
                }
                None => Some(RequireKind::NonLiteral),
            }
        }
        // Paren-less call sugar: `require "name"` / `require [[name]]`
        b'"' | b'\'' | b'[' => read_string_argument(cur).map(RequireKind::Literal),
        _ => None,
    }
}

fn read_string_argument(cur: &mut Cursor) -> Option<String> {
    match cur.peek()? {
        q @ (b'"' | b'\'') => Some(read_short_string(cur, q)),
        b'[' => long_bracket_level(cur).map(|level| read_long_string(cur, level)),
        _ => None,
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.bump();
            true
        } else {
            false
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_ident(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

fn skip_whitespace(cur: &mut Cursor) {
    while matches!(cur.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
        cur.bump();
    }
}

fn skip_short_string(cur: &mut Cursor, quote: u8) {
    cur.bump();
    while let Some(b) = cur.bump() {
        if b == b'\\' {
            cur.bump();
        } else if b == quote {
            return;
        }
    }
}

fn read_short_string(cur: &mut Cursor, quote: u8) -> String {
    let mut out = Vec::new();
    cur.bump();
    while let Some(b) = cur.bump() {
        if b == b'\\' {
            if let Some(escaped) = cur.bump() {
                out.push(escaped);
            }
        } else if b == quote {
            break;
        } else {
            out.push(b);
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// If the cursor sits on a long-bracket opener (`[[`, `[=[`, ...), return
/// its level without consuming anything.
fn long_bracket_level(cur: &Cursor) -> Option<usize> {
    if cur.peek() != Some(b'[') {
        return None;
    }
    let mut level = 0;
    while cur.peek_at(1 + level) == Some(b'=') {
        level += 1;
    }
    (cur.peek_at(1 + level) == Some(b'[')).then_some(level)
}

fn at_long_close(cur: &Cursor, level: usize) -> bool {
    if cur.peek() != Some(b']') {
        return false;
    }
    for i in 1..=level {
        if cur.peek_at(i) != Some(b'=') {
            return false;
        }
    }
    cur.peek_at(level + 1) == Some(b']')
}

fn skip_long_string(cur: &mut Cursor, level: usize) {
    for _ in 0..level + 2 {
        cur.bump();
    }
    while cur.peek().is_some() {
        if at_long_close(cur, level) {
            for _ in 0..level + 2 {
                cur.bump();
            }
            return;
        }
        cur.bump();
    }
}

fn read_long_string(cur: &mut Cursor, level: usize) -> String {
    for _ in 0..level + 2 {
        cur.bump();
    }
    // Lua drops a newline immediately after the opening bracket
    if cur.peek() == Some(b'\n') {
        cur.bump();
    }
    let mut out = Vec::new();
    while cur.peek().is_some() {
        if at_long_close(cur, level) {
            for _ in 0..level + 2 {
                cur.bump();
            }
            break;
        }
        if let Some(b) = cur.bump() {
            out.push(b);
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
