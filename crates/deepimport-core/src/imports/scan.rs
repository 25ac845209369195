//! Token-aware import scanner.
//!
//! Walks JavaScript/TypeScript source without full parsing, skipping
//! comments, string/template literals and regex literals so that
//! import-looking text inside them is never reported.

use super::{ImportKind, ImportMatch};

/// Lazy iterator over the import/require statements of a source file.
///
/// Yields relative and bare specifiers alike; callers filter.
pub struct ImportScanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    /// Last byte of the previous token, used to tell `/` division from a regex.
    prev: Option<u8>,
}

impl<'a> ImportScanner<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            prev: None,
        }
    }

    /// Move to `to`, counting the newlines passed over.
    fn advance_to(&mut self, to: usize) {
        let to = to.min(self.bytes.len());
        let passed = &self.bytes[self.pos..to];
        for &b in passed {
            if b == b'\n' {
                self.line += 1;
            }
        }
        self.pos = to;
    }

    fn peek(&self, at: usize) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    fn skip_ws(&self, mut i: usize) -> usize {
        while i < self.bytes.len() && self.bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    /// End of the quoted literal starting at `start` (one past the closing
    /// quote), and whether the closing quote was found.
    fn literal_end(&self, start: usize) -> (usize, bool) {
        let quote = self.bytes[start];
        let len = self.bytes.len();
        let mut i = start + 1;
        while i < len {
            match self.bytes[i] {
                b'\\' => i += 2,
                b if b == quote => return (i + 1, true),
                b'\n' if quote != b'`' => return (i, false),
                b'$' if quote == b'`' && self.peek(i + 1) == Some(b'{') => {
                    i = self.substitution_end(i + 2);
                }
                _ => i += 1,
            }
        }
        (len, false)
    }

    /// End of a `${ ... }` substitution whose body starts at `start`.
    fn substitution_end(&self, start: usize) -> usize {
        let len = self.bytes.len();
        let mut depth = 1usize;
        let mut i = start;
        while i < len {
            match self.bytes[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return i + 1;
                    }
                }
                b'\'' | b'"' | b'`' => {
                    i = self.literal_end(i).0;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
        len
    }

    /// End of a regex literal starting at `start` (the opening `/`).
    fn regex_end(&self, start: usize) -> usize {
        let len = self.bytes.len();
        let mut i = start + 1;
        let mut in_class = false;
        while i < len {
            match self.bytes[i] {
                b'\\' => i += 1,
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => return i + 1,
                b'\n' => return i,
                _ => {}
            }
            i += 1;
        }
        len
    }

    /// A `/` starts a regex literal unless the previous token ends an expression.
    fn slash_starts_regex(&self) -> bool {
        match self.prev {
            None => true,
            Some(b) => !(b.is_ascii_alphanumeric()
                || matches!(b, b')' | b']' | b'}' | b'_' | b'$' | b'\'' | b'"' | b'`')),
        }
    }

    /// Quoted specifier at `at`: `(content_start, content_end, after_close)`.
    ///
    /// Templates with substitutions are not specifiers.
    fn specifier_literal(&self, at: usize) -> Option<(usize, usize, usize)> {
        let quote = self.peek(at)?;
        if !matches!(quote, b'\'' | b'"' | b'`') {
            return None;
        }
        let (end, closed) = self.literal_end(at);
        if !closed {
            return None;
        }
        let content = &self.bytes[at + 1..end - 1];
        if quote == b'`' && content.windows(2).any(|w| w == b"${") {
            return None;
        }
        Some((at + 1, end - 1, end))
    }

    /// `( '<spec>' )` starting at `at`, optionally followed by `;`.
    fn call_argument(&self, at: usize) -> Option<(usize, usize, usize)> {
        if self.peek(at) != Some(b'(') {
            return None;
        }
        let (start, end, after) = self.specifier_literal(self.skip_ws(at + 1))?;
        let close = self.skip_ws(after);
        if self.peek(close) != Some(b')') {
            return None;
        }
        Some((start, end, self.with_semicolon(close + 1)))
    }

    fn with_semicolon(&self, at: usize) -> usize {
        if self.peek(at) == Some(b';') {
            at + 1
        } else {
            at
        }
    }

    /// Try to read a statement introduced by `word`, which ends at `kw_end`.
    ///
    /// Returns the kind, the specifier span and the statement end.
    fn statement_at(
        &self,
        word: &str,
        kw_end: usize,
    ) -> Option<(ImportKind, usize, usize, usize)> {
        let next = self.skip_ws(kw_end);
        match word {
            "from" => {
                let (s, e, after) = self.specifier_literal(next)?;
                Some((ImportKind::EsmFrom, s, e, self.with_semicolon(after)))
            }
            "import" => {
                if self.peek(next) == Some(b'(') {
                    let (s, e, end) = self.call_argument(next)?;
                    Some((ImportKind::DynamicImport, s, e, end))
                } else {
                    let (s, e, after) = self.specifier_literal(next)?;
                    Some((ImportKind::EsmSideEffect, s, e, self.with_semicolon(after)))
                }
            }
            "require" => {
                let (s, e, end) = self.call_argument(next)?;
                Some((ImportKind::CjsRequire, s, e, end))
            }
            _ => None,
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

impl Iterator for ImportScanner<'_> {
    type Item = ImportMatch;

    fn next(&mut self) -> Option<ImportMatch> {
        let src = self.src;
        let len = self.bytes.len();

        while self.pos < len {
            let i = self.pos;
            let b = self.bytes[i];

            if b.is_ascii_whitespace() {
                self.advance_to(i + 1);
                continue;
            }

            // Comments
            if b == b'/' && self.peek(i + 1) == Some(b'/') {
                let end = src[i..].find('\n').map_or(len, |n| i + n);
                self.advance_to(end);
                continue;
            }
            if b == b'/' && self.peek(i + 1) == Some(b'*') {
                let end = src[i + 2..].find("*/").map_or(len, |n| i + 2 + n + 2);
                self.advance_to(end);
                continue;
            }

            if b == b'/' && self.slash_starts_regex() {
                let end = self.regex_end(i);
                self.advance_to(end);
                self.prev = Some(b'/');
                continue;
            }

            if matches!(b, b'\'' | b'"' | b'`') {
                let (end, _) = self.literal_end(i);
                self.advance_to(end);
                self.prev = Some(b);
                continue;
            }

            if is_ident_start(b) {
                let mut end = i + 1;
                while end < len && is_ident_continue(self.bytes[end]) {
                    end += 1;
                }
                let member_access = self.prev == Some(b'.');
                let word = &src[i..end];

                if !member_access {
                    if let Some((kind, spec_start, spec_end, stmt_end)) =
                        self.statement_at(word, end)
                    {
                        let found = ImportMatch {
                            statement: src[i..stmt_end].to_string(),
                            specifier: src[spec_start..spec_end].to_string(),
                            specifier_start: spec_start - i,
                            offset: i,
                            kind,
                            line: self.line,
                        };
                        self.advance_to(stmt_end);
                        self.prev = Some(self.bytes[stmt_end - 1]);
                        return Some(found);
                    }
                }

                self.advance_to(end);
                self.prev = Some(self.bytes[end - 1]);
                continue;
            }

            // Skip the rest of a multi-byte character in one step.
            let width = src[i..].chars().next().map_or(1, char::len_utf8);
            self.advance_to(i + width);
            self.prev = Some(b);
        }

        None
    }
}
