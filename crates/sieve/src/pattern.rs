//! LIKE-style pattern templates.
//!
//! A template uses `%` for any run of characters, `_` for exactly one
//! character, and `\` to make the following character literal. Templates are
//! compiled to anchored regular expressions for in-memory matching and
//! rewritten to `GLOB` syntax for stores whose `LIKE` ignores case.

use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    AnyRun,
    AnyOne,
    Char(char),
}

fn tokenize(template: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            // A trailing backslash stands for itself.
            '\\' => Token::Char(chars.next().unwrap_or('\\')),
            c => Token::Char(c),
        });
    }
    tokens
}

/// Escapes `%`, `_` and `\` so `text` matches only itself inside a template.
///
/// ```
/// assert_eq!(sieve::escape_like("50%_off"), r"50\%\_off");
/// ```
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Compiles a template to a regex matching the whole input.
pub(crate) fn like_regex(template: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    let mut source = String::with_capacity(template.len() + 8);
    source.push('^');
    let mut buf = [0u8; 4];
    for token in tokenize(template) {
        match token {
            Token::AnyRun => source.push_str(".*"),
            Token::AnyOne => source.push('.'),
            Token::Char(c) => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    source.push('$');

    RegexBuilder::new(&source)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
}

/// Rewrites a template with every literal wildcard or backslash escaped, so
/// stores never see a dangling escape character.
pub(crate) fn canonical_like(template: &str) -> String {
    let mut canonical = String::with_capacity(template.len());
    for token in tokenize(template) {
        match token {
            Token::AnyRun => canonical.push('%'),
            Token::AnyOne => canonical.push('_'),
            Token::Char(c) => {
                if matches!(c, '%' | '_' | '\\') {
                    canonical.push('\\');
                }
                canonical.push(c);
            }
        }
    }
    canonical
}

/// Rewrites a template as an SQLite `GLOB` pattern, which is case-sensitive.
pub(crate) fn like_to_glob(template: &str) -> String {
    let mut glob = String::with_capacity(template.len());
    for token in tokenize(template) {
        match token {
            Token::AnyRun => glob.push('*'),
            Token::AnyOne => glob.push('?'),
            Token::Char('*') => glob.push_str("[*]"),
            Token::Char('?') => glob.push_str("[?]"),
            Token::Char('[') => glob.push_str("[[]"),
            Token::Char(c) => glob.push(c),
        }
    }
    glob
}
