//! Call-expression scanning: locate a named call and split its arguments.
//!
//! This is deliberately not a C parser. The locator is a boundary-checked
//! text match, so a call token inside a comment is treated as real code; the
//! splitter tracks only parenthesis depth, string literals, and one-character
//! escapes. Both limitations are accepted and documented, not defects.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CallError {
    /// Call text does not begin with '(' after optional whitespace.
    #[error("malformed call: expected '(' at {0:?}")]
    MalformedCall(String),

    /// Input exhausted while parenthesis depth never returned to 0.
    #[error("unbalanced call: missing closing ')'")]
    UnbalancedCall,
}

/// Result of locating a call head in a buffer.
#[derive(Debug, PartialEq)]
pub struct CallHead<'t> {
    /// Text strictly before the matched identifier.
    pub before: &'t str,
    /// Whitespace between the identifier and the '('. May span newlines;
    /// callers replacing the call must account for those lines.
    pub gap: &'t str,
    /// Text starting at the call's opening '('.
    pub tail: &'t str,
}

/// Finds the first occurrence of `name` used as a call head: the preceding
/// character is not an identifier character (or the match is at the start of
/// text) and the name is followed by optional whitespace and '('.
pub struct CallLocator {
    re: Regex,
}

impl CallLocator {
    pub fn new(function: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"(?:^|[^A-Za-z0-9_])({})\s*\(",
            regex::escape(function)
        );
        Ok(Self {
            re: Regex::new(&pattern)?,
        })
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<CallHead<'t>> {
        let caps = self.re.captures(text)?;
        let ident = caps.get(1)?;
        let whole = caps.get(0)?;
        // The match ends one byte past the '('.
        Some(CallHead {
            before: &text[..ident.start()],
            gap: &text[ident.end()..whole.end() - 1],
            tail: &text[whole.end() - 1..],
        })
    }
}

/// One split call: arguments at depth 1, the text after the consumed ')',
/// and the physical newlines the call text spanned.
#[derive(Debug, PartialEq)]
pub struct SplitCall<'t> {
    pub args: Vec<String>,
    pub rest: &'t str,
    pub newlines: usize,
}

/// Split a parenthesized argument list.
///
/// Commas split only at depth 1; parentheses and commas inside string
/// literals are inert; a backslash escapes exactly the one character that
/// follows it. The closing ')' is consumed but belongs to no argument.
pub fn split_arguments(text: &str) -> Result<SplitCall<'_>, CallError> {
    let mut chars = text.char_indices();
    let mut newlines = 0usize;

    // Leading whitespace, then the mandatory '('.
    loop {
        match chars.next() {
            Some((_, c)) if c.is_whitespace() => {
                if c == '\n' {
                    newlines += 1;
                }
            }
            Some((_, '(')) => break,
            _ => return Err(CallError::MalformedCall(preview(text))),
        }
    }

    let mut args: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in chars {
        if c == '\n' {
            newlines += 1;
        }

        // Rule priority is load-bearing: escape > quote > in-string >
        // parens > comma > plain append.
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '"' => {
                in_string = !in_string;
                current.push(c);
            }
            _ if in_string => {
                if c == '\\' {
                    escaped = true;
                }
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    args.push(current.trim().to_string());
                    // "()" carries no argument at all.
                    if args.len() == 1 && args[0].is_empty() {
                        args.clear();
                    }
                    return Ok(SplitCall {
                        args,
                        rest: &text[i + c.len_utf8()..],
                        newlines,
                    });
                }
                current.push(c);
            }
            ',' if depth == 1 => {
                args.push(current.trim().to_string());
                current = String::new();
            }
            '\\' => {
                escaped = true;
                current.push(c);
            }
            _ => current.push(c),
        }
    }

    Err(CallError::UnbalancedCall)
}

/// Short excerpt of offending text for error messages.
fn preview(text: &str) -> String {
    let t = text.trim_start();
    let end = t
        .char_indices()
        .nth(24)
        .map(|(i, _)| i)
        .unwrap_or(t.len());
    t[..end].to_string()
}
