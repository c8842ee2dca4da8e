//! Usage-report parser.
//!
//! The report is an indentation-structured tree exported by a "find usages"
//! facility: header lines name directories, files, and functions; call-site
//! lines carry a 1-based line number and the code at that line. Indentation
//! is 4 columns per level; a line's margin is its leading-space count divided
//! by 4. Shallow lines are the page's framing text and are dropped before
//! structural analysis.
//!
//! The output is the sorted list of canonical `path:line` addresses, one per
//! call-site line, numbered against the unmodified original files.

use std::fmt;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::cli::{AppContext, LocationsArgs};
use crate::infra;

/// Columns per indentation level.
pub const INDENT_UNIT: usize = 4;

/// Lines with margin at or below this are framing text, not tree nodes.
pub const FRAME_MARGIN: usize = 1;

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    /// A retained line matches neither the header nor the call-site shape.
    #[error("malformed report line {line_no}: {text:?}")]
    MalformedReport { line_no: usize, text: String },
}

/// One reported call site, addressed against the original file content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CallSite {
    /// Path relative to the report's root, '/'-joined.
    pub path: String,
    /// 1-based line in the unmodified file.
    pub line: usize,
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// Transient parse unit: a named tree node or a numbered call-site line.
#[derive(Debug)]
enum ReportNode {
    Token { name: String, margin: usize },
    Line { number: usize, margin: usize },
}

// Header lines end in "  (<n> usage(s) found)"; everything before the
// two-space separator is the node name.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*\S)\s{2,}\(\d+ usages? found\)$").unwrap());

// Call-site lines: decimal line number, one space, arbitrary code.
static CALL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+) .*$").unwrap());

/// Lex the report into retained nodes, dropping framing lines.
fn lex_report(text: &str) -> Result<Vec<ReportNode>, ReportError> {
    let mut nodes = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let indent = raw.len() - raw.trim_start_matches(' ').len();
        let margin = indent / INDENT_UNIT;
        if margin <= FRAME_MARGIN {
            continue;
        }

        let body = raw.trim_start_matches(' ').trim_end();
        if let Some(caps) = HEADER_RE.captures(body) {
            nodes.push(ReportNode::Token {
                name: caps[1].to_string(),
                margin,
            });
        } else if let Some(caps) = CALL_LINE_RE.captures(body) {
            // The pattern guarantees the capture parses.
            let number: usize = caps[1]
                .parse()
                .map_err(|_| ReportError::MalformedReport {
                    line_no: idx + 1,
                    text: body.to_string(),
                })?;
            nodes.push(ReportNode::Line { number, margin });
        } else {
            return Err(ReportError::MalformedReport {
                line_no: idx + 1,
                text: body.to_string(),
            });
        }
    }

    Ok(nodes)
}

/// Parse a usage report into sorted canonical call-site addresses.
///
/// A two-state scan over the retained nodes: PATH accumulates name tokens
/// until the first call-site line fixes the section margin and the path
/// (all accumulated tokens except the trailing function name). CALLS then
/// emits further lines at the section margin under the same path, folds
/// function-name tokens one level up, and lets file-name tokens two levels
/// up swap the last path component. Anything else reverts to PATH with the
/// accumulation window restarted at that node.
///
/// Duplicate `path:line` entries are preserved as parsed; the rewrite engine
/// resolves the second occurrence after the first one's delta and normally
/// fails there.
pub fn parse_report(text: &str) -> Result<Vec<CallSite>, ReportError> {
    let nodes = lex_report(text)?;

    enum State {
        Path,
        Calls,
    }

    let mut out: Vec<CallSite> = Vec::new();
    let mut state = State::Path;
    let mut window: Vec<String> = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut section_margin = 0usize;

    let mut i = 0;
    while i < nodes.len() {
        match state {
            State::Path => {
                match &nodes[i] {
                    ReportNode::Token { name, .. } => window.push(name.clone()),
                    ReportNode::Line { number, margin } => {
                        section_margin = *margin;
                        path = window.clone();
                        // The token immediately preceding the first call-site
                        // line is the function name, already folded into the
                        // section rather than the path.
                        path.pop();
                        out.push(CallSite {
                            path: path.join("/"),
                            line: *number,
                        });
                        state = State::Calls;
                    }
                }
                i += 1;
            }
            State::Calls => match &nodes[i] {
                ReportNode::Line { number, margin } if *margin == section_margin => {
                    out.push(CallSite {
                        path: path.join("/"),
                        line: *number,
                    });
                    i += 1;
                }
                ReportNode::Token { margin, .. } if margin + 1 == section_margin => {
                    // Function name under the current file; path unchanged.
                    i += 1;
                }
                ReportNode::Token { name, margin } if margin + 2 == section_margin => {
                    // New file within the same directory section.
                    match path.last_mut() {
                        Some(last) => *last = name.clone(),
                        None => path.push(name.clone()),
                    }
                    i += 1;
                }
                _ => {
                    // Section over; restart accumulation at this node.
                    state = State::Path;
                    window.clear();
                }
            },
        }
    }

    out.sort();
    debug!("parsed {} call-site addresses", out.len());
    Ok(out)
}

/// `locations` subcommand: print the sorted canonical addresses.
pub fn run(args: LocationsArgs, ctx: &AppContext) -> Result<()> {
    let config = infra::config::load_config()?;
    let report_path = args.report.unwrap_or(config.report.path);

    let text = infra::io::read_file(&report_path)?;
    let sites = parse_report(&text)
        .with_context(|| format!("Failed to parse report {}", report_path.display()))?;

    for site in &sites {
        println!("{site}");
    }
    if !ctx.quiet {
        eprintln!("{} call site(s)", sites.len());
    }
    Ok(())
}
