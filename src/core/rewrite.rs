//! Offset-aware rewrite engine.
//!
//! Processes canonical call-site addresses strictly in sorted order. Report
//! line numbers address the *original* files, so every applied edit records
//! the net line-count change for its file; later addresses in the same file
//! are shifted by the accumulated delta before the target line is resolved.
//!
//! Fail-fast: the first error aborts the run. Files already rewritten stay
//! modified; there is no cross-file rollback. One full-file read and one
//! full-file overwrite per processed address.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, trace};

use crate::cli::{AppContext, RewriteArgs};
use crate::core::call::{CallLocator, split_arguments};
use crate::core::report::{CallSite, parse_report};
use crate::infra;
use crate::infra::line_index::NewlineIndex;

#[derive(Debug, Error, PartialEq)]
pub enum RewriteError {
    /// The delta-adjusted target line exceeds the file's current length.
    #[error("{path}: target line {line} exceeds file length ({file_lines} lines)")]
    LineOverflow {
        path: String,
        line: i64,
        file_lines: usize,
    },

    /// The report promised a call at this address; none was found.
    #[error("{path}:{line}: call to `{function}` not found")]
    CallNotFound {
        path: String,
        line: usize,
        function: String,
    },
}

/// How one located call becomes replacement text.
///
/// The policy owns the transformation; the engine owns locating, splitting,
/// and offset bookkeeping. The replacement spans the call's identifier
/// through its closing parenthesis, so trailing text (typically `;`) is
/// preserved untouched.
pub trait RewritePolicy {
    /// Function whose call sites are tracked.
    fn function(&self) -> &str;

    /// Replacement text for one call. `indent` is the leading whitespace of
    /// the line the call starts on, for continuation lines the policy emits.
    fn rewrite(&self, args: &[String], indent: &str) -> String;
}

/// Shipped policy: rename the call, keep a leading subset of arguments, and
/// hand the dropped arguments to a diagnostic call on the following line.
///
/// `old(a, b, c);` with `keep_args = 1` becomes
/// `new(a);\n<indent>note(b, c);` — the second `;` comes from the original
/// statement's untouched remainder.
#[derive(Debug, Clone)]
pub struct DiagnosticPolicy {
    pub function: String,
    pub replacement: String,
    pub keep_args: usize,
    pub diagnostic: String,
}

impl RewritePolicy for DiagnosticPolicy {
    fn function(&self) -> &str {
        &self.function
    }

    fn rewrite(&self, args: &[String], indent: &str) -> String {
        let keep = self.keep_args.min(args.len());
        let (kept, dropped) = args.split_at(keep);

        let mut out = format!("{}({})", self.replacement, kept.join(", "));
        if !self.diagnostic.is_empty() && !dropped.is_empty() {
            out.push_str(&format!(
                ";\n{indent}{}({})",
                self.diagnostic,
                dropped.join(", ")
            ));
        }
        out
    }
}

/// Outcome of one engine run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub rewritten: Vec<CallSite>,
    pub skipped_declarations: Vec<CallSite>,
}

pub struct RewriteEngine<'p> {
    policy: &'p dyn RewritePolicy,
    locator: CallLocator,
    root: PathBuf,
    declaration_suffixes: Vec<String>,
    /// Per-file cumulative net line-count change applied so far this run.
    deltas: BTreeMap<String, i64>,
    dry_run: bool,
    /// Dry-run shadow contents, so later addresses in the same file resolve
    /// against the would-be state without touching disk.
    shadow: BTreeMap<String, String>,
}

impl<'p> RewriteEngine<'p> {
    pub fn new(
        policy: &'p dyn RewritePolicy,
        root: PathBuf,
        declaration_suffixes: Vec<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let locator = CallLocator::new(policy.function())
            .with_context(|| format!("Invalid function name {:?}", policy.function()))?;
        Ok(Self {
            policy,
            locator,
            root,
            declaration_suffixes,
            deltas: BTreeMap::new(),
            dry_run,
            shadow: BTreeMap::new(),
        })
    }

    /// Process addresses strictly in the given (sorted) order.
    pub fn run(&mut self, sites: &[CallSite]) -> Result<RunReport> {
        let mut report = RunReport::default();

        for site in sites {
            if self.is_declaration(&site.path) {
                trace!("skipping declaration-only path {site}");
                report.skipped_declarations.push(site.clone());
                continue;
            }
            self.rewrite_site(site)?;
            report.rewritten.push(site.clone());
        }

        Ok(report)
    }

    fn is_declaration(&self, path: &str) -> bool {
        self.declaration_suffixes.iter().any(|s| path.ends_with(s))
    }

    fn rewrite_site(&mut self, site: &CallSite) -> Result<()> {
        let delta = self.deltas.get(&site.path).copied().unwrap_or(0);
        let target = site.line as i64 + delta;

        let abs = self.root.join(&site.path);
        let content = match self.shadow.get(&site.path) {
            Some(shadowed) => shadowed.clone(),
            None => infra::io::read_file(&abs)?,
        };

        let idx = NewlineIndex::build(content.as_bytes());
        let split_at = usize::try_from(target)
            .ok()
            .and_then(|l| idx.start_byte_of_line(l))
            .ok_or_else(|| RewriteError::LineOverflow {
                path: site.path.clone(),
                line: target,
                file_lines: idx.line_count(),
            })?;

        // Everything before the target line stays verbatim; the call is
        // searched from the target line through end of file.
        let (prefix, tail) = content.split_at(split_at);

        let head = self
            .locator
            .find(tail)
            .ok_or_else(|| RewriteError::CallNotFound {
                path: site.path.clone(),
                line: site.line,
                function: self.policy.function().to_string(),
            })?;

        let split = split_arguments(head.tail)
            .with_context(|| format!("{site}: unparseable call text"))?;

        // Leading whitespace of the line the identifier sits on.
        let line_start = head.before.rfind('\n').map_or(0, |p| p + 1);
        let indent: String = head.before[line_start..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();

        let replacement = self.policy.rewrite(&split.args, &indent);
        let added = replacement.matches('\n').count() as i64;
        // The consumed region spans the identifier through the closing
        // paren, including any identifier-to-'(' gap the replacement folds
        // away.
        let consumed = (split.newlines + head.gap.matches('\n').count()) as i64;

        let new_content = format!("{prefix}{}{replacement}{}", head.before, split.rest);

        if self.dry_run {
            self.shadow.insert(site.path.clone(), new_content);
        } else {
            infra::io::write_file(&abs, &new_content)?;
        }

        *self.deltas.entry(site.path.clone()).or_insert(0) += added - consumed;
        debug!(
            "rewrote {site} (target line {target}, delta now {})",
            self.deltas[&site.path]
        );
        Ok(())
    }
}

/// `rewrite` subcommand: parse the report, rewrite every listed call site.
pub fn run(args: RewriteArgs, ctx: &AppContext) -> Result<()> {
    let config = infra::config::load_config()?;

    let report_path = args.report.unwrap_or(config.report.path);
    let root = args.root.unwrap_or(config.report.root);
    let policy = DiagnosticPolicy {
        function: args.function.unwrap_or(config.rewrite.function),
        replacement: args.replacement.unwrap_or(config.rewrite.replacement),
        keep_args: args.keep_args.unwrap_or(config.rewrite.keep_args),
        diagnostic: args.diagnostic.unwrap_or(config.rewrite.diagnostic),
    };

    let text = infra::io::read_file(&report_path)?;
    let sites = parse_report(&text)
        .with_context(|| format!("Failed to parse report {}", report_path.display()))?;

    let mut engine =
        RewriteEngine::new(&policy, root, config.rewrite.declaration_suffixes, ctx.dry_run)?;
    let outcome = engine.run(&sites)?;

    if !ctx.quiet {
        let marker = if ctx.dry_run { " (dry run)" } else { "" };
        println!(
            "Rewrote {} call site(s), skipped {} declaration-only path(s){marker}",
            outcome.rewritten.len(),
            outcome.skipped_declarations.len(),
        );
    }
    Ok(())
}
