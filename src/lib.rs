//! **resite** - Report-driven call-site rewriter for C-like codebases
//!
//! Consumes a "find usages" report, reconstructs canonical `path:line`
//! call-site addresses, and rewrites each site into a new call form with an
//! auxiliary diagnostic statement, keeping line numbers valid as earlier
//! edits shift later ones.

/// Command-line interface with clap integration
pub mod cli;

/// Core pipeline - report parsing, call scanning, offset-aware rewriting
pub mod core {
    /// Usage-report parser: indentation tree -> sorted canonical addresses
    pub mod report;
    pub use report::{CallSite, parse_report, run as locations_run};

    /// Call-expression scanning: locator + argument splitter
    pub mod call;
    pub use call::{CallLocator, SplitCall, split_arguments};

    /// Offset-aware rewrite engine and the shipped rewrite policy
    pub mod rewrite;
    pub use rewrite::{DiagnosticPolicy, RewriteEngine, RewritePolicy, run as rewrite_run};
}

/// Infrastructure - configuration, I/O, line indexing
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Whole-file load/save wrappers
    pub mod io;

    /// Newline index for O(1) line -> byte mapping
    pub mod line_index;
    pub use line_index::NewlineIndex;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use core::{CallSite, locations_run, parse_report, rewrite_run};
pub use infra::{Config, load_config};
