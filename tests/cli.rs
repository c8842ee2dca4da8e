use clap::Parser;
use resite::cli::{Cli, Commands, RewriteArgs};

#[test]
fn rewrite_flag_parsing() {
    // Given
    let argv = vec![
        "resite",
        "--dry-run",
        "rewrite",
        "--report",
        "usages.txt",
        "--function",
        "debug_print",
        "--keep-args",
        "2",
    ];

    // When
    let cmd = Cli::parse_from(argv);

    // Then
    assert!(cmd.dry_run);
    match cmd.command {
        Commands::Rewrite(RewriteArgs {
            report,
            function,
            keep_args,
            replacement,
            ..
        }) => {
            assert_eq!(keep_args, Some(2));
            assert_eq!(function.as_deref(), Some("debug_print"));
            assert!(report.unwrap().to_string_lossy().ends_with("usages.txt"));
            assert!(replacement.is_none());
        }
        _ => panic!("expected Rewrite command"),
    }
}

#[test]
fn quiet_is_global() {
    let cmd = Cli::parse_from(["resite", "locations", "--quiet"]);
    assert!(cmd.quiet);
    assert!(matches!(cmd.command, Commands::Locations(_)));
}
