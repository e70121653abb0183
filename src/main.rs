//! git-dirs: find every git repository under a directory and report whether it is clean or dirty

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};
use std::path::PathBuf;

use git_dirs::commands::scan::handle_scan_command;
use git_dirs::core::{get_status_concurrency, ExcludePolicy, ScanOptions, WalkOptions};
use git_dirs::utils::{init_tracing, verbosity_level};

fn build_cli() -> ClapCommand {
    ClapCommand::new("git-dirs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Find git repositories under a directory and report whether each working tree is clean or dirty")
        .arg(
            Arg::new("path")
                .help("Directory to scan")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of repositories to check concurrently")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .help("Check one repository at a time (same as --jobs 1)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Maximum directory depth to descend below the root")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("follow-links")
                .short('L')
                .long("follow-links")
                .help("Descend into symlinked directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict-excludes")
                .long("strict-excludes")
                .help("Report a repository as failed when its .git/info/exclude cannot be read")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (repeatable); RUST_LOG overrides")
                .action(ArgAction::Count),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    init_tracing(verbosity_level(matches.get_count("verbose")));

    let concurrency = get_status_concurrency(
        matches.get_one::<usize>("jobs").copied(),
        matches.get_flag("sequential"),
    );

    let exclude_policy = if matches.get_flag("strict-excludes") {
        ExcludePolicy::Strict
    } else {
        ExcludePolicy::Lenient
    };

    let options = ScanOptions {
        concurrency,
        walk: WalkOptions {
            max_depth: matches.get_one::<usize>("max-depth").copied(),
            follow_links: matches.get_flag("follow-links"),
            ..WalkOptions::default()
        },
        exclude_policy,
    };

    // `path` is required, so clap has already rejected a missing argument
    match matches.get_one::<PathBuf>("path") {
        Some(path) => handle_scan_command(path, options).await,
        None => Ok(()),
    }
}
