mod cli;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;

use git_netlog::assemble::MODE_SIGNATURE;
use git_netlog::macros::ok_or_continue;
use git_netlog::retrieve::with_header;
use git_netlog::{get_log, parse_commits, CommitLog};

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    SimpleLogger::new().with_level(level).init()?;

    let logs = filter_author(load_logs(&args)?, args.author.as_deref());

    if args.json || args.outfile.is_some() {
        let json = to_json(&logs)?;
        match &args.outfile {
            Some(outfile) => fs::write(outfile, json)
                .with_context(|| format!("Couldn't write output to {:?}", outfile))?,
            None => println!("{}", json),
        }
        return Ok(());
    }

    for log in logs.iter() {
        print_summary(log);
    }
    return Ok(());
}

/// Narrows every log to one author's commits, when asked to.
fn filter_author(logs: Vec<CommitLog>, author: Option<&str>) -> Vec<CommitLog> {
    match author {
        Some(author) => logs.iter().map(|log| log.for_author(author)).collect(),
        None => logs,
    }
}

fn to_json(logs: &[CommitLog]) -> Result<String> {
    let json = match logs {
        [single] => single.to_json()?,
        all => serde_json::to_string_pretty(all)?,
    };
    return Ok(json);
}

/// Reads every requested log; inputs that can't be read or parsed are skipped.
fn load_logs(args: &Args) -> Result<Vec<CommitLog>> {
    if let Some(path) = &args.path {
        let log = get_log(path, args.mode)
            .with_context(|| format!("Couldn't get the git log of {:?}", path))?;
        return Ok(vec![log]);
    }

    let mut logs = Vec::new();
    for input in args.input.iter() {
        let mut text = ok_or_continue!(fs::read_to_string(input));
        // Plain `git log > file` output has no header yet.
        if !text.starts_with(MODE_SIGNATURE) {
            text = with_header(&text, args.mode);
        }
        let parsed = ok_or_continue!(parse_commits(&text));
        logs.push(CommitLog::new(parsed, "file", input));
    }
    return Ok(logs);
}

fn print_summary(log: &CommitLog) {
    println!(
        "{} {} commits from {:?}",
        "==>".blue(),
        log.len(),
        log.path,
    );

    for (key, record) in log.commits.iter() {
        println!(
            "{} {:<24} {:>3} files {} {}",
            key.as_str().yellow(),
            record.author.as_deref().unwrap_or("?"),
            record.fedits.unwrap_or(0),
            format!("+{}", record.inserts.unwrap_or(0)).green(),
            format!("-{}", record.deletes.unwrap_or(0)).red(),
        );
    }

    if !log.commits.warnings.is_empty() {
        println!(
            "{}",
            format!("{} parse warnings", log.commits.warnings.len()).red()
        );
        for warning in log.commits.warnings.iter() {
            debug!("{}", warning);
        }
    }
}
