use std::path::PathBuf;
use std::process::ExitCode;

use tracing::Level;

use i18n_marker::injector::RuleOutcome;
use i18n_marker::rules::{self, RuleSet};
use i18n_marker::{mark_file, MarkOptions};

const HELP: &str = "\
i18n-marker: add data-i18n attributes to a static HTML document

USAGE:
  i18n-marker [OPTIONS] [FILE]

ARGS:
  <FILE>          document to mark up [default: index.html]

OPTIONS:
  --rules <PATH>  load the rule table from a TOML file instead of the
                  built-in one
  --dry-run       report what would change without writing anything
  --no-backup     overwrite in place without a timestamped backup
  --verbose       per-rule debug logging
  -h, --help      print this help
";

struct Cli {
    file: PathBuf,
    rules: Option<PathBuf>,
    dry_run: bool,
    no_backup: bool,
    verbose: bool,
}

fn parse_args() -> Result<Option<Cli>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let cli = Cli {
        rules: args.opt_value_from_str("--rules")?,
        dry_run: args.contains("--dry-run"),
        no_backup: args.contains("--no-backup"),
        verbose: args.contains("--verbose"),
        file: args
            .finish()
            .into_iter()
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("index.html")),
    };
    Ok(Some(cli))
}

fn main() -> ExitCode {
    let cli = match parse_args() {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprint!("{HELP}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> i18n_marker::error::Result<()> {
    let loaded;
    let rules: &RuleSet = match &cli.rules {
        Some(path) => {
            loaded = rules::load_rule_file(path)?;
            &loaded
        }
        None => rules::builtin_rules(),
    };

    let options = MarkOptions {
        dry_run: cli.dry_run,
        backup: !cli.no_backup,
    };
    let outcome = mark_file(&cli.file, rules, &options)?;

    let mut marked = 0usize;
    let mut unmatched = 0usize;
    let mut already = 0usize;
    for report in &outcome.reports {
        match report.outcome {
            RuleOutcome::Replaced(_) => marked += 1,
            RuleOutcome::NoMatch => unmatched += 1,
            RuleOutcome::AlreadyMarked => already += 1,
        }
    }

    let file = cli.file.display();
    if cli.dry_run {
        println!(
            "Dry run: {marked} of {} rules would mark {file} \
             ({unmatched} unmatched, {already} already marked)",
            outcome.reports.len()
        );
    } else if outcome.changed {
        println!("Successfully added data-i18n attributes to {file}");
        println!(
            "{marked} of {} rules applied ({unmatched} unmatched, {already} already marked)",
            outcome.reports.len()
        );
    } else {
        println!("No changes: {file} contains none of the unmarked fragments");
    }
    Ok(())
}
