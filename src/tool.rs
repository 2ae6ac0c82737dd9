// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! CLI tool for building and querying a static hash index over a word list

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use humansize::{SizeFormatter, BINARY};
use rustyline::DefaultEditor;
use static_hash_index::{corpus, Config, DuplicateKeys, HashAlgorithm, Index, Probe};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

macro_rules! die {
    ($fmt:literal, $($arg:tt)*) => {{
        eprintln!($fmt, $($arg)*);
        std::process::exit(1);
    }};

    ($msg:literal) => {{
        eprintln!($msg);
        std::process::exit(1);
    }};

    () => {{
        eprintln!("Program terminated unexpectedly");
        std::process::exit(1);
    }};
}

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

pub fn init_tracing(quiet: bool, verbose: u8) -> (bool, LevelFilter) {
    let is_verbose = !quiet && verbose > 0;

    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Bridge log crate macros to tracing (for library code that uses log::*)
    tracing_log::LogTracer::init().expect("Failed to set log tracer");

    let registry = Registry::default();

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("SHI_LOG")
        .from_env_lossy()
        .add_directive(
            "rustyline=warn"
                .parse()
                .expect("Failed to parse rustyline directive"),
        );

    let subscriber = registry.with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        die!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing_panic::panic_hook(info);
        prev_hook(info); // daisy-chain to old panic hook
    }));

    (is_verbose, level_filter)
}

fn parse_hash_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse()
}

/// CLI tool for building and querying a static hash index over a word list
#[derive(Parser, Debug)]
#[command(name = "shi")]
#[command(about = "CLI tool for building and querying a static hash index over a word list")]
struct ToolArgs {
    /// Suppress all output except for errors. This overrides the -v flag.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Turn on verbose output. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a whitespace-separated word list
    words_path: PathBuf,

    /// Hash function (fnv1a, polynomial, djb2, xxh3)
    #[arg(
        short = 'H', long = "hash",
        default_value = "fnv1a",
        value_parser = parse_hash_algorithm,
        value_name = "ALGORITHM",
    )]
    hash: HashAlgorithm,

    /// Number of words per page
    #[arg(short, long, default_value_t = static_hash_index::config::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Maximum number of words per bucket
    #[arg(short = 'c', long = "capacity", default_value_t = static_hash_index::config::DEFAULT_BUCKET_CAPACITY)]
    bucket_capacity: usize,

    /// Load factor in percent used to size the bucket array
    #[arg(long, default_value_t = static_hash_index::config::DEFAULT_LOAD_FACTOR_PERCENT, value_name = "PERCENT")]
    load_factor: u32,

    /// Keep every page a word occurs on, instead of only the last one
    #[arg(long, default_value_t = false)]
    collect_pages: bool,

    /// Command to run (if omitted, starts interactive shell)
    #[command(subcommand)]
    command: Option<ToolCommand>,
}

#[derive(Subcommand, Debug, Clone)]
enum ToolCommand {
    /// Look up the page of a word using the index
    #[command(visible_alias = "search")]
    Get {
        /// The word to look up
        word: String,
    },
    /// Look up the page of a word by reading all pages in order
    Scan {
        /// The word to look up
        word: String,
    },
    /// Run an indexed lookup and a table scan, and compare their cost
    Compare {
        /// The word to look up
        word: String,
    },
    /// Show the words of a page
    Page {
        /// Page number, starting at 1
        number: usize,
    },
    /// Show the first and the last page
    Pages,
    /// List buckets and their overflow chains
    #[command(visible_alias = "ls")]
    Buckets {
        /// Only list this many buckets
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Only list buckets that have overflowed
        #[arg(short = 'o', long = "overflow-only")]
        overflow_only: bool,
    },
    /// Show index metrics
    Info,
}

// Internal shell commands, include all external tool commands
#[derive(Parser, Debug)]
#[command(name = "")]
#[command(no_binary_name = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "
{version}
Available Commands:

{subcommands}

Use `help COMMAND` or `COMMAND --help` for more details.

")]

struct ShellArgs {
    #[command(subcommand)]
    command: ShellCommand,
}

// Shell commands (including ones not available from CLI)
#[derive(Subcommand, Debug, Clone)]
enum ShellCommand {
    #[command(flatten)]
    ToolCmd(ToolCommand),

    /// Rebuild the index, optionally with different parameters
    Rebuild {
        /// Hash function (fnv1a, polynomial, djb2, xxh3)
        #[arg(short = 'H', long = "hash", value_parser = parse_hash_algorithm, value_name = "ALGORITHM")]
        hash: Option<HashAlgorithm>,

        /// Number of words per page
        #[arg(short, long)]
        page_size: Option<usize>,

        /// Maximum number of words per bucket
        #[arg(short = 'c', long = "capacity")]
        bucket_capacity: Option<usize>,
    },
    /// Exit the current shell
    #[command(visible_alias = "quit")]
    Exit,
}

struct Session {
    index: Index,
    path: PathBuf,
}

impl Session {
    fn open(path: PathBuf, config: Config) -> static_hash_index::Result<Self> {
        let words = corpus::read_words(&path)?;

        if let Ok(meta) = std::fs::metadata(&path) {
            info!(
                "loaded {} words ({}) from {}",
                words.len(),
                SizeFormatter::new(meta.len(), BINARY),
                path.display(),
            );
        }

        let index = config.build(words)?;

        Ok(Self { index, path })
    }

    fn rebuild(
        &mut self,
        hash: Option<HashAlgorithm>,
        page_size: Option<usize>,
        bucket_capacity: Option<usize>,
    ) -> static_hash_index::Result<()> {
        let mut config = self.index.config().clone();

        if let Some(hash) = hash {
            config = config.algorithm(hash);
        }
        if let Some(page_size) = page_size {
            config = config.page_size(page_size);
        }
        if let Some(bucket_capacity) = bucket_capacity {
            config = config.bucket_capacity(bucket_capacity);
        }

        let words = self.index.pages().words().to_vec();
        self.index = config.build(words)?;

        Ok(())
    }
}

fn print_info(session: &Session) {
    let index = &session.index;
    let config = index.config();

    println!("Word list: {}", session.path.display());
    println!("Hash function: {}", config.algorithm.label());
    println!("Words per page: {}", config.page_size);
    println!("Bucket capacity: {}", config.bucket_capacity);
    println!("Load factor: {}%", config.load_factor_percent);
    println!("Duplicate words: {:?}", config.duplicate_keys);
    println!("{}", index.metrics());
    println!("Build time: {:.4} seconds", index.build_time().as_secs_f64());
}

fn print_probe(word: &str, probe: &Probe<'_>) {
    match probe.pages {
        Some([page]) => println!("'{}' found on page {}", word, page + 1),
        Some(pages) => {
            let pages = pages
                .iter()
                .map(|page| (page + 1).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("'{}' found on pages {}", word, pages);
        }
        None => println!("(not found)"),
    }
    println!(
        "Index cost: {} page read (bucket {}, {} node(s) probed)",
        Probe::PAGE_READS,
        probe.bucket + 1,
        probe.probes
    );
}

fn handle_get(session: &Session, word: &str) {
    let probe = session.index.probe(word);
    print_probe(word, &probe);
}

fn handle_scan(session: &Session, word: &str) {
    let scan = session.index.scan(word);
    match scan.page {
        Some(page) => println!("'{}' found on page {}", word, page + 1),
        None => println!("(not found)"),
    }
    println!("Table scan cost: {} pages read", scan.pages_read);
}

fn handle_compare(session: &Session, word: &str) {
    let comparison = session.index.compare(word);

    println!("=== Index ===");
    print_probe(word, &comparison.indexed);
    println!(
        "Elapsed: {:.12} seconds",
        comparison.indexed_time.as_secs_f64()
    );

    println!("\n=== Table scan ===");
    match comparison.scan.page {
        Some(page) => println!("'{}' found on page {}", word, page + 1),
        None => println!("(not found)"),
    }
    println!(
        "Table scan cost: {} pages read",
        comparison.scan.pages_read
    );
    println!("Elapsed: {:.12} seconds", comparison.scan_time.as_secs_f64());

    println!(
        "\nTime difference (table scan - index): {:.12} seconds",
        comparison.time_difference_secs()
    );
}

fn print_page(number: usize, words: &[String]) {
    println!("=== Page {} ===", number);
    for word in words {
        println!("{}", word);
    }
}

fn handle_page(session: &Session, number: usize) {
    let page = number
        .checked_sub(1)
        .and_then(|id| session.index.pages().get(id as u64));

    match page {
        Some(words) => print_page(number, words),
        None => eprintln!(
            "Error: no page {} (there are {} pages)",
            number,
            session.index.pages().len()
        ),
    }
}

fn handle_pages(session: &Session) {
    let pages = session.index.pages();

    match (pages.first(), pages.last()) {
        (Some(first), Some(last)) => {
            print_page(1, first);
            if pages.len() > 1 {
                println!();
                print_page(pages.len(), last);
            }
        }
        _ => println!("(no pages)"),
    }
}

fn handle_buckets(session: &Session, limit: Option<usize>, overflow_only: bool) {
    let mut count = 0;

    for bucket in session
        .index
        .buckets()
        .iter()
        .filter(|bucket| !overflow_only || bucket.overflow_count() > 0)
        .take(limit.unwrap_or(usize::MAX))
    {
        println!("{}", bucket);
        count += 1;
    }

    println!("({} buckets)", count);
}

/// Result of executing a command
enum CommandResult {
    Continue,
    Exit,
}

/// Execute a parsed command
fn execute_command(session: &Session, cmd: ToolCommand) -> CommandResult {
    match cmd {
        ToolCommand::Get { word } => handle_get(session, &word),
        ToolCommand::Scan { word } => handle_scan(session, &word),
        ToolCommand::Compare { word } => handle_compare(session, &word),
        ToolCommand::Page { number } => handle_page(session, number),
        ToolCommand::Pages => handle_pages(session),
        ToolCommand::Buckets {
            limit,
            overflow_only,
        } => handle_buckets(session, limit, overflow_only),
        ToolCommand::Info => print_info(session),
    }
    CommandResult::Continue
}

/// Execute a shell-only command
fn execute_shell_command(session: &mut Session, cmd: ShellCommand) -> CommandResult {
    match cmd {
        ShellCommand::ToolCmd(tool_cmd) => execute_command(session, tool_cmd),
        ShellCommand::Rebuild {
            hash,
            page_size,
            bucket_capacity,
        } => {
            match session.rebuild(hash, page_size, bucket_capacity) {
                Ok(()) => println!(
                    "OK (rebuilt in {:.4} seconds)",
                    session.index.build_time().as_secs_f64()
                ),
                Err(e) => eprintln!("Error: {}", e),
            }
            CommandResult::Continue
        }
        ShellCommand::Exit => CommandResult::Exit,
    }
}

/// Parse and run a shell command line
fn run_shell_command(session: &mut Session, line: &str) -> CommandResult {
    let line = line.trim();
    if line.is_empty() {
        return CommandResult::Continue;
    }

    let tokens = match shlex::split(line) {
        Some(t) if !t.is_empty() => t,
        Some(_) => return CommandResult::Continue,
        None => {
            eprintln!("error: unclosed quote");
            return CommandResult::Continue;
        }
    };

    match ShellArgs::try_parse_from(&tokens) {
        Ok(args) => execute_shell_command(session, args.command),
        Err(e) => {
            // Print clap's error message
            eprintln!("{}", e);
            CommandResult::Continue
        }
    }
}

fn run_shell(session: &mut Session) {
    if io::stdin().is_terminal() {
        run_shell_interactive(session);
    } else {
        run_shell_non_interactive(session);
    }
}

fn run_shell_interactive(session: &mut Session) {
    println!("Welcome to the static hash index shell");
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error initializing line editor: {}", e);
            return;
        }
    };

    loop {
        match rl.readline("shi> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                if let CommandResult::Exit = run_shell_command(session, &line) {
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ignore Ctrl+C, just show a new prompt
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }
}

fn run_shell_non_interactive(session: &mut Session) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if stdout.flush().is_err() {
            die!("can't flush stdout");
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // EOF
                break;
            }
            Ok(_) => {
                if let CommandResult::Exit = run_shell_command(session, &line) {
                    break;
                }
            }
            Err(e) => {
                die!("Error reading input: {}", e);
            }
        }
    }
}

fn main() {
    let args = ToolArgs::parse();
    let (verbose, level_filter) = init_tracing(args.quiet, args.verbose);

    let cmd = ToolArgs::command();

    info!(
        "starting {} ({} {}), log level: {level_filter}",
        cmd.get_name(),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let duplicate_keys = if args.collect_pages {
        DuplicateKeys::Collect
    } else {
        DuplicateKeys::Overwrite
    };

    let config = Config::new(args.hash)
        .page_size(args.page_size)
        .bucket_capacity(args.bucket_capacity)
        .load_factor_percent(args.load_factor)
        .duplicate_keys(duplicate_keys);

    let mut session = match Session::open(args.words_path, config) {
        Ok(s) => s,
        Err(e) => {
            let note = if verbose {
                ""
            } else {
                ". Note: Use -v (one or multiple times) for more information"
            };
            die!("Error building index: {}{}", e, note);
        }
    };

    match args.command {
        Some(cmd) => {
            execute_command(&session, cmd);
        }
        None => run_shell(&mut session),
    }
}
