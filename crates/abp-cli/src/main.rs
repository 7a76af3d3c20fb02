//! ABP CLI
//!
//! CLI tool for checking URLs against AdBlock Plus filter lists.

mod lists;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;

use abp_core::{BuildOptions, InvalidRulePolicy, MatcherEngine, RequestContext};

use lists::{load_options, load_rule_set};

#[derive(Parser)]
#[command(name = "abp")]
#[command(about = "AdBlock Plus filter list matcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ListArgs {
    /// Input filter list files
    #[arg(short, long, required = true)]
    list: Vec<String>,

    /// JSON file with build options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Matching engine for option-free rules
    #[arg(long, value_enum)]
    engine: Option<EngineArg>,

    /// Drop invalid lines instead of failing
    #[arg(long)]
    skip_invalid: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether URLs are blocked
    Check {
        #[command(flatten)]
        lists: ListArgs,

        /// URLs to check
        #[arg(short, long, required = true)]
        url: Vec<String>,

        /// Domain of the page issuing the request
        #[arg(long)]
        domain: Option<String>,

        /// Boolean request option, e.g. third-party=true
        #[arg(long = "set", value_parser = parse_option_flag)]
        options: Vec<(String, bool)>,
    },

    /// Print rule set statistics
    Stats {
        #[command(flatten)]
        lists: ListArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    Regex,
    RegexSet,
}

impl From<EngineArg> for MatcherEngine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Regex => MatcherEngine::Regex,
            EngineArg::RegexSet => MatcherEngine::RegexSet,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Check { lists, .. } | Commands::Stats { lists } => lists.verbose,
    };
    let env = Env::default().filter_or("RUST_LOG", if verbose { "debug" } else { "info" });
    env_logger::Builder::from_env(env).init();

    let result = match cli.command {
        Commands::Check {
            lists,
            url,
            domain,
            options,
        } => cmd_check(&lists, &url, domain, &options),
        Commands::Stats { lists } => cmd_stats(&lists),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn parse_option_flag(value: &str) -> Result<(String, bool), String> {
    let (name, flag) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=BOOL, got '{}'", value))?;
    let flag = flag
        .parse::<bool>()
        .map_err(|_| format!("expected true or false for '{}'", name))?;
    Ok((name.to_string(), flag))
}

fn build_options(args: &ListArgs) -> Result<BuildOptions, String> {
    let mut options = load_options(args.config.as_deref())?;
    if let Some(engine) = args.engine {
        options = options.with_engine(engine.into());
    }
    if args.skip_invalid {
        options = options.with_invalid_rules(InvalidRulePolicy::Skip);
    }
    Ok(options)
}

fn cmd_check(
    args: &ListArgs,
    urls: &[String],
    domain: Option<String>,
    flags: &[(String, bool)],
) -> Result<(), String> {
    let options = build_options(args)?;
    let (rule_set, _) = load_rule_set(&args.list, &options, args.verbose)?;

    let mut ctx = RequestContext::new();
    if let Some(domain) = domain {
        ctx = ctx.with_domain(domain);
    }
    for (name, flag) in flags {
        ctx = ctx.with_option(name.as_str(), *flag);
    }

    for url in urls {
        let blocked = rule_set
            .should_block(url, &ctx)
            .map_err(|e| format!("Failed to check '{}': {}", url, e))?;
        println!("{}  {}", if blocked { "BLOCK" } else { "ALLOW" }, url);
    }

    Ok(())
}

fn cmd_stats(args: &ListArgs) -> Result<(), String> {
    let options = build_options(args)?;
    let (rule_set, load) = load_rule_set(&args.list, &options, args.verbose)?;
    let stats = rule_set.stats();

    println!("Loaded {} filter lists", args.list.len());
    println!("  Lines:    {}", load.lines);
    println!("  Rules:    {} -> {} (dedupe removed {})", load.rules_before, load.rules_after, load.rules_before - load.rules_after);
    println!("  Engine:   {:?}", rule_set.engine());
    println!("  Time:     {:.1}ms", load.total_ms);
    println!();
    println!("Partitions:");
    println!("  Basic block:       {}", stats.basic_blacklist);
    println!("  Basic allow:       {}", stats.basic_whitelist);
    println!("  Advanced block:    {}", stats.advanced_blacklist);
    println!("  Advanced allow:    {}", stats.advanced_whitelist);
    println!("  Total matchable:   {}", stats.total());

    Ok(())
}
