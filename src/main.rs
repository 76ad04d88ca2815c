//! aeo: Answer-Engine-Optimization content scorer CLI

use aeo_scorer::batch::{analyze_batch, batch_stats, load_manifest};
use aeo_scorer::cache::{AnalysisCache, ScoreInputs};
use aeo_scorer::config::{
    build_ignore_set, is_content_file, is_ignored, load_config, write_starter_config, Config,
    CONFIG_FILENAME,
};
use aeo_scorer::history::{
    append_run, compare, find_project_root, format_delta, load_history, load_result,
    previous_score, save_history,
};
use aeo_scorer::reporter::{ConsoleReporter, JsonReporter, MarkdownReporter};
use aeo_scorer::watcher::ContentWatcher;
use aeo_scorer::{AeoScorer, DocumentReport};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// aeo: score marketing content for answer-engine visibility
#[derive(Parser, Debug)]
#[command(name = "aeo")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Content file or directory to analyze, or "-" for stdin (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Output format as Markdown
    #[arg(long, short, conflicts_with = "json")]
    markdown: bool,

    /// Minimum overall score (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<f64>,

    /// Target query the content should answer (repeatable; replaces configured queries)
    #[arg(long = "query", value_name = "QUERY")]
    queries: Vec<String>,

    /// URL where the content is published (recorded in metadata)
    #[arg(long)]
    url: Option<String>,

    /// Content type label, e.g. article, faq, guide
    #[arg(long)]
    content_type: Option<String>,

    /// Year the freshness check treats as current (default: this year)
    #[arg(long)]
    year: Option<i32>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Path to config file (default: search .aeorc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch for file changes and re-score
    #[arg(long)]
    watch: bool,

    /// Disable caching (re-score all files even if unchanged)
    #[arg(long)]
    no_cache: bool,

    /// Clear the result cache before running
    #[arg(long)]
    clear_cache: bool,

    /// Score files in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .aeorc.json with a starter brand profile
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Score every item of a JSON manifest
    Batch {
        /// Manifest: an array of items or {"items": [...]}
        manifest: PathBuf,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Minimum average score (exit 1 if below)
        #[arg(long, short)]
        threshold: Option<f64>,

        /// Year the freshness check treats as current
        #[arg(long)]
        year: Option<i32>,

        /// Path to config file providing the brand profile
        #[arg(long)]
        config: Option<PathBuf>,

        /// Score items in parallel
        #[arg(long)]
        parallel: bool,

        /// Number of parallel threads
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Compare two saved JSON results of the same content (exit 1 if the score dropped)
    Compare {
        before: PathBuf,
        after: PathBuf,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Diagnostics go to stderr, filtered by AEO_LOG (default: warn)
fn init_logging() {
    let filter = EnvFilter::try_from_env("AEO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run() -> Result<ExitCode> {
    let mut args = Args::parse();

    if let Some(cmd) = args.command.take() {
        return match cmd {
            Commands::Init { dir } => run_init(dir.as_deref()),
            Commands::Batch {
                manifest,
                json,
                threshold,
                year,
                config,
                parallel,
                jobs,
            } => {
                set_jobs(jobs);
                run_batch(&manifest, json, threshold, year, config.as_deref(), parallel)
            }
            Commands::Compare {
                before,
                after,
                json,
            } => run_compare(&before, &after, json),
        };
    }

    if args.no_color {
        colored::control::set_override(false);
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("a path is required when no subcommand is given");
    };

    if path == Path::new("-") {
        return run_stdin(&args);
    }

    if args.watch {
        return run_watch(&args, &path);
    }

    let work_dir = work_dir_for(&path);
    let config = load_config(work_dir, args.config.as_deref())?.merge_with_cli(
        args.threshold,
        &args.queries,
        args.content_type.as_deref(),
    );

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    // contentRoot from config narrows the search, otherwise the CLI path
    let search_path = match config.content_root {
        Some(ref content_root) => work_dir.join(content_root),
        None => path.clone(),
    };

    let patterns = config.get_content_patterns();
    let files = collect_content_files(&search_path, ignore_set.as_ref(), &patterns)?;
    if files.is_empty() {
        eprintln!("{}: No content files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let project_root = find_project_root(work_dir).unwrap_or_else(|| work_dir.to_path_buf());
    let mut cache = if args.no_cache {
        AnalysisCache::disabled()
    } else {
        AnalysisCache::new(&project_root)
    };
    if args.clear_cache {
        cache.clear();
        if !args.quiet {
            eprintln!("{}: Cache cleared", "Info".blue());
        }
    }

    set_jobs(args.jobs);
    let scorer = build_scorer(&config, args.year);
    let use_parallel = args.parallel || files.len() > 10;

    let (reports, had_errors) = analyze_files(
        &scorer,
        &files,
        &config,
        args.url.as_deref(),
        &mut cache,
        use_parallel,
        args.quiet,
    );

    if let Err(e) = cache.save() {
        if !args.quiet {
            eprintln!("{}: Failed to save cache: {}", "Warning".yellow(), e);
        }
    }

    if reports.is_empty() {
        eprintln!("{}: All files failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = aeo_scorer::batch::aggregate_stats(reports.iter().map(|r| &r.analysis), 0);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if reports.len() == 1 {
            println!("{}", reporter.report(&reports[0].analysis));
        } else {
            println!("{}", reporter.report_with_summary(&reports, &stats));
        }
    } else if args.markdown {
        let reporter = MarkdownReporter::new();
        if reports.len() == 1 {
            print!("{}", reporter.report(&reports[0]));
        } else {
            print!("{}", reporter.report_many(&reports, &stats));
        }
    } else if args.quiet {
        let reporter = console_reporter(&args);
        let history = find_project_root(work_dir).map(|root| load_history(&root));
        for report in &reports {
            match history {
                Some(ref h) => {
                    let prev = previous_score(h, &report.path);
                    println!(
                        "{}: {:.1} ({}){}",
                        report.path.display(),
                        report.analysis.overall_score,
                        report.analysis.grade,
                        format_delta(prev, report.analysis.overall_score)
                    );
                }
                None => reporter.report_quiet(report),
            }
        }
        record_history(work_dir, &reports);
    } else {
        let reporter = console_reporter(&args);
        if reports.len() == 1 {
            reporter.report(&reports[0]);
        } else {
            reporter.report_many(&reports, &stats);
        }
        record_history(work_dir, &reports);
    }

    // Every document must meet its own (possibly overridden) threshold
    let mut below = false;
    for report in &reports {
        let Some(threshold) = config.effective_for_file(&report.path).threshold else {
            continue;
        };
        if report.analysis.overall_score < threshold {
            below = true;
            if !args.quiet && !args.json {
                eprintln!(
                    "{}: {} scored {:.1}, below threshold {}",
                    "Failed".red().bold(),
                    report.path.display(),
                    report.analysis.overall_score,
                    threshold
                );
            }
        }
    }
    if below {
        return Ok(ExitCode::from(1));
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn work_dir_for(path: &Path) -> &Path {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    } else {
        path
    }
}

fn set_jobs(jobs: Option<usize>) {
    if let Some(jobs) = jobs {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
        {
            tracing::warn!(error = %e, "could not configure thread pool");
        }
    }
}

fn build_scorer(config: &Config, year: Option<i32>) -> AeoScorer {
    let scorer = AeoScorer::new().with_profile(config.brand.clone());
    match year {
        Some(year) => scorer.with_current_year(year),
        None => scorer,
    }
}

fn console_reporter(args: &Args) -> ConsoleReporter {
    let mut reporter = ConsoleReporter::new();
    if args.verbose {
        reporter = reporter.verbose();
    }
    if args.no_color {
        reporter = reporter.without_colors();
    }
    reporter
}

fn record_history(work_dir: &Path, reports: &[DocumentReport]) {
    if let Some(root) = find_project_root(work_dir) {
        let mut history = load_history(&root);
        append_run(&mut history, reports, None);
        if let Err(e) = save_history(&root, &history) {
            tracing::warn!(error = %e, "could not save history");
        }
    }
}

fn run_init(dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let path = write_starter_config(dir)?;
    println!(
        "{}: Created {} (fill in brand.name, productKeywords and highValueTerms)",
        "Done".green().bold(),
        path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_stdin(args: &Args) -> Result<ExitCode> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read content from stdin")?;

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, args.config.as_deref())?.merge_with_cli(
        args.threshold,
        &args.queries,
        args.content_type.as_deref(),
    );
    let effective = config.effective_for_file(Path::new("-"));
    let analysis = build_scorer(&config, args.year).analyze(
        &content,
        Some(effective.target_queries.as_slice()),
        args.url.as_deref(),
        &effective.content_type,
    )?;
    let report = DocumentReport {
        path: PathBuf::from("-"),
        analysis,
    };

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report.analysis));
    } else if args.markdown {
        print!("{}", MarkdownReporter::new().report(&report));
    } else if args.quiet {
        console_reporter(args).report_quiet(&report);
    } else {
        console_reporter(args).report(&report);
    }

    match effective.threshold {
        Some(threshold) if report.analysis.overall_score < threshold => {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Score {:.1} is below threshold {}",
                    "Failed".red().bold(),
                    report.analysis.overall_score,
                    threshold
                );
            }
            Ok(ExitCode::from(1))
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn run_batch(
    manifest: &Path,
    json: bool,
    threshold: Option<f64>,
    year: Option<i32>,
    config_path: Option<&Path>,
    parallel: bool,
) -> Result<ExitCode> {
    let mut items = load_manifest(manifest)?;
    let config = load_config(work_dir_for(manifest), config_path)?;

    // Items without their own queries or type fall back to the config
    for item in &mut items {
        if item.target_queries.is_empty() {
            item.target_queries = config.target_queries.clone();
        }
        if item.content_type.is_none() {
            item.content_type = config.content_type.clone();
        }
    }

    let scorer = build_scorer(&config, year);
    let entries = analyze_batch(&scorer, &items, parallel || items.len() > 10);
    let stats = batch_stats(&entries);

    if json {
        println!("{}", JsonReporter::new().pretty().report_batch(&entries, &stats));
    } else {
        ConsoleReporter::new().report_batch(&entries, &stats);
    }

    if stats.items_analyzed == 0 {
        eprintln!("{}: All items failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }
    if let Some(threshold) = threshold.or(config.threshold) {
        if stats.average_score < threshold {
            if !json {
                eprintln!(
                    "\n{}: Average score {:.1} is below threshold {}",
                    "Failed".red().bold(),
                    stats.average_score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }
    if stats.failed > 0 {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_compare(before: &Path, after: &Path, json: bool) -> Result<ExitCode> {
    let progress = compare(&load_result(before)?, &load_result(after)?);

    if json {
        println!("{}", JsonReporter::new().pretty().report_progress(&progress));
    } else {
        ConsoleReporter::new().report_progress(before, after, &progress);
    }

    if progress.overall_delta < 0.0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_watch(args: &Args, path: &Path) -> Result<ExitCode> {
    let work_dir = work_dir_for(path);
    let config = load_config(work_dir, args.config.as_deref())?.merge_with_cli(
        args.threshold,
        &args.queries,
        args.content_type.as_deref(),
    );
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let scorer = build_scorer(&config, args.year);
    let reporter = console_reporter(args);
    let patterns = config.get_content_patterns();
    let watcher =
        ContentWatcher::watch(path, &patterns).context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let changed = watcher.next_changes();
        for file in changed.into_iter().filter(|p| {
            ignore_set
                .as_ref()
                .map(|set| !is_ignored(p, set))
                .unwrap_or(true)
        }) {
            match analyze_file(&scorer, &file, &config, args.url.as_deref(), None) {
                Ok((report, _)) => {
                    if args.quiet {
                        reporter.report_quiet(&report);
                    } else {
                        reporter.report(&report);
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}: {:#}", "Error".red(), file.display(), e);
                }
            }
        }
    }
}

fn collect_content_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e.path()))
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if !entry.file_type().is_file() || !is_content_file(file_path, patterns) {
            continue;
        }
        if let Some(set) = ignore_set {
            if is_ignored(file_path, set) {
                continue;
            }
        }
        files.push(file_path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n == "node_modules" || n == ".git")
}

fn score_inputs<'a>(
    content: &'a str,
    effective: &'a aeo_scorer::config::EffectiveConfig,
    url: Option<&'a str>,
    config: &'a Config,
    year: i32,
) -> ScoreInputs<'a> {
    ScoreInputs {
        content,
        target_queries: &effective.target_queries,
        content_type: &effective.content_type,
        content_url: url,
        profile: &config.brand,
        year,
    }
}

/// Score one file. The second value holds the content when it was freshly
/// scored (so the caller can cache it) and is None on a cache hit.
fn analyze_file(
    scorer: &AeoScorer,
    file: &Path,
    config: &Config,
    url: Option<&str>,
    cache: Option<&AnalysisCache>,
) -> Result<(DocumentReport, Option<String>)> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let effective = config.effective_for_file(file);

    if let Some(cache) = cache {
        let inputs = score_inputs(&content, &effective, url, config, scorer.effective_year());
        if let Some(analysis) = cache.get(file, &inputs) {
            tracing::debug!(file = %file.display(), "cache hit");
            return Ok((
                DocumentReport {
                    path: file.to_path_buf(),
                    analysis,
                },
                None,
            ));
        }
    }

    let analysis = scorer.analyze(
        &content,
        Some(effective.target_queries.as_slice()),
        url,
        &effective.content_type,
    )?;
    Ok((
        DocumentReport {
            path: file.to_path_buf(),
            analysis,
        },
        Some(content),
    ))
}

/// Score files (in parallel if asked) reading from the cache, then store fresh
/// results. Output order matches `files`.
fn analyze_files(
    scorer: &AeoScorer,
    files: &[PathBuf],
    config: &Config,
    url: Option<&str>,
    cache: &mut AnalysisCache,
    parallel: bool,
    quiet: bool,
) -> (Vec<DocumentReport>, bool) {
    let outcomes: Vec<Result<(DocumentReport, Option<String>)>> = {
        let cache = &*cache;
        if parallel {
            files
                .par_iter()
                .map(|file| analyze_file(scorer, file, config, url, Some(cache)))
                .collect()
        } else {
            files
                .iter()
                .map(|file| analyze_file(scorer, file, config, url, Some(cache)))
                .collect()
        }
    };

    let year = scorer.effective_year();
    let mut reports = Vec::with_capacity(files.len());
    let mut had_errors = false;
    let mut cache_hits = 0;

    for (file, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Ok((report, fresh)) => {
                match fresh {
                    Some(content) => {
                        let effective = config.effective_for_file(file);
                        let inputs = score_inputs(&content, &effective, url, config, year);
                        cache.set(file, &inputs, report.analysis.clone());
                    }
                    None => cache_hits += 1,
                }
                reports.push(report);
            }
            Err(e) => {
                if !quiet {
                    eprintln!(
                        "{}: Failed to analyze {}: {:#}",
                        "Error".red(),
                        file.display(),
                        e
                    );
                }
                had_errors = true;
            }
        }
    }

    if !quiet && cache_hits > 0 {
        eprintln!(
            "{}: {} files from cache, {} analyzed",
            "Cache".blue(),
            cache_hits,
            files.len() - cache_hits
        );
    }

    (reports, had_errors)
}
