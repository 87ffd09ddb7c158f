use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deskfind_core::snippet::{highlight, snippet};
use deskfind_core::{Config, Library, RankMode, ScoredHit, TracingTelemetry};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Parser)]
#[command(name = "deskfind")]
#[command(about = "Index a folder of text documents and search it", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory to index (defaults to ~/data)
    #[arg(long, global = true)]
    data_dir: Option<String>,
    /// Ranking: character_overlap, term_frequency or match_count
    #[arg(long, global = true)]
    rank: Option<RankMode>,
    /// Maximum number of results to show
    #[arg(long, global = true)]
    limit: Option<usize>,
    /// Index .md files as well as .txt
    #[arg(long, global = true, default_value_t = false)]
    include_md: bool,
    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the ranked results
    Search {
        query: Vec<String>,
        /// Emit results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Show match counts and rank scores
        #[arg(long, default_value_t = false)]
        scores: bool,
    },
    /// Interactive prompt; one query per line
    Shell,
    /// Copy a file into the data directory and index it
    Import { file: PathBuf },
    /// Print index statistics
    Stats {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let config = load_config(&cli)?;

    let mut library = Library::open(config, Arc::new(TracingTelemetry))
        .context("failed to open document library")?;
    let report = library.last_report();
    tracing::info!(
        dir = %library.data_dir().display(),
        indexed = report.indexed.len(),
        skipped = report.skipped.len(),
        "library ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run(cli.command, &mut library, &mut out);
    library.close();
    result
}

fn run(command: Commands, library: &mut Library, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Search { query, json, scores } => run_search(library, &query.join(" "), json, scores, out),
        Commands::Shell => run_shell(library, io::stdin().lock(), out),
        Commands::Import { file } => {
            let id = library.import(&file)?;
            writeln!(out, "indexed {id}")?;
            Ok(())
        }
        Commands::Stats { json } => print_stats(library, json, out),
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            fmt().with_env_filter(filter).with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            fmt().with_env_filter(filter).with_writer(io::stderr).init();
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(rank) = cli.rank {
        config.rank_mode = rank;
    }
    if let Some(limit) = cli.limit {
        config.max_results = Some(limit);
    }
    if cli.include_md {
        config.include_markdown();
    }
    config.validate().context("invalid command-line override")?;
    Ok(config)
}

fn run_search(library: &Library, query: &str, json: bool, scores: bool, out: &mut impl Write) -> Result<()> {
    let hits = library.search_scored(query);
    if json {
        serde_json::to_writer_pretty(&mut *out, &hits)?;
        writeln!(out)?;
    } else {
        render(&hits, &library.query_terms(query), library.config().snippet_width, scores, out)?;
    }
    Ok(())
}

fn run_shell(library: &mut Library, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} documents in {}. Type :help for commands.", library.stats().documents, library.data_dir().display())?;
    write!(out, "> ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("", _) => {}
            (":q" | ":quit", _) => break,
            (":help", _) => writeln!(out, ":open <id>  show a document\n:reload     rescan the data directory\n:stats      index statistics\n:quit       leave")?,
            (":stats", _) => print_stats(library, false, out)?,
            (":reload", _) => match library.reload() {
                Ok(report) => writeln!(out, "reloaded: {} indexed, {} skipped", report.indexed.len(), report.skipped.len())?,
                Err(err) => writeln!(out, "reload failed: {err}")?,
            },
            (":open", id) => match library.get_content(id) {
                Ok(content) => writeln!(out, "{content}")?,
                Err(err) => writeln!(out, "{err}")?,
            },
            _ => {
                let hits = library.search_scored(line);
                render(&hits, &library.query_terms(line), library.config().snippet_width, false, out)?;
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn render(hits: &[ScoredHit], terms: &[String], width: usize, scores: bool, out: &mut impl Write) -> io::Result<()> {
    if hits.is_empty() {
        return writeln!(out, "No results found.");
    }
    for (rank, hit) in hits.iter().enumerate() {
        if scores {
            writeln!(out, "{}. {} (matched {}, score {})", rank + 1, hit.id, hit.matched_terms, hit.score)?;
        } else {
            writeln!(out, "{}. {}", rank + 1, hit.id)?;
        }
        if let Some(preview) = snippet(&hit.content, terms, width) {
            let preview = preview.split_whitespace().collect::<Vec<_>>().join(" ");
            writeln!(out, "   {}", highlight(&preview, terms, "[", "]"))?;
        }
    }
    Ok(())
}

fn print_stats(library: &Library, json: bool, out: &mut impl Write) -> Result<()> {
    let stats = library.stats();
    if json {
        serde_json::to_writer_pretty(&mut *out, &stats)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "documents: {}\nterms: {}\npostings: {}\ntokens: {}\nskipped at last scan: {}",
            stats.documents,
            stats.terms,
            stats.postings,
            stats.tokens,
            library.last_report().skipped.len()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskfind_core::NoopTelemetry;
    use std::fs;
    use tempfile::TempDir;

    fn library_with(files: &[(&str, &str)]) -> (TempDir, Library) {
        let tmp = TempDir::new().unwrap();
        for (name, body) in files {
            fs::write(tmp.path().join(name), body).unwrap();
        }
        let config = Config { data_dir: tmp.path().to_string_lossy().into_owned(), ..Config::default() };
        let library = Library::open(config, Arc::new(NoopTelemetry)).unwrap();
        (tmp, library)
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["deskfind", "search", "brown", "fox", "--rank", "tf", "--include-md"]).unwrap();
        assert_eq!(cli.rank, Some(RankMode::TermFrequency));
        assert!(cli.include_md);
        match cli.command {
            Commands::Search { query, .. } => assert_eq!(query, vec!["brown", "fox"]),
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn rejects_unknown_rank_mode() {
        assert!(Cli::try_parse_from(["deskfind", "--rank", "bm25", "stats"]).is_err());
    }

    #[test]
    fn render_reports_empty_results() {
        let mut out = Vec::new();
        render(&[], &[], 80, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No results found.\n");
    }

    #[test]
    fn render_highlights_matches() {
        let hits = vec![ScoredHit { id: "a.txt".into(), content: "The quick\nbrown fox".into(), matched_terms: 1, score: 6 }];
        let mut out = Vec::new();
        render(&hits, &["brown".to_string()], 80, true, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1. a.txt (matched 1, score 6)\n   The quick [brown] fox\n");
    }

    #[test]
    fn zero_limit_is_rejected() {
        let cli = Cli::try_parse_from(["deskfind", "--limit", "0", "stats"]).unwrap();
        assert!(load_config(&cli).is_err());
        let cli = Cli::try_parse_from(["deskfind", "--limit", "3", "stats"]).unwrap();
        assert_eq!(load_config(&cli).unwrap().max_results, Some(3));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let cli = Cli::try_parse_from(["deskfind", "--config", missing.to_str().unwrap(), "stats"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn search_preview_skips_query_stopwords() {
        let body = format!("the opening {} heron end", "filler ".repeat(60));
        let (_tmp, library) = library_with(&[("a.txt", body.as_str())]);
        let mut out = Vec::new();
        run_search(&library, "the heron", false, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[heron]"));
        assert!(!text.contains("[the]"));
    }

    #[test]
    fn shell_runs_queries_until_quit() {
        let (_tmp, mut library) = library_with(&[("a.txt", "The quick brown fox"), ("b.txt", "The slow brown turtle")]);
        let input = io::Cursor::new("turtle\n:stats\n:quit\nfox\n");
        let mut out = Vec::new();
        run_shell(&mut library, input, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("2 documents in"));
        assert!(text.contains("b.txt"));
        assert!(text.contains("documents: 2"));
        assert!(!text.contains("a.txt"));
    }

    #[test]
    fn search_json_lists_hits() {
        let (_tmp, library) = library_with(&[("a.txt", "The quick brown fox")]);
        let mut out = Vec::new();
        run_search(&library, "fox", true, false, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["content"], "The quick brown fox");
    }
}
