//! refmark CLI - reference phrase highlighting tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use refmark::batch::{BatchProgress, DEFAULT_OUTPUT_SUFFIX};
use refmark::{
    CancelToken, Error, ExtractionPolicy, JsonFormat, MatchStrategy, Refmark, RefmarkSession,
    TargetFile,
};

#[derive(Parser)]
#[command(name = "refmark")]
#[command(version)]
#[command(about = "Highlight reference phrases from a DOCX in batches of text files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Highlight target files and write one DOCX per file
    Run {
        /// Reference DOCX file
        #[arg(short, long, value_name = "REF")]
        reference: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Target files
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Abort on the first failing file
        #[arg(long)]
        strict: bool,

        /// Process files in parallel
        #[arg(long)]
        parallel: bool,

        /// Suffix appended to output file names
        #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX)]
        suffix: String,

        /// Keep numeric and generator-marker paragraphs
        #[arg(long)]
        keep_boilerplate: bool,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Print the phrases extracted from a reference document
    Phrases {
        /// Reference DOCX file
        #[arg(value_name = "REF")]
        reference: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Show the highlighted runs of one target file
    Preview {
        /// Reference DOCX file
        #[arg(short, long, value_name = "REF")]
        reference: PathBuf,

        /// Target file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the highlighted document as JSON
        #[arg(long)]
        json: bool,

        /// Compact JSON output
        #[arg(long, requires = "json")]
        compact: bool,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct MatchArgs {
    /// Which paragraphs of the reference become phrases
    #[arg(long, value_enum, env = "REFMARK_POLICY", default_value = "full")]
    policy: PolicyArg,

    /// Phrase matching implementation
    #[arg(long, value_enum, default_value = "automaton")]
    strategy: StrategyArg,

    /// Also read paragraphs inside reference tables
    #[arg(long)]
    tables: bool,
}

impl MatchArgs {
    fn builder(&self) -> Refmark {
        Refmark::new()
            .with_policy(self.policy.into())
            .with_strategy(self.strategy.into())
            .with_tables(self.tables)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Bullet prefix or list/bullet style only
    BulletOrStyle,
    /// Bullet, style, bold or list numbering (default)
    Full,
}

impl From<PolicyArg> for ExtractionPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::BulletOrStyle => ExtractionPolicy::BulletOrStyleOnly,
            PolicyArg::Full => ExtractionPolicy::BulletOrStyleOrBoldOrNumbering,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Rescan every phrase at every position
    Linear,
    /// Single compiled automaton (default)
    Automaton,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Linear => MatchStrategy::Linear,
            StrategyArg::Automaton => MatchStrategy::Automaton,
        }
    }
}

struct RunOptions {
    strict: bool,
    parallel: bool,
    suffix: String,
    keep_boilerplate: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            reference,
            output,
            files,
            strict,
            parallel,
            suffix,
            keep_boilerplate,
            matching,
        } => cmd_run(
            reference.as_deref(),
            output.as_deref(),
            &files,
            &matching,
            RunOptions {
                strict,
                parallel,
                suffix,
                keep_boilerplate,
            },
        ),
        Commands::Phrases {
            reference,
            json,
            matching,
        } => cmd_phrases(&reference, json, &matching),
        Commands::Preview {
            reference,
            file,
            json,
            compact,
            matching,
        } => cmd_preview(&reference, &file, json, compact, &matching),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Check that every required input is present before doing any work.
fn validate_inputs<'a>(
    reference: Option<&'a Path>,
    output: Option<&'a Path>,
    files: &[PathBuf],
) -> Result<(&'a Path, &'a Path), Error> {
    let reference =
        reference.ok_or_else(|| Error::MissingInput("no reference document (-r)".to_string()))?;
    if !reference.is_file() {
        return Err(Error::MissingInput(format!(
            "reference document not found: {}",
            reference.display()
        )));
    }

    if files.is_empty() {
        return Err(Error::MissingInput("no target files".to_string()));
    }
    if let Some(missing) = files.iter().find(|f| !f.is_file()) {
        return Err(Error::MissingInput(format!(
            "target file not found: {}",
            missing.display()
        )));
    }

    let output = output.ok_or_else(|| Error::MissingInput("no output directory (-o)".to_string()))?;
    Ok((reference, output))
}

fn load_session(reference: &Path, builder: Refmark) -> Result<RefmarkSession, Error> {
    let session = builder.load_reference(reference)?;
    log::info!(
        "Loaded {} phrases from {}",
        session.phrases().len(),
        reference.display()
    );
    Ok(session)
}

fn cmd_run(
    reference: Option<&Path>,
    output: Option<&Path>,
    files: &[PathBuf],
    matching: &MatchArgs,
    options: RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reference, output_dir) = validate_inputs(reference, output, files)?;

    let mut builder = matching.builder().with_suffix(options.suffix);
    if options.strict {
        builder = builder.strict();
    }
    if options.parallel {
        builder = builder.parallel();
    }
    if options.keep_boilerplate {
        builder = builder.without_cleanup();
    }
    let session = load_session(reference, builder)?;

    let targets = files
        .iter()
        .map(TargetFile::read)
        .collect::<Result<Vec<_>, _>>()?;

    let pb = ProgressBar::new(targets.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    let on_progress = |progress: &BatchProgress| {
        pb.set_position(progress.completed as u64);
        pb.set_message(progress.name.clone());
    };

    let report = session.run_with(&targets, &CancelToken::new(), Some(&on_progress));
    pb.finish_and_clear();
    let report = report?;

    fs::create_dir_all(output_dir)?;
    println!("{}", "Output files:".green().bold());
    for (i, file) in report.outputs.iter().enumerate() {
        file.write_to(output_dir)?;
        let branch = if i + 1 == report.outputs.len() {
            "└─"
        } else {
            "├─"
        };
        println!(
            "  {} {} {}",
            branch.dimmed(),
            file.name,
            format!(
                "({} lines, {} highlighted)",
                file.stats.lines, file.stats.highlighted_runs
            )
            .dimmed()
        );
    }

    for failure in &report.failures {
        println!(
            "{} {}: {}",
            "Skipped".yellow(),
            failure.name,
            failure.error
        );
    }

    println!(
        "\n{} {} of {} files highlighted into {}",
        "Done!".green().bold(),
        report.outputs.len(),
        report.total,
        output_dir.display()
    );

    Ok(())
}

fn cmd_phrases(
    reference: &Path,
    json: bool,
    matching: &MatchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = load_session(reference, matching.builder())?;
    let phrases = session.phrases();

    if json {
        println!("{}", serde_json::to_string_pretty(phrases)?);
        return Ok(());
    }

    println!(
        "{} ({})",
        "Reference Phrases".cyan().bold(),
        phrases.len()
    );
    println!("{}", "─".repeat(40).dimmed());
    for (i, phrase) in phrases.iter().enumerate() {
        println!("{:>4}. {}", i + 1, phrase);
    }

    Ok(())
}

fn cmd_preview(
    reference: &Path,
    file: &Path,
    json: bool,
    compact: bool,
    matching: &MatchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = load_session(reference, matching.builder())?;
    let target = TargetFile::read(file)?;
    let document = session.preview(&target)?;

    if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", refmark::render::to_json(&document, format)?);
        return Ok(());
    }

    for paragraph in &document.paragraphs {
        let line: String = paragraph
            .runs
            .iter()
            .map(|run| {
                if run.is_highlighted() {
                    run.text.black().on_yellow().to_string()
                } else {
                    run.text.clone()
                }
            })
            .collect();
        println!("{}", line);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "refmark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Reference phrase highlighting tool");
}
