//! # Stemfold CLI - RNA Stem Selection Models
//!
//! A command-line interface that builds stem-selection models for RNA
//! secondary structure prediction and decodes solver samples.
//!
//! ## Usage
//!
//! ```bash
//! # Export the penalty model for a labeled-text sequence
//! stemfold -i sequence.txt -o model.json
//!
//! # Constrained model from a FASTA file
//! stemfold --fasta -i sequence.fasta -e constrained -o model.json
//!
//! # Decode samples returned by a solver
//! stemfold -i sequence.txt --samples samples.json -f dbn
//! ```
//!
//! ## Options
//!
//! - `-i, --input <FILE>`: Input sequence file (required)
//! - `--fasta`: Read the input as FASTA instead of labeled text
//! - `-o, --output <FILE>`: Output file (default: stdout)
//! - `-f, --format <FORMAT>`: Output format: model, stems, dbn, edges (default: model)
//! - `-e, --encoding <ENCODING>`: Model encoding: penalty or constrained (default: penalty)
//! - `-s, --min-stem <N>`: Minimum stem length (default: 3)
//! - `-l, --min-loop <N>`: Minimum loop length (default: 2)
//! - `-c, --pseudoknot-coefficient <C>`: Pseudoknot penalty scale (default: 0.3)
//! - `--lambda <WEIGHT>`: Overlap penalty override
//! - `-n, --num-reads <N>`: Reads requested from the solver (default: 20)
//! - `--samples <FILE>`: Sample-set JSON to decode
//! - `-j, --threads <N>`: Worker threads
//! - `-q, --quiet`: Suppress progress messages

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;
use stemfold_core::config::{FoldingConfig, ModelEncoding};
use stemfold_core::output::{parse_output_format, write_results};
use stemfold_core::solution::{RecordedSampler, SolutionOutcome};
use stemfold_core::*;

fn build_command() -> Command {
    Command::new("stemfold")
        .version(env!("CARGO_PKG_VERSION"))
        .about("RNA stem-selection model builder")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .required(true)
                .help("Input sequence file (labeled text unless --fasta)"),
        )
        .arg(
            Arg::new("fasta")
                .long("fasta")
                .action(ArgAction::SetTrue)
                .help("Read the input as FASTA (first record)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file (default: stdout)"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format: model, stems, dbn, edges")
                .default_value("model"),
        )
        .arg(
            Arg::new("encoding")
                .short('e')
                .long("encoding")
                .value_name("ENCODING")
                .help("Model encoding: penalty or constrained")
                .default_value("penalty"),
        )
        .arg(
            Arg::new("min-stem")
                .short('s')
                .long("min-stem")
                .value_name("N")
                .help("Minimum stem length"),
        )
        .arg(
            Arg::new("min-loop")
                .short('l')
                .long("min-loop")
                .value_name("N")
                .help("Minimum loop length"),
        )
        .arg(
            Arg::new("pseudoknot-coefficient")
                .short('c')
                .long("pseudoknot-coefficient")
                .value_name("C")
                .help("Scale of the pseudoknot penalty"),
        )
        .arg(
            Arg::new("lambda")
                .long("lambda")
                .value_name("WEIGHT")
                .help("Overlap penalty (default: longest stem squared plus 3)"),
        )
        .arg(
            Arg::new("num-reads")
                .short('n')
                .long("num-reads")
                .value_name("N")
                .help("Number of reads requested from the solver"),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .value_name("FILE")
                .help("Sample-set JSON returned by the solver"),
        )
        .arg(
            Arg::new("threads")
                .short('j')
                .long("threads")
                .value_name("N")
                .help("Number of worker threads"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Quiet mode"),
        )
}

/// Parse an optional numeric argument.
fn parse_arg<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, String> {
    matches
        .get_one::<String>(name)
        .map(|value| {
            value
                .parse()
                .map_err(|_| format!("Invalid value '{value}' for --{name}"))
        })
        .transpose()
}

fn parse_config(matches: &ArgMatches) -> Result<FoldingConfig, Box<dyn std::error::Error>> {
    let defaults = FoldingConfig::default();

    let encoding = match matches.get_one::<String>("encoding").map(String::as_str) {
        Some("penalty") | Some("bqm") | None => ModelEncoding::Penalty,
        Some("constrained") | Some("cqm") => ModelEncoding::Constrained,
        Some(other) => return Err(format!("Invalid encoding '{other}'").into()),
    };
    let output_format = match matches.get_one::<String>("format") {
        Some(name) => parse_output_format(name)?,
        None => defaults.output_format,
    };

    let config = FoldingConfig {
        min_stem: parse_arg(matches, "min-stem")?.unwrap_or(defaults.min_stem),
        min_loop: parse_arg(matches, "min-loop")?.unwrap_or(defaults.min_loop),
        pseudoknot_coefficient: parse_arg(matches, "pseudoknot-coefficient")?
            .unwrap_or(defaults.pseudoknot_coefficient),
        penalty_weight: parse_arg(matches, "lambda")?,
        encoding,
        num_reads: parse_arg(matches, "num-reads")?.unwrap_or(defaults.num_reads),
        output_format,
        num_threads: parse_arg(matches, "threads")?,
        quiet: matches.get_flag("quiet"),
    };
    config.validate()?;
    Ok(config)
}

/// Main entry point for the Stemfold CLI application.
///
/// Parses command-line arguments, builds the model for the input sequence,
/// optionally decodes a sample set, and writes results in the requested
/// format.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = build_command().get_matches();
    let config = parse_config(&matches)?;

    let default_filter = if config.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let analyzer = FoldingAnalyzer::new(config);
    let input = matches
        .get_one::<String>("input")
        .ok_or("Missing input file")?;
    let mut results = if matches.get_flag("fasta") {
        analyzer.analyze_fasta_file(input)?
    } else {
        analyzer.analyze_file(input)?
    };

    if let Some(samples_file) = matches.get_one::<String>("samples") {
        let mut sampler = RecordedSampler::from_path(samples_file)?;
        analyzer.resolve(&mut results, &mut sampler)?;
        if results.solution == Some(SolutionOutcome::AllInfeasible) {
            return Err(FoldError::AllCandidatesInfeasible.into());
        }
    }

    let mut writer: Box<dyn Write> = if let Some(output_file) = matches.get_one::<String>("output")
    {
        Box::new(BufWriter::new(File::create(output_file)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };
    write_results(&mut writer, &results, analyzer.config.output_format)?;
    writer.flush()?;

    info!(
        "Analysis complete! {} candidate stems, {} variables, {} quadratic terms, {} constraints.",
        results.sequence_info.num_candidate_stems,
        results.sequence_info.num_variables,
        results.sequence_info.num_interactions,
        results.sequence_info.num_constraints
    );
    if let Some(solution) = results.selected() {
        info!(
            "Selected {} stems with {} pseudoknots (energy {}).",
            solution.num_stems(),
            solution.pseudoknots.len(),
            solution.energy
        );
    }

    Ok(())
}
