use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "protwin CLI - score protein sequences, run virtual-lab kinetics, and simulate a bioreactor digital twin.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for replicate runs.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S lab.duration=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a protein sequence with a protein language model.
    Score(ScoreArgs),
    /// Run a virtual-lab enzymatic kinetics simulation.
    Lab(LabArgs),
    /// Run the bioreactor digital twin.
    Bioreactor(BioreactorArgs),
    /// Score a sequence, then run the lab and the bioreactor with that score.
    Pipeline(PipelineArgs),
    /// List or clear stored results.
    History(HistoryArgs),
}

/// Where the protein sequence comes from.
#[derive(Args, Debug, Clone, Default)]
#[group(required = false, multiple = false)]
pub struct SequenceInput {
    /// Protein sequence in one-letter code.
    #[arg(short = 's', long = "sequence", value_name = "SEQ")]
    pub sequence: Option<String>,

    /// FASTA file holding the sequence(s).
    #[arg(short = 'f', long, value_name = "PATH")]
    pub fasta: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Report format: json, csv or text.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Seed the random source for a reproducible run.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Abort the simulation if it takes longer than this many milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Identifier under which results are stored. Defaults to the FASTA id or the sequence itself.
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Do not store the result.
    #[arg(long)]
    pub no_store: bool,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub input: SequenceInput,

    /// Scoring model: esm2, protbert, prottrans or alphafold.
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LabOverrides {
    /// Simulated duration in time units.
    #[arg(short, long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub duration: Option<f64>,

    /// Experimental temperature (echoed in the result).
    #[arg(id = "lab_temperature", long = "lab-temperature", value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Experimental pH (echoed in the result).
    #[arg(id = "lab_ph", long = "lab-ph", value_name = "FLOAT")]
    pub ph: Option<f64>,

    /// Substrate concentration (echoed by the closed-form engine).
    #[arg(long, value_name = "FLOAT")]
    pub substrate: Option<f64>,

    /// Kinetic engine: auto, event-stepped or closed-form.
    #[arg(long, value_name = "ENGINE")]
    pub engine: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BioreactorOverrides {
    /// Initial biomass.
    #[arg(long, value_name = "FLOAT")]
    pub initial_biomass: Option<f64>,

    /// Simulated time window.
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
    pub window: Option<Vec<f64>>,

    /// Growth rate constant k.
    #[arg(short = 'k', long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub rate_constant: Option<f64>,

    /// Reactor temperature.
    #[arg(long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Reactor pH.
    #[arg(long, value_name = "FLOAT")]
    pub ph: Option<f64>,

    /// Initial dissolved oxygen.
    #[arg(long, value_name = "FLOAT")]
    pub oxygen: Option<f64>,

    /// Sample-time policy: nominal or requested-window.
    #[arg(long, value_name = "POLICY")]
    pub horizon: Option<String>,
}

#[derive(Args, Debug)]
pub struct LabArgs {
    #[command(flatten)]
    pub input: SequenceInput,

    #[command(flatten)]
    pub params: LabOverrides,

    /// Bias the run with the most recent stored score for this sequence.
    #[arg(long)]
    pub use_latest_score: bool,

    /// Run this many seeded replicates and report their summary.
    #[arg(long, value_name = "N")]
    pub replicates: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct BioreactorArgs {
    #[command(flatten)]
    pub input: SequenceInput,

    #[command(flatten)]
    pub params: BioreactorOverrides,

    /// Bias the run with the most recent stored score for this sequence.
    #[arg(long)]
    pub use_latest_score: bool,

    /// Run this many seeded replicates and report their summary.
    #[arg(long, value_name = "N")]
    pub replicates: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct PipelineArgs {
    #[command(flatten)]
    pub input: SequenceInput,

    /// Scoring model: esm2, protbert, prottrans or alphafold.
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    #[command(flatten)]
    pub lab: LabOverrides,

    #[command(flatten)]
    pub bioreactor: BioreactorOverrides,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only show results stored under this identifier.
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Delete all stored results.
    #[arg(long, conflicts_with = "id")]
    pub clear: bool,

    /// Output format: json or text.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bioreactor_window_takes_two_values() {
        let cli = Cli::try_parse_from([
            "protwin",
            "bioreactor",
            "--window",
            "0",
            "48",
            "-k",
            "0.1",
            "--seed",
            "7",
        ])
        .unwrap();
        let Commands::Bioreactor(args) = cli.command else {
            panic!("expected the bioreactor subcommand");
        };
        assert_eq!(args.params.window, Some(vec![0.0, 48.0]));
        assert_eq!(args.params.rate_constant, Some(0.1));
        assert_eq!(args.output.seed, Some(7));
    }

    #[test]
    fn sequence_and_fasta_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "protwin", "score", "--sequence", "MKT", "--fasta", "in.fa",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn negative_duration_is_accepted_by_the_parser() {
        let cli = Cli::try_parse_from(["protwin", "lab", "--duration", "-5"]).unwrap();
        let Commands::Lab(args) = cli.command else {
            panic!("expected the lab subcommand");
        };
        assert_eq!(args.params.duration, Some(-5.0));
    }

    #[test]
    fn set_values_are_global() {
        let cli = Cli::try_parse_from([
            "protwin", "lab", "-S", "lab.duration=3", "-S", "seed=1",
        ])
        .unwrap();
        assert_eq!(cli.set_values, vec!["lab.duration=3", "seed=1"]);
    }
}
