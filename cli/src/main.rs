use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonschema_compat_core::ir::from_json_schema;
use jsonschema_compat_core::passes::normalize;
use jsonschema_compat_core::{
    schema_equals_resolved, schema_extends_resolved, schema_merge_resolved, CompareOptions,
    Dereferencer, NormalizationMode,
};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonschema-compat")]
#[command(about = "Compare, check compatibility of, and merge JSON Schema contracts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Normalization run on both schemas before judging
    #[arg(long, value_enum, global = true, default_value_t = NormalizationArg::UnionsOnly)]
    normalization: NormalizationArg,

    /// Max schema nesting depth for ref resolution and ingestion
    #[arg(long, global = true, default_value_t = 50)]
    max_depth: usize,

    /// Skip $ref resolution (inputs must not contain $ref)
    #[arg(long, global = true)]
    no_deref: bool,

    /// Register an external document for $ref resolution, as URI=FILE
    #[arg(long = "document", value_name = "URI=FILE", global = true)]
    documents: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether two schemas are structurally equal (exit 0 if equal, 1 if not)
    Equals {
        /// First JSON Schema file
        a: PathBuf,

        /// Second JSON Schema file
        b: PathBuf,
    },

    /// Check whether CHILD is a structural subtype of PARENT (exit 0 if it is, 1 if not)
    Extends {
        /// Child (e.g. newer producer) JSON Schema file
        child: PathBuf,

        /// Parent (e.g. consumer contract) JSON Schema file
        parent: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Merge two object schemas; properties of B override those of A
    Merge {
        /// Base JSON Schema file
        a: PathBuf,

        /// Overriding JSON Schema file
        b: PathBuf,

        /// Output merged schema file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Print the normalized type expression of a schema
    Inspect {
        /// Input JSON Schema file
        schema: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum NormalizationArg {
    UnionsOnly,
    Full,
}

impl From<NormalizationArg> for NormalizationMode {
    fn from(val: NormalizationArg) -> Self {
        match val {
            NormalizationArg::UnionsOnly => NormalizationMode::UnionsOnly,
            NormalizationArg::Full => NormalizationMode::Full,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

/// Options and resolver shared by every subcommand.
struct Session {
    options: CompareOptions,
    dereferencer: Option<Dereferencer>,
}

impl Session {
    fn new(cli: &Cli) -> Result<Self> {
        let options = CompareOptions {
            normalization: cli.normalization.into(),
            max_depth: cli.max_depth,
        };

        if cli.no_deref {
            if !cli.documents.is_empty() {
                bail!("--document has no effect together with --no-deref");
            }
            return Ok(Self {
                options,
                dereferencer: None,
            });
        }

        let mut dereferencer = Dereferencer::new(&options);
        for entry in &cli.documents {
            let Some((uri, file)) = entry.split_once('=') else {
                bail!("Invalid --document value {:?}: expected URI=FILE", entry);
            };
            let document = read_json(Path::new(file))?;
            dereferencer = dereferencer.with_document(uri, document);
        }

        Ok(Self {
            options,
            dereferencer: Some(dereferencer),
        })
    }

    /// Read a schema file and resolve its references.
    fn load(&self, path: &Path) -> Result<Value> {
        let schema = read_json(path)?;
        match &self.dereferencer {
            Some(dereferencer) => dereferencer.dereference(&schema).map_err(|e| {
                let hint = if e.is_reference_error() {
                    " (register external documents with --document URI=FILE)"
                } else {
                    ""
                };
                anyhow::Error::from(e).context(format!(
                    "Failed to dereference schema: {}{}",
                    path.display(),
                    hint
                ))
            }),
            None => Ok(schema),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only results
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let session = Session::new(&cli)?;

    match cli.command {
        Commands::Equals { a, b } => {
            let schema_a = session.load(&a)?;
            let schema_b = session.load(&b)?;
            let equal = schema_equals_resolved(&schema_a, &schema_b, &session.options)
                .map_err(|e| anyhow::Error::from(e).context("Equality check failed"))?;

            println!("{}", equal);
            Ok(judgment(equal))
        }
        Commands::Extends {
            child,
            parent,
            format,
        } => {
            let child_schema = session.load(&child)?;
            let parent_schema = session.load(&parent)?;
            let report = schema_extends_resolved(&child_schema, &parent_schema, &session.options)
                .map_err(|e| anyhow::Error::from(e).context("Compatibility check failed"))?;

            write_json(&report, None, format)?;
            Ok(judgment(report.extends))
        }
        Commands::Merge {
            a,
            b,
            output,
            format,
        } => {
            let schema_a = session.load(&a)?;
            let schema_b = session.load(&b)?;
            let merged = schema_merge_resolved(&schema_a, &schema_b, &session.options)
                .map_err(|e| anyhow::Error::from(e).context("Merge failed"))?;

            write_json(&merged, output.as_ref(), format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { schema } => {
            let resolved = session.load(&schema)?;
            let ingested = from_json_schema(&resolved, &session.options)
                .map_err(|e| anyhow::Error::from(e).context("Failed to read schema"))?;
            let normalized = normalize(ingested, session.options.normalization);

            println!("{}", normalized);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn judgment(holds: bool) -> ExitCode {
    if holds {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON from: {}", path.display()))
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
