//! UYAML CLI
//!
//! Command-line interface for inspecting and rewriting Unity YAML assets.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{Level, info};
use uyaml::{LineEnding, UyamlDocument, WriterOptions};

#[derive(Parser)]
#[command(name = "uyaml")]
#[command(about = "Inspect and rewrite Unity YAML scenes, prefabs and assets")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its components
    Parse {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
    },

    /// Parse a file and write it back with the given layout
    Reformat {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 2)]
        indent: usize,

        /// Collections with more entries are written in block form
        #[arg(long, default_value_t = 3)]
        max_inline: usize,

        #[arg(long)]
        no_inline_objects: bool,

        #[arg(long)]
        no_inline_arrays: bool,

        /// Allow inline collections to nest
        #[arg(long)]
        inline_complex: bool,

        /// Leave out the %YAML/%TAG preamble
        #[arg(long)]
        no_header: bool,

        /// Write `\n` line endings instead of keeping the input's
        #[arg(long)]
        unix: bool,
    },

    /// Write every component to its own file
    Extract {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Class IDs to extract (1 = GameObject, 4 = Transform, ...)
        #[arg(long = "class")]
        classes: Vec<i32>,
    },

    /// Rewrite fileID and guid references
    Remap {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File id mapping, OLD=NEW
        #[arg(long = "file-id", value_parser = parse_mapping::<i64>)]
        file_ids: Vec<(i64, i64)>,

        /// GUID mapping, OLD=NEW
        #[arg(long = "guid", value_parser = parse_mapping::<String>)]
        guids: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per component
    Summary,
    /// Components with their first properties
    Detailed,
    /// The full tree as plain YAML
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse { input, format } => parse_command(&input, format),
        Commands::Reformat {
            input,
            output,
            indent,
            max_inline,
            no_inline_objects,
            no_inline_arrays,
            inline_complex,
            no_header,
            unix,
        } => {
            let options = WriterOptions {
                indent_size: indent,
                inline_objects: !no_inline_objects,
                inline_complex_objects: inline_complex,
                inline_arrays: !no_inline_arrays,
                inline_complex_arrays: inline_complex,
                max_inline_values: max_inline,
                include_header: !no_header,
                ..WriterOptions::default()
            };
            reformat_command(&input, output.as_deref(), options, unix)
        }
        Commands::Extract {
            input,
            output,
            classes,
        } => extract_command(&input, &output, &classes),
        Commands::Remap {
            input,
            output,
            file_ids,
            guids,
        } => remap_command(
            &input,
            output.as_deref(),
            file_ids.into_iter().collect(),
            guids.into_iter().collect(),
        ),
    }
}

fn load(input: &Path) -> Result<UyamlDocument> {
    UyamlDocument::load(input).with_context(|| format!("Failed to load {}", input.display()))
}

fn parse_command(input: &Path, format: OutputFormat) -> Result<()> {
    let doc = load(input)?;

    match format {
        OutputFormat::Summary => {
            println!("{}: {} components", input.display(), doc.len());
            for component in doc.components() {
                println!(
                    "  {} {} &{}",
                    component.class_id.0,
                    component.class_name().unwrap_or("?"),
                    component.file_id
                );
            }
        }
        OutputFormat::Detailed => {
            for component in doc.components() {
                println!("{} ({})", component, component.class_id);
                let Some(fields) = component.fields() else {
                    continue;
                };
                println!("  Properties: {}", fields.len());
                for (key, value) in fields.iter().take(5) {
                    println!("    {}: {}", key, value);
                }
                if fields.len() > 5 {
                    println!("    ... and {} more properties", fields.len() - 5);
                }
            }
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(doc.components())
                .context("Failed to serialize components")?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn reformat_command(
    input: &Path,
    output: Option<&Path>,
    mut options: WriterOptions,
    unix: bool,
) -> Result<()> {
    let doc = load(input)?;
    options.line_ending = if unix {
        LineEnding::Unix
    } else {
        doc.line_ending()
    };

    let output = output.unwrap_or(input);
    std::fs::write(output, doc.dump_with(options))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), "reformatted");
    Ok(())
}

fn extract_command(input: &Path, output: &Path, classes: &[i32]) -> Result<()> {
    let doc = load(input)?;
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let selected = doc
        .components()
        .iter()
        .filter(|c| classes.is_empty() || classes.contains(&c.class_id.0));

    let mut count = 0;
    for (i, component) in selected.enumerate() {
        let name = component
            .class_name()
            .map(str::to_string)
            .unwrap_or_else(|| component.class_id.to_string());
        let entry_path = output.join(format!("{}_{:03}_{}.yaml", name, i, component.file_id));

        let mut single = UyamlDocument::from(vec![component.clone()]);
        single.set_line_ending(doc.line_ending());
        single
            .save_to(&entry_path)
            .with_context(|| format!("Failed to write {}", entry_path.display()))?;
        println!("  Extracted: {}", entry_path.display());
        count += 1;
    }

    println!("Extracted {} components", count);
    Ok(())
}

fn remap_command(
    input: &Path,
    output: Option<&Path>,
    file_ids: HashMap<i64, i64>,
    guids: HashMap<String, String>,
) -> Result<()> {
    if file_ids.is_empty() && guids.is_empty() {
        bail!("Nothing to remap: pass --file-id OLD=NEW or --guid OLD=NEW");
    }

    let mut doc = load(input)?;
    let references = doc.remap_file_ids(&file_ids) + doc.remap_guids(&guids);
    println!("Rewrote {} references", references);

    let output = output.unwrap_or(input);
    doc.save_to(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

/// Parse an `OLD=NEW` pair
fn parse_mapping<T>(s: &str) -> Result<(T, T), String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let (old, new) = s
        .split_once('=')
        .ok_or_else(|| format!("expected OLD=NEW, got '{}'", s))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<T>()
            .map_err(|e| format!("invalid value '{}': {}", part, e))
    };
    Ok((parse(old)?, parse(new)?))
}
