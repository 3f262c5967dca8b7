use clap::{Parser, Subcommand, ValueEnum};
use schemadoc::schema::parse_schema_with;
use schemadoc::{extract_annotations, SchemadocConfig};
use schemadoc_codegen::{
    patch_docstrings_with, patch_source, synthesize, DocstringOptions, PatchReport, WritableFile,
};
use std::path::{Path, PathBuf};
use std::process;

/// schemadoc: write XSD annotations into generated data-binding docstrings
#[derive(Parser)]
#[command(name = "schemadoc", version, about)]
struct Cli {
    /// Config file (default: ./schemadoc.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "yaml", global = true)]
    format: OutputFormat,

    /// Top-level element bound to the root class
    #[arg(long, global = true)]
    root_element: Option<String>,

    /// Preferred xml:lang of documentation nodes
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Patch the stub docstrings of a freshly generated source file
    Patch {
        /// XSD the bindings were generated from
        schema: PathBuf,
        /// Generated source file, overwritten in place
        source: PathBuf,
        /// Wrap docstring lines at this column
        #[arg(long)]
        width: Option<usize>,
        /// Include type and cardinality in attribute lines
        #[arg(long)]
        show_cardinality: bool,
        /// Leave the root class's namespace line in place
        #[arg(long)]
        keep_namespace: bool,
        /// Only the root class needs a placeholder
        #[arg(long)]
        only_root: bool,
        /// Do not toggle the file's read-only bit around the write
        #[arg(long)]
        no_lock: bool,
        /// Patch in memory and report, without writing
        #[arg(long)]
        check: bool,
    },

    /// Print the documentation extracted from a schema
    Dump {
        /// XSD file
        schema: PathBuf,
    },

    /// Print the docstring synthesized for one class
    Render {
        /// XSD file
        schema: PathBuf,
        /// Class binding key or schema type name (e.g. ORI_A)
        class: String,
        /// Indentation of the class body, in spaces
        #[arg(long, default_value_t = 4)]
        indent: usize,
        /// Wrap docstring lines at this column
        #[arg(long)]
        width: Option<usize>,
        /// Include type and cardinality in attribute lines
        #[arg(long)]
        show_cardinality: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Machine-readable error on stderr
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.root_element.is_some() {
        config.root_element = cli.root_element.clone();
    }
    if cli.lang.is_some() {
        config.doc_lang = cli.lang.clone();
    }

    match cli.command {
        Command::Patch {
            schema,
            source,
            width,
            show_cardinality,
            keep_namespace,
            only_root,
            no_lock,
            check,
        } => {
            if let Some(width) = width {
                config.line_width = width;
            }
            config.show_cardinality |= show_cardinality;
            if keep_namespace {
                config.strip_namespace = false;
            }
            if only_root {
                config.require_all_types = false;
            }
            config.validate()?;

            let report = if check {
                check_patch(&schema, &source, &config)?
            } else if no_lock {
                patch_docstrings_with(&schema, &source, &config)?
            } else {
                let window = WritableFile::open(&source)?;
                patch_docstrings_with(&schema, window.path(), &config)?
            };

            print_output(
                &serde_json::json!({
                    "ok": true,
                    "check": check,
                    "source": source.display().to_string(),
                    "patched": report.classes,
                    "namespace_stripped": report.namespace_stripped,
                }),
                &cli.format,
            )?;
        }

        Command::Dump { schema } => {
            let model = parse_schema_with(&schema, &config.parse_options())?;
            let annotations = extract_annotations(&model);
            print_output(&serde_json::to_value(&annotations)?, &cli.format)?;
        }

        Command::Render {
            schema,
            class,
            indent,
            width,
            show_cardinality,
        } => {
            if let Some(width) = width {
                config.line_width = width;
            }
            config.show_cardinality |= show_cardinality;
            config.validate()?;

            let model = parse_schema_with(&schema, &config.parse_options())?;
            let annotations = extract_annotations(&model);
            let docstring = synthesize(&class, &annotations, &DocstringOptions::from(&config))?;
            let indent = " ".repeat(indent);
            println!("{indent}\"\"\"{}\"\"\"", docstring.render(&indent));
        }
    }

    Ok(())
}

/// `--config` when given, otherwise `schemadoc.yaml` in the working directory
fn load_config(path: Option<&Path>) -> Result<SchemadocConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => SchemadocConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => SchemadocConfig::discover(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Run the whole pipeline in memory and report what would change
fn check_patch(
    schema: &Path,
    source: &Path,
    config: &SchemadocConfig,
) -> Result<PatchReport, Box<dyn std::error::Error>> {
    let model = parse_schema_with(schema, &config.parse_options())?;
    let annotations = extract_annotations(&model);
    let text = std::fs::read_to_string(source)
        .map_err(|e| format!("Failed to read source file '{}': {e}", source.display()))?;
    let (_, report) = patch_source(&text, &annotations, config)?;
    log::info!("Check passed for {}", source.display());
    Ok(report)
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
        }
    }
    Ok(())
}
