use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use stubbles_annotations::scan::annotate_file;
use stubbles_annotations::{
    AnnotatedElement, AnnotationCache, AnnotationMap, Config, Error, ScanReport, scan_project,
};

#[derive(Debug, Parser)]
#[command(name = "stubbles-annotations", version, about)]
struct Cli {
    /// Increase log output (-v debug, -vv trace).  RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one docblock read from FILE, or stdin when FILE is omitted.
    ///
    /// `[lexer] ignored_tags` is read from the configuration in the
    /// current directory.
    Parse {
        /// Target identifier the annotations are attached to.
        #[arg(short, long, default_value = "target")]
        target: String,
        file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// List the annotated declarations of one PHP file.
    File {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Annotate every PHP file below PATH.
    Scan {
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Configuration file (default: PATH/.stubbles-annotations.toml).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Neither read nor write the annotation cache.
        #[arg(long)]
        no_cache: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse {
            target,
            file,
            format,
        } => run_parse(&target, file.as_deref(), format),
        Command::File { path, format } => run_file(&path, format),
        Command::Scan {
            path,
            config,
            no_cache,
            format,
        } => run_scan(&path, config.as_deref(), no_cache, format),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(target: &str, file: Option<&Path>, format: Format) -> Result<ExitCode, Error> {
    let doc_comment = match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| Error::Read {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            buf
        }
    };

    let config = Config::load(Path::new("."))?;
    let annotations = config.lexer().parse(&doc_comment, target)?;
    match format {
        Format::Json => print_json(&annotations),
        Format::Text => print_map(&annotations, "  "),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_file(path: &Path, format: Format) -> Result<ExitCode, Error> {
    let config = match path.parent() {
        Some(dir) => Config::load(dir)?,
        None => Config::default(),
    };
    let (elements, _) = annotate_file(path, &mut config.lexer(), &AnnotationCache::in_memory())?;
    match format {
        Format::Json => print_json(&elements),
        Format::Text => print_elements(&elements),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_scan(
    root: &Path,
    config_path: Option<&Path>,
    no_cache: bool,
    format: Format,
) -> Result<ExitCode, Error> {
    let config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::load(root)?,
    };

    let cache = match config.cache_path().filter(|_| !no_cache) {
        Some(path) => AnnotationCache::open(&path).unwrap_or_else(|err| {
            warn!(%err, "starting with an empty annotation cache");
            AnnotationCache::empty_at(path)
        }),
        None => AnnotationCache::in_memory(),
    };

    let report = scan_project(root, &config, &cache)?;
    if let Err(err) = cache.flush() {
        warn!(%err, "could not write annotation cache");
    }

    match format {
        Format::Json => print_json(&report_json(&report)),
        Format::Text => print_report(&report),
    }

    Ok(if report.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("error: {err}"),
    }
}

fn report_json(report: &ScanReport) -> serde_json::Value {
    let files: Vec<_> = report
        .files
        .iter()
        .filter(|f| !f.elements.is_empty())
        .map(|f| json!({ "path": f.path, "elements": f.elements }))
        .collect();
    let failures: Vec<_> = report
        .failures
        .iter()
        .map(|f| json!({ "path": f.path, "error": f.error.to_string() }))
        .collect();
    json!({ "files": files, "failures": failures })
}

fn print_map(annotations: &AnnotationMap, indent: &str) {
    for (key, list) in annotations {
        println!("{indent}{key}");
        for annotation in list {
            println!("{indent}  {annotation}");
        }
    }
}

fn print_elements(elements: &[AnnotatedElement]) {
    for element in elements {
        println!("{:>5}  {} {}", element.line, element.kind.as_str(), element.target);
        print_map(&element.annotations, "         ");
    }
}

fn print_report(report: &ScanReport) {
    for file in report.files.iter().filter(|f| !f.elements.is_empty()) {
        println!("{}", file.path.display());
        print_elements(&file.elements);
    }
    for failure in &report.failures {
        eprintln!("{}: {}", failure.path.display(), failure.error);
    }
    println!(
        "{} files, {} annotated declarations, {} annotations ({} files from cache, {} failed)",
        report.files.len(),
        report.element_count(),
        report.annotation_count(),
        report.cached_count(),
        report.failures.len(),
    );
}
