use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::warn;
use sample_review::{
    AppConfig, City, FormState, Label, Language, ReviewError, ReviewSession, SampleType, CITIES,
};
use tracing_subscriber::EnvFilter;

/// Generates bilingual factory sample review reports as PDF.
///
/// Settings are read from `sample-review.toml` in the working directory (or
/// `--config`), then from the environment (`OPENAI_API_KEY`,
/// `SAMPLE_REVIEW_TRANSLATION_URL`, `SAMPLE_REVIEW_FONTS_DIR`,
/// `SAMPLE_REVIEW_CJK_FONTS_DIR`), then from the flags below.
#[derive(Parser)]
#[command(author, version, about = "Factory sample review report generator")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a filled-in form (TOML or JSON) to a PDF report.
    Generate(GenerateArgs),

    /// Print a blank form template.
    Template {
        /// Write the template to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the assessment locations.
    Cities,

    /// List the sample types accepted in form files.
    #[command(name = "sample-types", aliases = ["sample_types", "types"])]
    SampleTypes,
}

#[derive(Args)]
struct GenerateArgs {
    /// Form file; `.json` is parsed as JSON, anything else as TOML.
    form: PathBuf,

    /// Report language: `en` or `zh`.
    #[arg(short, long)]
    language: Option<Language>,

    /// Language of messages printed by this tool.
    #[arg(long)]
    ui_language: Option<Language>,

    /// Assessment location, in English or Chinese.
    #[arg(long)]
    location: Option<City>,

    /// Directory the PDF is written to.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Sample photo; overrides the `photo` entry of the form.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Directory holding the Roboto font files.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Directory holding the CJK font file.
    #[arg(long)]
    cjk_fonts_dir: Option<PathBuf>,

    /// Only use the built-in glossary, never the remote translation service.
    #[arg(long)]
    offline: bool,

    /// Keep the conclusion in the language it was written in.
    #[arg(long)]
    keep_conclusion: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => generate(cli.config, args),
        Commands::Template { output } => template(output),
        Commands::Cities => {
            list_cities();
            Ok(())
        }
        Commands::SampleTypes => {
            list_sample_types();
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>, args: &GenerateArgs) -> Result<AppConfig, Box<dyn Error>> {
    let mut config = AppConfig::discover(path.as_deref())?.with_env();

    if let Some(language) = args.language {
        config.report.language = language;
    }
    if let Some(language) = args.ui_language {
        config.report.ui_language = language;
    }
    if let Some(location) = args.location {
        config.report.location = location;
    }
    if let Some(dir) = &args.output_dir {
        config.report.output_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.fonts_dir {
        config.fonts.fonts_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.cjk_fonts_dir {
        config.fonts.cjk_fonts_dir = Some(dir.clone());
    }
    if args.offline {
        config.translation.remote = false;
    }
    if args.keep_conclusion {
        config.translation.translate_conclusion = false;
    }
    Ok(config)
}

fn generate(config_path: Option<PathBuf>, args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(config_path, &args)?;
    let mut form = FormState::load(&args.form)?;
    if let Some(photo) = args.photo {
        form.photo = Some(photo);
    }

    let mut session = ReviewSession::from_config(&config)?;
    let generated = match session.submit(&form) {
        Ok(generated) => generated,
        Err(ReviewError::Validation(err)) => {
            eprintln!("{}", session.message(Label::FillRequired));
            return Err(err.into());
        }
        Err(err) => {
            eprintln!("{}", session.message(Label::ErrorGenerating));
            return Err(err.into());
        }
    };

    for warning in &generated.warnings {
        warn!("{}", warning);
    }

    let output_dir = config.report.output_dir.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;
    let output_path = output_dir.join(&generated.file_name);
    fs::write(&output_path, &generated.bytes)?;

    println!("{}", session.message(Label::GenerateSuccess));
    println!(
        "{} ({} bytes, {} page(s), {})",
        output_path.display(),
        generated.bytes.len(),
        generated.page_count,
        generated.mime
    );
    Ok(())
}

fn template(output: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let template = FormState::template();
    match output {
        Some(path) => {
            fs::write(&path, template)?;
            println!("Wrote form template to {}", path.display());
        }
        None => print!("{}", template),
    }
    Ok(())
}

fn list_cities() {
    for city in CITIES {
        println!("{}", city);
    }
}

fn list_sample_types() {
    for kind in SampleType::ALL {
        println!(
            "{:<16} {} / {}",
            kind.code(),
            kind.english(),
            kind.mandarin()
        );
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
