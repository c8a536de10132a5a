use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use docdigest::{
    config, generation, logging,
    pipeline::{
        DEFAULT_TARGET_LANGUAGE, DigestApi, DigestService, SummaryRequest, TranslationRequest,
        UploadedDocument,
    },
};

#[derive(Parser)]
#[command(
    name = "docdigest-cli",
    about = "Summarize, translate, and export documents from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a txt, pdf, or docx file and print its summary.
    Summarize {
        path: PathBuf,
        /// Approximate summary length in words.
        #[arg(long)]
        length: Option<String>,
        /// Output language code, or `auto` to follow the source text.
        #[arg(long)]
        language: Option<String>,
    },
    /// Translate text and print the result.
    Translate {
        text: String,
        #[arg(long, default_value = DEFAULT_TARGET_LANGUAGE)]
        to: String,
    },
    /// Render a text file into a summary PDF.
    Render {
        input: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    logging::init_cli_tracing();
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Summarize {
            path,
            length,
            language,
        } => summarize(&path, length.as_deref(), language.as_deref()).await,
        Command::Translate { text, to } => translate(text, to).await,
        Command::Render {
            input,
            title,
            output,
        } => render(&input, title, &output),
    }
}

fn build_service() -> Result<DigestService> {
    let config = config::load_config().context("failed to load configuration")?;
    let generator = generation::build_generation_client(&config.generation)
        .context("failed to initialize generation client")?;
    Ok(DigestService::new(generator, config.upload_dir))
}

async fn summarize(path: &Path, length: Option<&str>, language: Option<&str>) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))?;

    let service = build_service()?;
    let result = service
        .summarize_document(
            UploadedDocument::new(filename, bytes),
            SummaryRequest::from_form(length, language),
        )
        .await?;

    println!("{}", result.summary_text);
    eprintln!(
        "original: {} words, summary: {} words",
        result.original_word_count, result.summary_word_count
    );
    if let Some(error) = result.generation_error {
        return Err(anyhow!("generation failed: {error}"));
    }
    Ok(())
}

async fn translate(text: String, to: String) -> Result<()> {
    let service = build_service()?;
    let result = service
        .translate_text(TranslationRequest {
            text,
            target_language: to,
        })
        .await?;

    println!("{}", result.translated_text);
    if let Some(error) = result.generation_error {
        return Err(anyhow!("translation failed: {error}"));
    }
    Ok(())
}

fn render(input: &Path, title: Option<String>, output: &Path) -> Result<()> {
    let body_text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let rendered = docdigest::render::render_summary(&body_text, title.as_deref())?;
    fs::write(output, &rendered.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!(
        "wrote {} ({} pages, title \"{}\")",
        output.display(),
        rendered.page_count,
        rendered.title
    );
    Ok(())
}
