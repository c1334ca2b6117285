//! CLI interface for the resume matcher

use crate::config::OutputFormat;
use crate::input::MediaType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "AI-powered resume and job description match reports")]
#[command(long_about = "Score a resume against a job description with a single LLM call and report strengths, gaps and missing keywords")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze how well a resume matches a job description
    Analyze {
        /// Path to resume file (PDF, TXT, or DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description text file, or "-" for stdin
        #[arg(short, long, required_unless_present = "job_text", conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Declared media type of the resume, e.g. application/pdf
        #[arg(short = 't', long)]
        media_type: Option<String>,

        /// Output format: console, text, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save the report; without a path a name is derived from the resume
        #[arg(short, long)]
        save: Option<Option<PathBuf>>,

        /// Show the raw model reply
        #[arg(long)]
        raw: bool,

        /// Disable colored console output
        #[arg(long)]
        no_color: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "model.temperature")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "text" | "txt" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, text, json, markdown, html",
            format
        )),
    }
}

/// Parse a declared media type; any non-empty tag is accepted as declared.
pub fn parse_media_type(mime: &str) -> Result<MediaType, String> {
    if mime.trim().is_empty() {
        return Err("Media type must not be empty".to_string());
    }
    Ok(MediaType::from_mime(mime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert_eq!(parse_output_format("txt").unwrap(), OutputFormat::Text);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_analyze_requires_a_job_source() {
        assert!(Cli::try_parse_from(["resume-matcher", "analyze", "-r", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-matcher", "analyze", "-r", "cv.pdf", "-j", "job.txt", "--job-text", "x"
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "resume-matcher", "analyze", "-r", "cv.pdf", "--job-text", "Go engineer", "--save",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { job_text, save, .. } => {
                assert_eq!(job_text.as_deref(), Some("Go engineer"));
                assert_eq!(save, Some(None));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_media_type() {
        assert_eq!(parse_media_type("application/pdf").unwrap(), MediaType::Pdf);
        assert_eq!(
            parse_media_type("image/png").unwrap(),
            MediaType::Other("image/png".to_string())
        );
        assert!(parse_media_type(" ").is_err());
    }
}
