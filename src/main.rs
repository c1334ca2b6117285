//! Resume matcher: AI-powered resume and job description match reports

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction};
use resume_matcher::config::{require_api_key, Config, OutputFormat};
use resume_matcher::input::InputManager;
use resume_matcher::llm::{GeminiClient, MatchAnalyzer};
use resume_matcher::output::{save_report_to_file, suggest_filename, AnalysisReport, ReportGenerator};
use resume_matcher::processing::AnalysisRequest;
use resume_matcher::{MatcherError, Result};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run_command(cli.command, cli.config).await {
        report_failure(&e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn existing_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load_from(path)
    } else {
        Ok(Config::default())
    }
}

/// Print the user-facing message for a failed command.
fn report_failure(err: &MatcherError) {
    match err {
        MatcherError::MissingCredential(_) => println!("⚠️ {}", err),
        MatcherError::Extraction(e) => println!("❌ {}", e),
        MatcherError::ModelInvocation(_)
        | MatcherError::ModelStatus { .. }
        | MatcherError::Network(_) => {
            println!("An error occurred during analysis: {}", err);
            println!("Please try again with a different resume format or check your API key.");
        }
        _ => {
            error!("Command failed: {}", err);
            println!("❌ {}", err);
        }
    }
}

async fn run_command(command: Commands, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            media_type,
            output,
            save,
            raw,
            no_color,
        } => {
            let config = load_config(config_path.as_deref())?;

            // Nothing is read before the credential is known to exist.
            let api_key = require_api_key(&config.model.api_key_env)?;

            if no_color || !config.output.color_output {
                colored::control::set_override(false);
            }

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(MatcherError::InvalidInput)?,
                None => config.output.format,
            };
            let declared_type = media_type
                .map(|mime| cli::parse_media_type(&mime))
                .transpose()
                .map_err(MatcherError::InvalidInput)?;

            info!("Starting resume match analysis");
            let input_manager = InputManager::new().with_declared_type(declared_type);

            let resume_doc = input_manager.load_resume(&resume).await?;
            println!(
                "📄 {} | Type: {} | Size: {:.2} KB",
                resume_doc.file_name,
                resume_doc.media_type,
                resume_doc.size_kb()
            );

            let job_description = match (job_text, job) {
                (Some(text), _) => text,
                (None, Some(path)) => input_manager.load_job_description(&path).await?,
                (None, None) => String::new(),
            };

            let request = AnalysisRequest::new(resume_doc.text.clone(), job_description)?;

            let client = GeminiClient::new(&config.model, api_key)?;
            let analyzer = MatchAnalyzer::new(client);

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(
                "⏳ Analyzing your resume against the job description... This may take a moment.",
            );
            spinner.enable_steady_tick(Duration::from_millis(100));

            let analysis = analyzer.analyze(&request).await;
            spinner.finish_and_clear();
            let analysis = analysis?;

            println!("✅ Analysis Complete!");

            let report = AnalysisReport::new(analysis, &resume_doc);
            let generator = ReportGenerator::with_options(
                !no_color && config.output.color_output,
                raw || config.output.show_raw_response,
                config.output.include_next_steps,
            );
            println!("{}", generator.generate_report(&report, &output_format)?);

            if let Some(target) = save {
                // The console view is not a file format; save it as text.
                let save_format = match output_format {
                    OutputFormat::Console => OutputFormat::Text,
                    other => other,
                };
                let path = target.unwrap_or_else(|| {
                    PathBuf::from(suggest_filename(&save_format, &resume_doc.file_name))
                });
                let content = generator.generate_report(&report, &save_format)?;
                save_report_to_file(&content, &path)?;
                println!("📥 Report saved to: {}", path.display());
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    let config = existing_or_default(&path)?;
                    println!("⚙️  Current Configuration\n");
                    println!("Model: {}", config.model.name);
                    println!("Endpoint: {}", config.model.endpoint);
                    println!("Temperature: {}", config.model.temperature);
                    println!("Max Output Tokens: {}", config.model.max_output_tokens);
                    println!("Timeout: {}s", config.model.timeout_secs);
                    println!("Max Retries: {}", config.model.max_retries);
                    println!("API Key Variable: {}", config.model.api_key_env);
                    println!("\nOutput:");
                    println!("  Format: {:?}", config.output.format);
                    println!("  Colors: {}", config.output.color_output);
                    println!("  Raw Response: {}", config.output.show_raw_response);
                    println!("  Next Steps: {}", config.output.include_next_steps);
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Set { key, value }) => {
                    let mut config = existing_or_default(&path)?;
                    config.set(&key, &value)?;
                    config.save_to(&path)?;
                    println!("🔧 Set {} = {}", key, value);
                }
            }
        }
    }

    Ok(())
}
