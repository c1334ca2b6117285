//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{markdown_bullets, AnalysisReport};
use crate::processing::document::{AnalysisResult, MatchRating};
use askama::Template;
use colored::{Color, Colorize};
use pulldown_cmark::{html, Event, Parser};
use std::path::Path;

/// Trait for rendering an analysis report
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal view with colors, a score bar and emoji section headers
pub struct ConsoleFormatter {
    use_colors: bool,
    show_raw: bool,
    include_next_steps: bool,
}

/// Plain text artifact offered for download
pub struct TextFormatter;

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    show_raw: bool,
    include_next_steps: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
    show_raw: bool,
    include_next_steps: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    text_formatter: TextFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Matcher AI Analysis</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .score-track {
            width: 100%;
            background-color: #f0f0f0;
            height: 20px;
            border-radius: 10px;
        }
        .score-fill {
            height: 20px;
            border-radius: 10px;
        }
        .rating-excellent { background-color: green; color: green; }
        .rating-good { background-color: orange; color: orange; }
        .rating-needs-work { background-color: red; color: red; }
        .rating-message { font-weight: bold; background-color: transparent; }
        .section {
            background: #f8f9fa;
            padding: 15px;
            border-radius: 6px;
            margin: 15px 0;
        }
        .strengths { border-left: 4px solid #28a745; }
        .improvements { border-left: 4px solid #ffc107; }
        .keywords { border-left: 4px solid #dc3545; }
        .summary { border-left: 4px solid #17a2b8; }
        .raw pre { white-space: pre-wrap; }
        .metadata {
            background: #e9ecef;
            padding: 15px;
            border-radius: 6px;
            margin-top: 30px;
            font-size: 0.9em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Resume Matcher AI Analysis</h1>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        <h2>💯 Match Score: {{ score_label }}</h2>
        {% if has_score %}
        <div class="score-track">
            <div class="score-fill {{ rating_class }}" style="width:{{ score }}%;"></div>
        </div>
        <p class="rating-message {{ rating_class }}">{{ rating_message }}</p>
        {% endif %}

        <div class="section strengths">
            <h2>🟢 Key Strengths</h2>
            {{ strengths_html|safe }}
        </div>
        <div class="section improvements">
            <h2>🟡 Areas for Improvement</h2>
            {{ improvements_html|safe }}
        </div>
        <div class="section keywords">
            <h2>🎯 Keywords Missing</h2>
            {{ keywords_html|safe }}
        </div>
        <div class="section summary">
            <h2>📊 Summary</h2>
            <p>{{ summary }}</p>
        </div>

        {% if show_next_steps %}
        <div class="section">
            <h2>💡 Next Steps</h2>
            <ol>
            {% for step in next_steps %}
                <li><strong>{{ step.title }}</strong> {{ step.detail }}</li>
            {% endfor %}
            </ol>
        </div>
        {% endif %}

        {% if show_raw %}
        <div class="section raw">
            <h2>🧪 Raw AI Response</h2>
            <pre>{{ raw_text }}</pre>
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>Generated by Resume Matcher v{{ version }}</strong></p>
            <p><strong>Model:</strong> {{ model_used }} | <strong>Resume:</strong> {{ resume_file }} ({{ resume_media_type }})</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate<'a> {
    include_styles: bool,
    generated_at: String,
    processing_time: u64,
    has_score: bool,
    score: u8,
    score_label: String,
    rating_class: &'static str,
    rating_message: &'static str,
    strengths_html: String,
    improvements_html: String,
    keywords_html: String,
    summary: &'a str,
    show_next_steps: bool,
    next_steps: &'a [crate::output::report::NextStep],
    show_raw: bool,
    raw_text: &'a str,
    version: &'a str,
    model_used: &'a str,
    resume_file: &'a str,
    resume_media_type: &'a str,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, show_raw: bool, include_next_steps: bool) -> Self {
        Self {
            use_colors,
            show_raw,
            include_next_steps,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{}\n", title.bold())
        } else {
            format!("\n{}\n", title)
        }
    }

    fn rating_color(rating: MatchRating) -> Color {
        match rating {
            MatchRating::Excellent => Color::Green,
            MatchRating::Good => Color::Yellow,
            MatchRating::NeedsWork => Color::Red,
        }
    }

    /// Twenty-cell bar, one cell per five points.
    fn format_score_bar(&self, score: u8, rating: MatchRating) -> String {
        let filled = (score.min(100) / 5) as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));
        let color = Self::rating_color(rating);

        format!(
            "{}\n{}\n",
            self.colorize(&bar, color),
            if self.use_colors {
                rating.message().color(color).bold().to_string()
            } else {
                rating.message().to_string()
            }
        )
    }

    fn format_section(&self, section: &str) -> String {
        if AnalysisResult::is_extracted(section) {
            format!("{}\n", section)
        } else {
            format!("{}\n", self.colorize(section, Color::Red))
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let result = &report.result;

        output.push_str(&self.format_header("## Results"));

        match (result.score, report.rating) {
            (Some(score), Some(rating)) => {
                output.push_str(&self.format_header(&format!("💯 Match Score: {}/100", score)));
                output.push_str(&self.format_score_bar(score, rating));
            }
            _ => {
                output.push_str(&self.format_header("💯 Match Score: N/A"));
            }
        }
        output.push_str(&"─".repeat(60));
        output.push('\n');

        let icons = ["🟢", "🟡", "🎯", "📊"];
        for ((label, section), icon) in report.sections().into_iter().zip(icons) {
            output.push_str(&self.format_header(&format!("{} {}", icon, label)));
            output.push_str(&self.format_section(section));
        }

        if self.show_raw {
            output.push_str(&self.format_header("🧪 Raw AI Response"));
            output.push_str(&self.colorize(&result.raw_text, Color::BrightBlack));
            output.push('\n');
        }

        if self.include_next_steps {
            output.push_str(&self.format_header("💡 Next Steps"));
            for (i, step) in report.next_steps.iter().enumerate() {
                output.push_str(&format!(
                    "{}. {} {}\n",
                    i + 1,
                    self.colorize(&step.title, Color::Cyan),
                    step.detail
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl OutputFormatter for TextFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        Ok(format!(
            "RESUME MATCHER AI ANALYSIS\n\
             -------------------------\n\
             \n\
             MATCH SCORE: {}\n\
             \n\
             KEY STRENGTHS:\n\
             {}\n\
             \n\
             AREAS FOR IMPROVEMENT:\n\
             {}\n\
             \n\
             KEYWORDS MISSING:\n\
             {}\n\
             \n\
             SUMMARY:\n\
             {}\n",
            result.score_label(),
            result.strengths,
            result.improvements,
            result.missing_keywords,
            result.summary
        ))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self {
            include_metadata,
            show_raw: false,
            include_next_steps: true,
        }
    }

    pub fn with_extras(mut self, show_raw: bool, include_next_steps: bool) -> Self {
        self.show_raw = show_raw;
        self.include_next_steps = include_next_steps;
        self
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let metadata = &report.metadata;

        output.push_str("# Resume Matcher AI Analysis\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` ({}) | **Model:** `{}`\n\n",
                metadata.resume_file, metadata.resume_media_type, metadata.model_used
            ));
        }

        output.push_str(&format!("## 💯 Match Score: {}\n\n", report.result.score_label()));
        if let Some(rating) = report.rating {
            output.push_str(&format!("**{}**\n\n", rating.message()));
        }

        let icons = ["🟢", "🟡", "🎯", "📊"];
        for ((label, section), icon) in report.sections().into_iter().zip(icons) {
            output.push_str(&format!("## {} {}\n\n", icon, label));
            output.push_str(&markdown_bullets(section));
            output.push_str("\n\n");
        }

        if self.include_next_steps {
            output.push_str("## 💡 Next Steps\n\n");
            for (i, step) in report.next_steps.iter().enumerate() {
                output.push_str(&format!("{}. **{}** {}\n", i + 1, step.title, step.detail));
            }
            output.push('\n');
        }

        if self.show_raw {
            output.push_str("## 🧪 Raw AI Response\n\n```text\n");
            output.push_str(&report.result.raw_text);
            output.push_str("\n```\n");
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self {
            include_styles,
            show_raw: false,
            include_next_steps: true,
        }
    }

    pub fn with_extras(mut self, show_raw: bool, include_next_steps: bool) -> Self {
        self.show_raw = show_raw;
        self.include_next_steps = include_next_steps;
        self
    }

    /// Render a bulleted section to HTML. Raw HTML in the model reply is
    /// shown as text rather than passed through.
    fn section_html(section: &str) -> String {
        let markdown = markdown_bullets(section);
        let parser = Parser::new(&markdown).map(|event| match event {
            Event::Html(raw) => Event::Text(raw),
            other => other,
        });

        let mut rendered = String::new();
        html::push_html(&mut rendered, parser);
        rendered
    }

    fn rating_class(rating: Option<MatchRating>) -> &'static str {
        match rating {
            Some(MatchRating::Excellent) => "rating-excellent",
            Some(MatchRating::Good) => "rating-good",
            Some(MatchRating::NeedsWork) | None => "rating-needs-work",
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let metadata = &report.metadata;

        let template = HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            processing_time: metadata.processing_time_ms,
            has_score: result.score.is_some(),
            score: result.score.unwrap_or(0).min(100),
            score_label: result.score_label(),
            rating_class: Self::rating_class(report.rating),
            rating_message: report.rating.map(|r| r.message()).unwrap_or_default(),
            strengths_html: Self::section_html(&result.strengths),
            improvements_html: Self::section_html(&result.improvements),
            keywords_html: Self::section_html(&result.missing_keywords),
            summary: &result.summary,
            show_next_steps: self.include_next_steps && !report.next_steps.is_empty(),
            next_steps: &report.next_steps,
            show_raw: self.show_raw,
            raw_text: &result.raw_text,
            version: &metadata.matcher_version,
            model_used: &metadata.model_used,
            resume_file: &metadata.resume_file,
            resume_media_type: &metadata.resume_media_type,
        };

        Ok(template.render()?)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true)
    }

    pub fn with_options(use_colors: bool, show_raw: bool, include_next_steps: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, show_raw, include_next_steps),
            text_formatter: TextFormatter,
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true).with_extras(show_raw, include_next_steps),
            html_formatter: HtmlFormatter::new(true).with_extras(show_raw, include_next_steps),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Text => self.text_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// `resume_analysis_<name up to the first dot>.<ext>`; a saved console
/// report is written as plain text.
pub fn suggest_filename(format: &OutputFormat, resume_name: &str) -> String {
    let file_name = Path::new(resume_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base_name = file_name.split('.').next().unwrap_or_default();

    let extension = match format {
        OutputFormat::Console | OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("resume_analysis_{}.{}", base_name, extension)
}
