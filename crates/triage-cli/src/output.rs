//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use triage_client::HealthStatus;
use triage_domain::{InputSet, Modality, RiskLevel, RunState, SessionResult};

/// Safety notice shown before every session and run.
pub const DISCLAIMER: &str = "Emergency? Call 112 / 911. This tool is not for diagnosis.";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a session result.
    pub fn format_result(&self, result: &SessionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&result.to_json())?),
            OutputFormat::Table => self.format_result_table(result),
            OutputFormat::Quiet => Ok(result.risk_level().to_string()),
        }
    }

    /// Format a session result as a summary table followed by the raw JSON.
    fn format_result_table(&self, result: &SessionResult) -> Result<String> {
        let alerts = if result.emergency_alerts().is_empty() {
            "none".to_string()
        } else {
            self.colorize(&result.emergency_alerts().join(", "), "red")
        };
        let preview = match result.preview() {
            Some(preview) => format!("yes ({} bytes)", preview.len()),
            None => "no".to_string(),
        };

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["Run".to_string(), result.run_id.to_string()]);
        builder.push_record(["Risk level".to_string(), self.risk_label(result)]);
        builder.push_record(["Emergency alerts".to_string(), alerts]);
        builder.push_record([
            "Transcript".to_string(),
            excerpt(result.asr.as_ref().and_then(|a| a.text.as_deref())),
        ]);
        builder.push_record([
            "Lab text".to_string(),
            excerpt(result.ocr.as_ref().and_then(|o| o.text.as_deref())),
        ]);
        builder.push_record(["Image preview".to_string(), preview]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let raw = serde_json::to_string_pretty(&result.to_json())?;
        Ok(format!("{}\n\nRaw result:\n{}", table, raw))
    }

    /// Risk level, highlighted by urgency.
    fn risk_label(&self, result: &SessionResult) -> String {
        let label = result.risk_level();
        match result.risk() {
            RiskLevel::Critical | RiskLevel::High => self.colorize(label, "red"),
            RiskLevel::Moderate => self.colorize(label, "yellow"),
            RiskLevel::Low => self.colorize(label, "green"),
            RiskLevel::Unknown => label.to_string(),
        }
    }

    /// Format the current input selection.
    pub fn format_inputs(&self, inputs: &InputSet) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Modality", "File", "Media type", "Size"]);

        for modality in Modality::ALL {
            match inputs.get(modality) {
                Some(artifact) => builder.push_record([
                    modality.to_string(),
                    artifact.file_name.clone(),
                    artifact.media_type.clone(),
                    format!("{} B", artifact.len()),
                ]),
                None => builder.push_record([
                    modality.to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ]),
            }
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }

    /// Format a health check result.
    pub fn format_health(&self, base_url: &str, health: &HealthStatus) -> String {
        let version = health.version.as_deref().unwrap_or("unknown");
        if health.ok {
            self.success(&format!("{} is healthy (version {})", base_url, version))
        } else {
            self.warning(&format!("{} reported unhealthy (version {})", base_url, version))
        }
    }

    /// Format the run state.
    pub fn run_state(&self, state: RunState) -> String {
        match state {
            RunState::Idle => self.info("Idle"),
            RunState::Running => self.warning("Running"),
        }
    }

    /// The safety disclaimer banner.
    pub fn disclaimer(&self) -> String {
        self.colorize(&format!("⚠ {}", DISCLAIMER), "yellow")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().bold().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// First line of an extracted text, shortened for table display.
fn excerpt(text: Option<&str>) -> String {
    const MAX_CHARS: usize = 60;

    let Some(text) = text else {
        return "-".to_string();
    };
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > MAX_CHARS {
        let short: String = line.chars().take(MAX_CHARS).collect();
        format!("{}…", short)
    } else {
        line.to_string()
    }
}
