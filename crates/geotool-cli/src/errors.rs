use console::style;
use geotool_core::GeotoolError;
use thiserror::Error;

/// Failures raised by the commands themselves
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Refusing to {action} without confirmation in JSON mode")]
    ConfirmationRequired { action: String },
}

/// Error message with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Build from an error chain, adding hints for errors users can fix
    pub fn from_anyhow(error: &anyhow::Error) -> Self {
        let mut cli_error = Self::new(error.to_string());
        let causes: Vec<String> = error.chain().skip(1).map(|c| c.to_string()).collect();
        if !causes.is_empty() {
            cli_error = cli_error.with_context(causes.join("\n"));
        }

        if let Some(CommandError::ConfirmationRequired { .. }) =
            error.chain().find_map(|c| c.downcast_ref::<CommandError>())
        {
            return cli_error.with_suggestion("Re-run with --yes to confirm");
        }

        match error.chain().find_map(|c| c.downcast_ref::<GeotoolError>()) {
            Some(GeotoolError::NothingToExport) => cli_error
                .with_suggestion("Capture something first with 'geotool capture'")
                .with_suggestion("Check the data file with 'geotool config'"),
            Some(GeotoolError::UnsupportedFormat { supported, .. }) => {
                cli_error.with_suggestion(format!("Use one of: {}", supported))
            }
            Some(GeotoolError::ConfigInvalid { key, .. }) => cli_error
                .with_suggestion(format!("Fix '{}' in geotool.toml or the environment", key)),
            Some(GeotoolError::InvalidCoordinate { .. }) => cli_error
                .with_suggestion("Latitude must be within ±90 and longitude within ±180"),
            _ => cli_error,
        }
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "error",
            "message": self.message,
            "context": self.context,
            "suggestions": self.suggestions,
        })
    }
}

/// Print a failed command's error in the selected output mode
pub fn report(error: &anyhow::Error, json: bool) {
    let cli_error = CliError::from_anyhow(error);
    if json {
        match serde_json::to_string_pretty(&cli_error.to_json()) {
            Ok(text) => eprintln!("{}", text),
            Err(_) => eprintln!("{}", cli_error.message),
        }
    } else {
        cli_error.display();
    }
}
