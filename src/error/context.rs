use crate::error::ModeSwitchError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a ModeSwitchError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a ModeSwitchError) -> Self {
        let (suggestion, details) = match error {
            ModeSwitchError::AlreadyPending => (
                Some(
                    "Wait for the countdown to finish, or trigger 'cancel' to abort it."
                        .to_string(),
                ),
                None,
            ),
            ModeSwitchError::SwitchInProgress => (
                Some("Trigger 'cancel' first, then run the UI test again.".to_string()),
                None,
            ),
            ModeSwitchError::TestInProgress => (
                Some("Wait for the running UI test to restore the display.".to_string()),
                None,
            ),
            ModeSwitchError::NotReady => (
                Some(
                    "Start the daemon with '--mode auto' or '--mode manual', or set 'mode' in \
                     config.toml."
                        .to_string(),
                ),
                Some("The current operating mode is not known yet.".to_string()),
            ),
            ModeSwitchError::InvalidMode(value) => (
                Some("Valid modes are 'auto' (alias 'ai') and 'manual'.".to_string()),
                Some(format!("Could not parse mode from '{value}'")),
            ),
            ModeSwitchError::Presentation(msg) => (
                Some("Check 'font_path' in the [display] section of config.toml.".to_string()),
                Some(msg.clone()),
            ),
            ModeSwitchError::SignalClear { path, source } => (
                Some(format!(
                    "Remove {} manually and check the permissions of its directory.",
                    path.display()
                )),
                Some(source.to_string()),
            ),
            ModeSwitchError::CountdownSpawn(_) => (
                Some("The system may be out of threads or memory. Try again shortly.".to_string()),
                None,
            ),
            ModeSwitchError::ConfigError(msg) | ModeSwitchError::InvalidConfig(msg) => {
                let suggestion = Some(
                    "Check config.toml syntax and MODESWITCH_* environment variables.".to_string(),
                );
                (suggestion, Some(msg.clone()))
            }
            ModeSwitchError::Io(e) => match e.kind() {
                std::io::ErrorKind::PermissionDenied => (
                    Some("Run with elevated privileges or adjust the trigger paths.".to_string()),
                    None,
                ),
                _ => (None, None),
            },
            ModeSwitchError::Json(_) => (None, None),
        };

        Self {
            error,
            suggestion,
            details,
        }
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
