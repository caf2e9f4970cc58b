use crate::error::{ErrorContext, ModeSwitchError};

const LABEL_ERROR: &str = "\x1b[1;31m";
const LABEL_DETAILS: &str = "\x1b[2m";
const LABEL_SUGGESTION: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

pub fn format_error_chain(error: &ModeSwitchError) -> String {
    ErrorContext::new(error).to_string()
}

/// Same sections as [`format_error_chain`]; with `use_color` the section
/// labels are highlighted for a terminal.
pub fn format_error_with_color(error: &ModeSwitchError, use_color: bool) -> String {
    if !use_color {
        return format_error_chain(error);
    }

    let context = ErrorContext::new(error);
    let mut output = format!("{LABEL_ERROR}Error:{RESET} {error}");
    if let Some(details) = &context.details {
        output.push_str(&format!("\n\n{LABEL_DETAILS}Details:{RESET} {details}"));
    }
    if let Some(suggestion) = &context.suggestion {
        output.push_str(&format!(
            "\n\n{LABEL_SUGGESTION}Suggestion:{RESET} {suggestion}"
        ));
    }
    output
}
