//! Slash commands handled locally by the terminal front-end.
//!
//! Anything that is not a recognised command is sent to the backend as-is.

use crate::app::App;
use crate::core::endpoint::QueryMode;

pub const HELP_TEXT: &str = "Enter send • Tab switch mode • Ctrl+O toggle chat • \
/mode [full|selected] • /select [text] • /log [file] • Ctrl+C quit";

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();
    let (command, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        "/help" => {
            app.set_status(HELP_TEXT);
            CommandResult::Continue
        }
        "/mode" => {
            if argument.is_empty() {
                let mode = app.widget.mode();
                app.set_status(format!("Mode: {} ({mode})", mode.label()));
                return CommandResult::Continue;
            }
            match argument.parse::<QueryMode>() {
                Ok(mode) => {
                    app.widget.set_mode(mode);
                    app.set_status(format!("Mode set to {}", mode.label()));
                }
                Err(e) => app.set_status(e),
            }
            CommandResult::Continue
        }
        "/select" => {
            if argument.is_empty() {
                app.widget.set_selection(None);
                app.set_status("Selection cleared");
            } else {
                app.widget.set_selection(Some(argument.to_string()));
                app.set_status(format!(
                    "Selection set ({} chars); used in selected-text mode",
                    argument.chars().count()
                ));
            }
            CommandResult::Continue
        }
        "/log" => {
            let result = if argument.is_empty() {
                app.logging.toggle_logging()
            } else {
                app.logging.set_log_file(argument.to_string())
            };
            match result {
                Ok(message) => app.set_status(message),
                Err(e) => app.set_status(format!("Error: {e}")),
            }
            CommandResult::Continue
        }
        _ => CommandResult::ProcessAsMessage(input.to_string()),
    }
}
