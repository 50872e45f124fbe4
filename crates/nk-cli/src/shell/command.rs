use clap::{CommandFactory, Parser, Subcommand};
use nk_core::Route;

/// One line typed at the prompt.
#[derive(Debug, Parser)]
#[command(
    name = "nk",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Set the email field
    Email { value: String },
    /// Set the password field
    Password { value: String },
    /// Log in with email and password, or open the login page from sign-up
    Login,
    /// Log in with Google in the browser
    Google,
    /// Open the sign-up page, or submit it when already there
    Signup,
    /// Go to a page: login, signup, home
    Go {
        #[arg(value_parser = parse_route)]
        route: Route,
    },
    /// Set the title (new note, or the open note)
    Title { text: String },
    /// Set the new note's content
    Note { text: String },
    /// Add the new note
    Add,
    /// Open a note by list number or id
    Open { target: String },
    /// Toggle a note's menu, or the open note's menu
    Menu { target: Option<String> },
    /// Delete a note, or the open note
    Delete { target: Option<String> },
    /// Replace the open note's content (`\n` for line breaks)
    Content { text: String },
    /// Close the open note, saving changes
    Close,
    /// Reload the note list
    Refresh,
    /// Sign out
    Logout,
    /// Show this help
    Help,
    /// Leave Notekeep
    #[command(alias = "exit")]
    Quit,
}

fn parse_route(s: &str) -> Result<Route, String> {
    s.parse().map_err(|e: nk_core::CoreError| e.to_string())
}

/// Commands whose argument is the rest of the line, taken verbatim.
const RAW_VALUE_COMMANDS: [&str; 5] = ["email", "password", "title", "note", "content"];

/// Expand typed `\n` escapes into line breaks.
#[must_use]
pub fn expand_breaks(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Parse a prompt line. Blank lines yield `None`.
///
/// Only the verb is split off. For the text and credential commands the
/// remainder after the first whitespace character is passed through as a
/// single value, so spaces and leading `-` survive.
///
/// # Errors
///
/// Returns the clap error for unknown commands or bad arguments.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, clap::Error> {
    let line = line.trim_start();
    if line.trim_end().is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));

    let args: Vec<&str> = if RAW_VALUE_COMMANDS.contains(&verb) {
        vec![verb, "--", rest]
    } else {
        std::iter::once(verb).chain(rest.split_whitespace()).collect()
    };
    ShellLine::try_parse_from(args).map(|parsed| Some(parsed.command))
}

#[must_use]
pub fn help() -> String {
    ShellLine::command().render_help().to_string()
}
