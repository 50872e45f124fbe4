//! Plain-text rendering of the active screen.

use std::fmt::Write as _;

use nk_app::Screen;
use nk_app::views::home::welcome;
use nk_app::views::{HomeView, LoginView, SignUpView};
use nk_core::UserIdentity;

fn masked(password: &str) -> String {
    "*".repeat(password.chars().count())
}

#[must_use]
pub fn screen(screen: &Screen<'_>) -> String {
    match screen {
        Screen::Loading => "Loading...".to_string(),
        Screen::Login(view) => login(view),
        Screen::SignUp(view) => signup(view),
        Screen::Home { identity, view } => home(identity, view),
    }
}

fn login(view: &LoginView) -> String {
    format!(
        "== Login ==\n\
         email:    {}\n\
         password: {}\n\
         [login] [google]   No account? [signup]",
        view.email,
        masked(&view.password)
    )
}

fn signup(view: &SignUpView) -> String {
    format!(
        "== Sign Up ==\n\
         email:    {}\n\
         password: {}\n\
         [signup]   Have an account? [login]",
        view.email,
        masked(&view.password)
    )
}

fn home(identity: &UserIdentity, view: &HomeView) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", welcome(identity));
    if let Some(photo) = &identity.photo_url {
        let _ = write!(out, "  ({photo})");
    }
    out.push_str("   [logout]\n\n");

    let inputs = if view.inputs_enabled() { "" } else { " (disabled)" };
    let _ = writeln!(out, "New note{inputs}");
    let _ = writeln!(out, "  title:   {}", view.new_title);
    let _ = writeln!(out, "  content: {}", view.new_content);
    let _ = writeln!(
        out,
        "  {}",
        if view.is_adding() { "Adding..." } else { "[add]" }
    );
    if let Some(error) = view.error() {
        let _ = writeln!(out, "  ! {error}");
    }

    out.push_str("\n== Your Notes ==\n");
    if let Some(placeholder) = view.placeholder() {
        let _ = writeln!(out, "{placeholder}");
    }
    for (i, card) in view.cards().iter().enumerate() {
        let _ = writeln!(out, "[{}] {}  ({})  :", i + 1, card.title, card.created);
        for line in card.preview.lines() {
            let _ = writeln!(out, "    {line}");
        }
        if card.menu_open {
            out.push_str("    > [delete]\n");
        }
    }

    if let Some(editor) = view.editor() {
        out.push_str("\n-- Open note --  [close]  :\n");
        if editor.is_menu_open() {
            out.push_str("> [delete]\n");
        }
        let _ = writeln!(out, "{}", editor.title());
        let _ = writeln!(out, "{}", editor.content());
        let _ = writeln!(out, "{}", editor.last_edited());
    }
    out.trim_end().to_string()
}
