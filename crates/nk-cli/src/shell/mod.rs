//! Interactive prompt driving the views.

pub mod command;

use anyhow::Context;
use nk_app::{App, Screen};
use nk_auth::AuthGateway;
use nk_core::Route;
use nk_store::NoteStore;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;
use command::{ShellCommand, expand_breaks};

pub enum Outcome {
    /// Messages to show before the next prompt.
    Continue(Vec<String>),
    Quit,
}

pub async fn run<A: AuthGateway, S: NoteStore>(app: &mut App<A, S>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render::screen(&app.screen()));
    println!("(type 'help' for commands)");

    loop {
        print_prompt(app.route());
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        match execute(app, command).await {
            Outcome::Quit => break,
            Outcome::Continue(messages) => {
                app.sync().await;
                for message in messages {
                    println!("{message}");
                }
                println!("{}", render::screen(&app.screen()));
            }
        }
    }
    Ok(())
}

fn print_prompt(route: Route) {
    use std::io::Write as _;
    print!("notekeep {route}> ");
    let _ = std::io::stdout().flush();
}

fn on_home<A: AuthGateway, S: NoteStore>(app: &App<A, S>) -> bool {
    matches!(app.screen(), Screen::Home { .. })
}

/// Resolve a list number (1-based) or note id to a note id.
fn resolve_target<A: AuthGateway, S: NoteStore>(app: &App<A, S>, target: &str) -> Option<String> {
    let notes = app.home.notes();
    if let Ok(n) = target.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| notes.get(i)).map(|note| note.id.clone());
    }
    notes
        .iter()
        .find(|n| n.id == target)
        .map(|n| n.id.clone())
}

fn say(message: impl Into<String>) -> Outcome {
    Outcome::Continue(vec![message.into()])
}

const fn done() -> Outcome {
    Outcome::Continue(Vec::new())
}

pub async fn execute<A: AuthGateway, S: NoteStore>(
    app: &mut App<A, S>,
    command: ShellCommand,
) -> Outcome {
    if !matches!(command, ShellCommand::Menu { .. } | ShellCommand::Delete { .. }) {
        app.home.dismiss_menus();
    }

    match command {
        ShellCommand::Quit => Outcome::Quit,
        ShellCommand::Help => say(command::help()),
        ShellCommand::Go { route } => {
            app.navigate(route).await;
            done()
        }
        ShellCommand::Email { value } => match app.route() {
            Route::Login => {
                app.login.email = value;
                done()
            }
            Route::SignUp => {
                app.signup.email = value;
                done()
            }
            Route::Home => say("no email field here"),
        },
        ShellCommand::Password { value } => match app.route() {
            Route::Login => {
                app.login.password = value;
                done()
            }
            Route::SignUp => {
                app.signup.password = value;
                done()
            }
            Route::Home => say("no password field here"),
        },
        ShellCommand::Login => match app.route() {
            Route::Login => Outcome::Continue(app.submit_login().await),
            Route::SignUp => {
                let effects = app.signup.go_to_login();
                Outcome::Continue(app.apply(effects).await)
            }
            Route::Home => say("already signed in"),
        },
        ShellCommand::Google => {
            if app.route() == Route::Login {
                Outcome::Continue(app.login_with_google().await)
            } else {
                say("go to the login page first ('go login')")
            }
        }
        ShellCommand::Signup => match app.route() {
            Route::SignUp => Outcome::Continue(app.submit_signup().await),
            Route::Login => {
                let effects = app.login.go_to_signup();
                Outcome::Continue(app.apply(effects).await)
            }
            Route::Home => say("log out first to create another account"),
        },
        command => home_command(app, command).await,
    }
}

async fn home_command<A: AuthGateway, S: NoteStore>(
    app: &mut App<A, S>,
    command: ShellCommand,
) -> Outcome {
    if !on_home(app) {
        return say("not signed in");
    }

    match command {
        ShellCommand::Title { text } => {
            let title = expand_breaks(&text);
            if let Some(editor) = app.home.editor_mut() {
                editor.set_title(title);
            } else if app.home.inputs_enabled() {
                app.home.new_title = title;
            }
            done()
        }
        ShellCommand::Note { text } => {
            if app.home.inputs_enabled() {
                app.home.new_content = expand_breaks(&text);
            }
            done()
        }
        ShellCommand::Content { text } => match app.home.editor_mut() {
            Some(editor) => {
                editor.commit_content(expand_breaks(&text));
                done()
            }
            None => say("no note is open ('open <n>')"),
        },
        ShellCommand::Add => {
            app.add_note().await;
            done()
        }
        ShellCommand::Open { target } => match resolve_target(app, &target) {
            Some(id) => {
                app.home.open(&id);
                done()
            }
            None => say(format!("no note '{target}'")),
        },
        ShellCommand::Menu { target: Some(target) } => match resolve_target(app, &target) {
            Some(id) => {
                app.home.toggle_menu(&id);
                done()
            }
            None => say(format!("no note '{target}'")),
        },
        ShellCommand::Menu { target: None } => {
            app.home.toggle_editor_menu();
            done()
        }
        ShellCommand::Delete { target } => {
            let id = match target {
                Some(target) => resolve_target(app, &target),
                None => app.home.editor().map(|e| e.note().id.clone()),
            };
            match id {
                Some(id) => {
                    app.delete_note(&id).await;
                    done()
                }
                None => say("which note? ('delete <n>')"),
            }
        }
        ShellCommand::Close => {
            app.close_editor().await;
            done()
        }
        ShellCommand::Refresh => {
            app.refresh_notes().await;
            done()
        }
        ShellCommand::Logout => Outcome::Continue(app.logout().await),
        _ => done(),
    }
}
