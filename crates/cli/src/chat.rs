//! `pawtalk chat` — interactive REPL command.
//!
//! Opens a readline-based loop that runs each line through the send
//! protocol and prints the specialist answers.  Slash-commands cover dog
//! management, profile questions, and report generation.

use pt_chat::SendOutcome;
use pt_domain::config::Config;

use crate::app::App;
use crate::render;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
///
/// Loads the account's dogs, selects the requested (or first) one, then
/// enters a readline loop.  Before each prompt the engagement scheduler
/// gets a chance to surface a profile question.
pub async fn chat(config: Config, dog: Option<i64>) -> anyhow::Result<()> {
    let app = App::build(config)?;

    // 1. Load dogs and select one.
    let dogs = app.orchestrator.load_dogs(app.config.api.user_id).await?;
    let Some(first) = dogs.first() else {
        eprintln!("No dogs registered for this account.");
        return Ok(());
    };
    let start_id = dog.unwrap_or(first.id);
    app.orchestrator.switch_dog(start_id).await?;

    // 2. Initialize rustyline editor with persistent history.
    let history_path = dirs_home().join(".pawtalk").join("chat_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    // 3. Welcome message to stderr (keep stdout clean for answers).
    let name = app
        .state
        .selected_dog()
        .map(|d| d.name)
        .unwrap_or_else(|| first.name.clone());
    eprintln!("PawTalk interactive chat");
    eprintln!("Talking about: {name}  |  Type /help for commands, Ctrl+D to exit");
    eprintln!();
    render::print_history(&app.state.messages(), 10);

    // 4. REPL loop.
    loop {
        if let Some(dog_id) = app.state.selected_dog_id() {
            app.scheduler.maybe_prompt(dog_id).await;
        }
        if let Some(question) = app.state.proactive_question() {
            render::print_question(&question);
        }

        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(&line).ok();

                // ── Slash commands ────────────────────────────────
                if trimmed.starts_with('/') {
                    if handle_slash_command(&app, trimmed).await {
                        break;
                    }
                    continue;
                }

                // ── User message → send protocol ─────────────────
                send_message(&app, trimmed).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /quit to exit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    // 5. Save history.
    rl.save_history(&history_path).ok();

    eprintln!("Goodbye!");
    Ok(())
}

fn dirs_home() -> std::path::PathBuf {
    std::env::var_os("HOME")
        .map(std::path::PathBuf::from)
        .unwrap_or_default()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process a slash command.  Returns `true` if the REPL should exit.
async fn handle_slash_command(app: &App, input: &str) -> bool {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim());

    match cmd {
        "/exit" | "/quit" => return true,

        "/dogs" => {
            let selected = app.state.selected_dog_id();
            for dog in app.state.dogs() {
                eprintln!("{}", render::dog_line(&dog, selected == Some(dog.id)));
            }
        }

        "/switch" => match arg.and_then(|s| s.parse::<i64>().ok()) {
            Some(id) => match app.orchestrator.switch_dog(id).await {
                Ok(()) => {
                    if let Some(error) = app.state.error() {
                        eprintln!("\x1B[31merror: {error}\x1B[0m");
                    } else {
                        let name = app
                            .state
                            .selected_dog()
                            .map(|d| d.name)
                            .unwrap_or_default();
                        eprintln!("Now talking about: {name}");
                        render::print_history(&app.state.messages(), 10);
                    }
                }
                Err(e) => eprintln!("\x1B[31merror: {e}\x1B[0m"),
            },
            None => eprintln!("Usage: /switch <dog-id>  (see /dogs)"),
        },

        "/question" => {
            if let Some(dog_id) = app.state.selected_dog_id() {
                app.scheduler.force_prompt(dog_id).await;
                match app.state.proactive_question() {
                    Some(question) => render::print_question(&question),
                    None => eprintln!("(every profile question is already answered)"),
                }
            }
        }

        "/answer" => match (app.state.selected_dog_id(), app.state.proactive_question(), arg) {
            (Some(dog_id), Some(question), Some(text)) if !text.is_empty() => {
                match app.scheduler.answer(dog_id, &question.key, text).await {
                    Ok(()) => eprintln!("Saved, thanks!"),
                    Err(e) => eprintln!("\x1B[31merror: {e}\x1B[0m"),
                }
            }
            (_, None, _) => eprintln!("No question is waiting.  Try /question."),
            _ => eprintln!("Usage: /answer <text>"),
        },

        "/report" => match app.orchestrator.generate_report().await {
            Ok(report) => {
                eprintln!("Report generated: {}", report.filename);
                if let Some(url) = report.url_md {
                    eprintln!("  markdown: {url}");
                }
                if let Some(url) = report.url_pdf {
                    eprintln!("  pdf:      {url}");
                }
            }
            Err(e) => eprintln!("\x1B[31merror: {e}\x1B[0m"),
        },

        "/clear" => {
            // ANSI escape: clear screen and move cursor to top-left.
            eprint!("\x1B[2J\x1B[1;1H");
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /dogs            List your dogs");
            eprintln!("  /switch <id>     Switch the conversation to another dog");
            eprintln!("  /question        Ask for a profile question now");
            eprintln!("  /answer <text>   Answer the waiting profile question");
            eprintln!("  /report          Generate a health report");
            eprintln!("  /clear           Clear the screen");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    false
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message sending
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run one send and print the outcome: specialist answers on success,
/// the recorded error on failure.
async fn send_message(app: &App, message: &str) {
    eprintln!("\x1B[2manalyzing…\x1B[0m");

    match app.orchestrator.send(message).await {
        SendOutcome::Completed => {
            if let Some(results) = app.state.pending_results() {
                for result in &results {
                    render::print_result(result);
                }
            }
            let updates = app.state.autofill_updates();
            if !updates.is_empty() {
                render::print_autofill(&updates);
            }
        }
        SendOutcome::Busy => {
            eprintln!("(still working on the previous question)");
        }
        SendOutcome::Superseded => {}
        SendOutcome::Failed => {
            if let Some(error) = app.state.error() {
                eprintln!("\x1B[31merror: {error}\x1B[0m");
            }
        }
    }
}
