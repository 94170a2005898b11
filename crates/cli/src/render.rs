//! Terminal rendering: agent answers with their catalog icons, history
//! replay, profile prompts, and auto-fill notices.

use pt_domain::agent::{agent_profile, AgentResult};
use pt_domain::dog::Dog;
use pt_domain::message::{ChatMessage, Role};
use pt_domain::profile::{AutoFillUpdate, ProactiveQuestion};

pub fn dog_line(dog: &Dog, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    let breed = dog.breed.as_deref().unwrap_or("unknown breed");
    format!("{marker} [{}] {} ({breed})", dog.id, dog.name)
}

pub fn print_result(result: &AgentResult) {
    let profile = agent_profile(Some(&result.agent));
    println!("{} {}", profile.icon, profile.display_name);
    println!("{}", result.answer);
    for source in &result.sources {
        match source.page {
            Some(page) => println!("  ↳ {} p.{page}", source.source),
            None => println!("  ↳ {}", source.source),
        }
    }
    println!();
}

/// Replay loaded history, most recent `limit` entries.
pub fn print_history(messages: &[ChatMessage], limit: usize) {
    let start = messages.len().saturating_sub(limit);
    for message in &messages[start..] {
        match message.role {
            Role::User => println!("you> {}", message.content),
            Role::Assistant => {
                let profile = agent_profile(message.agent.as_deref());
                println!("{} {}", profile.icon, message.content);
            }
        }
    }
    if !messages.is_empty() {
        println!();
    }
}

pub fn print_question(question: &ProactiveQuestion) {
    eprintln!(
        "\x1B[33m[{}] {}\x1B[0m  (reply with /answer <text>)",
        question.category, question.question
    );
}

pub fn print_autofill(updates: &[AutoFillUpdate]) {
    let keys: Vec<&str> = updates.iter().map(|u| u.key.as_str()).collect();
    eprintln!(
        "\x1B[2m(profile updated: {} field{} — {})\x1B[0m",
        updates.len(),
        if updates.len() == 1 { "" } else { "s" },
        keys.join(", ")
    );
}
