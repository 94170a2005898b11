//! `pawtalk run` — send a single question and print the answers.

use pt_chat::SendOutcome;
use pt_domain::config::Config;

use crate::app::App;
use crate::render;

pub async fn run(config: Config, message: String, dog: Option<i64>) -> anyhow::Result<()> {
    let app = App::build(config)?;

    let dogs = app.orchestrator.load_dogs(app.config.api.user_id).await?;
    let dog_id = match dog {
        Some(id) => id,
        None => dogs
            .first()
            .map(|d| d.id)
            .ok_or_else(|| anyhow::anyhow!("no dogs registered for this account"))?,
    };
    app.orchestrator.switch_dog(dog_id).await?;

    match app.orchestrator.send(&message).await {
        SendOutcome::Completed => {
            for result in app.state.pending_results().unwrap_or_default() {
                render::print_result(&result);
            }
            Ok(())
        }
        SendOutcome::Failed => {
            let error = app
                .state
                .error()
                .unwrap_or_else(|| "send failed".to_owned());
            anyhow::bail!(error)
        }
        // A one-shot run has no concurrent sends or dog switches.
        SendOutcome::Busy | SendOutcome::Superseded => Ok(()),
    }
}
