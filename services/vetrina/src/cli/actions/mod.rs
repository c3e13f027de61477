pub mod server;

// The match over actions lives in its own module.
mod run;

/// What the CLI resolved to. Only a server today; migrations and admin
/// tooling would slot in as further variants.
#[derive(Debug)]
pub enum Action {
    Server(server::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
