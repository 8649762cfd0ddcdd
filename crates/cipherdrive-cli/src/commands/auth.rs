//! Sign-in command.

use clap::Args;

use cipherdrive_client::HttpRepositoryClient;
use cipherdrive_core::config::ClientConfig;
use cipherdrive_core::error::AppError;

use crate::output;

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(short, long)]
    pub email: Option<String>,
    /// Account password (prompted when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Execute the login command
pub async fn execute(args: &LoginArgs, config: &ClientConfig) -> Result<(), AppError> {
    let email = match &args.email {
        Some(e) => e.clone(),
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let client = HttpRepositoryClient::new(&config.api, config.view.recent_limit)?;
    let credential = client.login(&email, &password).await?;

    output::print_success(&format!("Signed in as {}", email));
    output::print_kv("Token", credential.bearer());
    println!();
    println!("Pass it with --token or export CIPHERDRIVE__AUTH__TOKEN.");
    Ok(())
}
