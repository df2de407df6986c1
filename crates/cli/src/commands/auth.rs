//! `oak login`, `oak logout`, `oak whoami`.

use std::io::BufRead;

use oakline_core::Email;
use secrecy::SecretString;
use serde::Serialize;

use super::Context;
use crate::error::{CliError, RequestExt};
use crate::output::print_json;

#[derive(Serialize)]
struct LoginSummary<'a> {
    email: &'a str,
    message: Option<String>,
    session_file: String,
}

/// Sign in and persist the session.
///
/// The password comes from `--password` / `OAKLINE_ADMIN_PASSWORD`, or the
/// first line of stdin.
pub async fn login(ctx: &Context, email: &Email, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => read_password_line()?,
    };
    if password.is_empty() {
        return Err(CliError::InvalidArgument("password", "must not be empty".to_string()));
    }
    let password = SecretString::from(password);

    let response = ctx
        .auth
        .login(email, &password)
        .await
        .for_action("sign in")?;

    print_json(&LoginSummary {
        email: email.as_str(),
        message: response.message,
        session_file: ctx.config.session_file.display().to_string(),
    })
}

/// Forget the stored session.
pub async fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.auth.logout().await?;
    print_json(&serde_json::json!({ "message": "Signed out" }))
}

/// Show the admin the stored token belongs to.
pub async fn whoami(ctx: &Context) -> Result<(), CliError> {
    let admin = ctx.require_admin().await?;
    print_json(&admin)
}

fn read_password_line() -> Result<String, CliError> {
    tracing::info!("Reading password from stdin");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
