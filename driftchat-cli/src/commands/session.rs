use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use directories::BaseDirs;
use driftchat_client::ApiClient;
use driftchat_shared::{
    config::ClientConfig,
    models::{LoginRequest, RegisterRequest, User},
};
use rpassword::prompt_password;

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Log in with email and password
    Login,
    /// Register a new account
    Register,
    /// Show the authenticated user's profile
    Me,
    /// Remove the stored session token
    Logout,
}

pub async fn handle(command: SessionCommands, config: &ClientConfig) -> Result<()> {
    match command {
        SessionCommands::Login => login(config).await,
        SessionCommands::Register => register(config).await,
        SessionCommands::Me => me(config).await,
        SessionCommands::Logout => logout(),
    }
}

async fn login(config: &ClientConfig) -> Result<()> {
    let email = prompt("Email: ")?;
    let password = prompt_password("Password: ")?;
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    let client = ApiClient::new(config.api_base_url.clone())?;
    let response = client.login(&LoginRequest { email, password }).await?;

    persist_token(&response.token)?;
    print_profile(&response.user);
    Ok(())
}

async fn register(config: &ClientConfig) -> Result<()> {
    let username = prompt("Username: ")?;
    let email = prompt("Email: ")?;
    let password = prompt_password("Password: ")?;
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    let client = ApiClient::new(config.api_base_url.clone())?;
    let response = client
        .register(&RegisterRequest {
            username,
            email,
            password,
        })
        .await?;

    persist_token(&response.token)?;
    print_profile(&response.user);
    Ok(())
}

async fn me(config: &ClientConfig) -> Result<()> {
    let client = authenticated_client(config)?;
    let user = client.me().await?;
    print_profile(&user);
    Ok(())
}

fn logout() -> Result<()> {
    let path = token_path();
    if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("failed to remove session token {}", path.display()))?;
        println!("Removed session token at {}", path.display());
    } else {
        println!("No session token found at {}", path.display());
    }
    Ok(())
}

/// Builds an API client carrying the stored bearer token.
pub fn authenticated_client(config: &ClientConfig) -> Result<ApiClient> {
    let token = load_token().with_context(|| {
        format!(
            "no session token found at {}; run `driftchat session login` first",
            token_path().display()
        )
    })?;
    Ok(ApiClient::with_token(config.api_base_url.clone(), token)?)
}

pub fn token_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("driftchat").join("session.token"))
        .unwrap_or_else(|| PathBuf::from("./session.token"))
}

fn load_token() -> Result<String> {
    load_token_from(&token_path())
}

fn load_token_from(path: &Path) -> Result<String> {
    let token = fs::read_to_string(path)
        .with_context(|| format!("failed to read session token {}", path.display()))?;
    let token = token.trim().to_string();
    if token.is_empty() {
        bail!("session token at {} is empty", path.display());
    }
    Ok(token)
}

fn persist_token(token: &str) -> Result<()> {
    let path = token_path();
    persist_token_at(&path, token)?;
    println!("Session token saved to {}", path.display());
    Ok(())
}

fn persist_token_at(path: &Path, token: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, token.as_bytes())
        .with_context(|| format!("failed to write session token at {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .context("failed to set session token permissions")?;
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create session directory {}", parent.display()))?;
    }
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

fn print_profile(user: &User) {
    println!("Logged in as {}", user.email);
    println!("username: {}", user.username);
    println!("balance: {}", user.balance);
}
