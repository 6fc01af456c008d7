use anyhow::{Result, bail};
use clap::Args;
use driftchat_shared::{config::ClientConfig, models::TopUpRequest};

#[derive(Args, Debug)]
#[command(about = "Show the credit balance, optionally topping up first")]
pub struct BalanceArgs {
    /// Amount of credit to add before showing the balance
    #[arg(long)]
    pub top_up: Option<i64>,
}

pub async fn handle(args: BalanceArgs, config: &ClientConfig) -> Result<()> {
    let client = super::session::authenticated_client(config)?;

    if let Some(amount) = args.top_up {
        if amount <= 0 {
            bail!("top-up amount must be positive");
        }
        let response = client.top_up(&TopUpRequest { amount }).await?;
        println!("Topped up {amount}. New balance: {}", response.balance);
        return Ok(());
    }

    let response = client.balance().await?;
    println!("Balance: {}", response.balance);
    Ok(())
}
