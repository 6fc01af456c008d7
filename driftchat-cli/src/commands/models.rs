use anyhow::Result;
use driftchat_shared::config::ClientConfig;

pub async fn handle(config: &ClientConfig) -> Result<()> {
    let client = super::session::authenticated_client(config)?;
    let response = client.list_models().await?;

    if response.models.is_empty() {
        println!("No models available.");
        return Ok(());
    }

    for model in &response.models {
        println!("- {} ({}) [{}]", model.name, model.id, model.provider);
        if !model.description.is_empty() {
            println!("  {}", model.description);
        }
    }
    Ok(())
}
