use anyhow::Result;
use clap::Subcommand;
use driftchat_shared::{config::ClientConfig, models::Conversation};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum ConversationCommands {
    /// List conversations, most recent first
    List,
    /// Show a conversation's message history
    Show {
        /// Conversation identifier
        id: Uuid,
    },
    /// Delete a conversation
    Delete {
        /// Conversation identifier
        id: Uuid,
    },
}

pub async fn handle(command: ConversationCommands, config: &ClientConfig) -> Result<()> {
    let client = super::session::authenticated_client(config)?;

    match command {
        ConversationCommands::List => {
            let response = client.list_conversations().await?;
            if response.conversations.is_empty() {
                println!("No conversations found.");
                return Ok(());
            }
            for summary in &response.conversations {
                println!(
                    "- {} \"{}\" model={} messages={} last={}",
                    summary.id,
                    summary.title,
                    summary.model,
                    summary.message_count,
                    summary.last_updated.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }
        ConversationCommands::Show { id } => {
            let conversation = client.get_conversation(id).await?;
            render_conversation(&conversation);
        }
        ConversationCommands::Delete { id } => {
            client.delete_conversation(id).await?;
            println!("Deleted conversation {id}");
        }
    }

    Ok(())
}

fn render_conversation(conversation: &Conversation) {
    println!("{} ({})", conversation.title, conversation.model);
    for message in &conversation.messages {
        println!(
            "[{}] {}: {}",
            message.created_at.format("%Y-%m-%d %H:%M:%S"),
            message.role,
            message.content
        );
    }
}
