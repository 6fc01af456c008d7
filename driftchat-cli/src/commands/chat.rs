use std::io::Write as _;

use anyhow::{Result, bail};
use clap::Args;
use driftchat_client::{
    ConversationRef, PartialMessagePolicy, StreamError, StreamHandler, StreamSession,
};
use driftchat_shared::{
    config::ClientConfig,
    models::{ChatMessage, ChatStreamRequest},
};
use uuid::Uuid;

#[derive(Args, Debug)]
#[command(about = "Send a message and stream the assistant's reply")]
pub struct ChatArgs {
    /// The message to send
    #[arg()]
    pub prompt: String,

    /// Conversation to continue; a new one is created when omitted
    #[arg(long, alias = "conv")]
    pub conversation: Option<Uuid>,

    /// Model to use (falls back to the configured default)
    #[arg(long, short)]
    pub model: Option<String>,

    /// Maximum number of tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

/// Prints deltas as they arrive, the way the chat page renders them.
#[derive(Default)]
struct StdoutStreamHandler {
    assigned: Option<ConversationRef>,
}

impl StreamHandler for StdoutStreamHandler {
    fn on_delta(&mut self, text: &str) {
        print!("{text}");
        std::io::stdout().flush().ok();
    }

    fn on_conversation_assigned(&mut self, conversation: &ConversationRef) {
        self.assigned = Some(conversation.clone());
    }

    fn on_complete(&mut self, _final_text: &str) {
        println!();
    }

    fn on_error(&mut self, error: &StreamError) {
        println!();
        match error {
            StreamError::Cancelled => eprintln!("[stream cancelled]"),
            other => eprintln!("[stream error] {other}"),
        }
    }
}

pub async fn handle(args: ChatArgs, config: &ClientConfig) -> Result<()> {
    let Some(model) = args.model.or_else(|| config.default_model.clone()) else {
        bail!("no model given; pass --model or set default_model in the config");
    };

    let client = super::session::authenticated_client(config)?;
    let request = ChatStreamRequest {
        model,
        messages: vec![ChatMessage::user(args.prompt)],
        conversation_id: args.conversation,
        max_tokens: args.max_tokens,
    };

    let policy = if config.keep_partial_on_error {
        PartialMessagePolicy::Keep
    } else {
        PartialMessagePolicy::Discard
    };
    let mut session = StreamSession::new(policy);
    let mut handler = StdoutStreamHandler::default();

    // Ctrl+C cancels the stream instead of killing the process outright.
    let cancel = session.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match client.stream_chat(&request, &mut session, &mut handler).await {
        Ok(_) => {
            if args.conversation.is_none() {
                if let Some(conversation) = &handler.assigned {
                    match &conversation.title {
                        Some(title) => {
                            println!("[conversation {} \"{}\"]", conversation.id, title);
                        }
                        None => println!("[conversation {}]", conversation.id),
                    }
                }
            }
            Ok(())
        }
        // The handler already reported these; exit quietly for cancels.
        Err(StreamError::Cancelled) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
