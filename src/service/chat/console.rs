//! Line-oriented chat transport over stdin/stdout.
//!
//! Every line typed on stdin becomes a `Sent` event from the configured handle;
//! replies are printed to stdout.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{InboundEvent, MessageStatus, Void},
    },
    interaction::dispatcher::Dispatcher,
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the console implementation.

impl ChatClient {
    /// Creates a new console chat client.
    pub fn console(config: &Config) -> Self {
        ConsoleChatClient::new(config).into()
    }
}

impl From<ConsoleChatClient> for ChatClient {
    fn from(client: ConsoleChatClient) -> Self {
        Self::new(Arc::new(client))
    }
}

// Structs.

/// Console client implementation.
#[derive(Clone)]
struct ConsoleChatClient {
    handle: String,
    chat_id: String,
    stdout: Arc<Mutex<tokio::io::Stdout>>,
}

impl ConsoleChatClient {
    fn new(config: &Config) -> Self {
        Self {
            handle: config.console_handle.clone(),
            chat_id: config.console_chat.clone(),
            stdout: Arc::new(Mutex::new(tokio::io::stdout())),
        }
    }
}

#[async_trait]
impl GenericChatClient for ConsoleChatClient {
    fn bot_handle(&self) -> &str {
        "bot"
    }

    #[instrument(name = "ConsoleChatClient::start", skip_all)]
    async fn start(&self, dispatcher: Dispatcher) -> Void {
        info!("Console transport listening on stdin as `{}` ...", self.handle);

        let chat = ChatClient::from(self.clone()).chat_ref(self.chat_id.clone());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("Console input closed.");
                        break;
                    };

                    let event = InboundEvent::new(self.handle.clone(), line, chat.clone(), MessageStatus::Sent);
                    dispatcher.dispatch(event);
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down ...");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Void {
        let mut stdout = self.stdout.lock().await;

        stdout.write_all(format!("[{chat_id}] {}> {text}\n", self.bot_handle()).as_bytes()).await?;
        stdout.flush().await?;

        Ok(())
    }
}
