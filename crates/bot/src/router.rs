use crate::chat::{ChatMessage, ChatSink};
use crate::command::{parse_command, Command, CommandHandler, Outcome, TRIGGER_KEYWORD};
use crate::small_talk;
use std::sync::Arc;

/// What to do with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Ignore,
    Command(Option<Command>),
    SmallTalk(String),
}

/// Decides which messages reach the command handler.
///
/// With a bot user id configured, only messages that start with the bot
/// mention (`<@ID> ...`) are addressed to it, and its own messages are
/// skipped. Without one every message is addressed to the bot.
pub struct Router {
    bot_user_id: Option<String>,
    handler: Arc<CommandHandler>,
}

impl Router {
    pub fn new(bot_user_id: Option<String>, handler: Arc<CommandHandler>) -> Self {
        Self {
            bot_user_id: bot_user_id.filter(|id| !id.trim().is_empty()),
            handler,
        }
    }

    #[must_use]
    pub fn route(&self, message: &ChatMessage) -> Route {
        let text = match self.bot_user_id.as_deref() {
            Some(bot) if message.user == bot => return Route::Ignore,
            Some(bot) => {
                let mention = format!("<@{bot}>");
                match message.text.strip_prefix(&mention) {
                    Some(rest) => rest.trim_start(),
                    None => return Route::Ignore,
                }
            }
            None => message.text.trim_start(),
        };

        if text.starts_with(TRIGGER_KEYWORD) {
            return Route::Command(parse_command(text));
        }
        small_talk::reply(text, &message.user)
            .map(Route::SmallTalk)
            .unwrap_or(Route::Ignore)
    }

    /// Route and handle one message. Returns the command outcome when the
    /// message was a command.
    pub async fn dispatch(&self, message: &ChatMessage, sink: &dyn ChatSink) -> Option<Outcome> {
        match self.route(message) {
            Route::Ignore => None,
            Route::SmallTalk(reply) => {
                if let Err(err) = sink.say(&reply).await {
                    log::warn!("Failed to deliver reply: {err:#}");
                }
                None
            }
            Route::Command(command) => {
                log::info!(
                    "{} in {}: {}",
                    message.user,
                    message.channel,
                    message.text.trim()
                );
                Some(self.handler.execute(command, sink).await)
            }
        }
    }
}
