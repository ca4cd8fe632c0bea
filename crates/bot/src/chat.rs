use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::Mutex;

/// An inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user: String,
    pub channel: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(
        user: impl Into<String>,
        channel: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            channel: channel.into(),
            text: text.into(),
        }
    }
}

/// Where replies to one message go.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn say(&self, text: &str) -> Result<()>;
}

/// Prints replies to stdout, one message per block.
pub struct StdoutSink;

#[async_trait]
impl ChatSink for StdoutSink {
    async fn say(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if let Err(err) = stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.write_all(b"\n"))
            .and_then(|_| stdout.flush())
        {
            if err.kind() == io::ErrorKind::BrokenPipe {
                return Ok(());
            }
            return Err(err.into());
        }
        Ok(())
    }
}

/// Keeps replies in memory.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatSink for MemorySink {
    async fn say(&self, text: &str) -> Result<()> {
        self.lines
            .lock()
            .map_err(|_| anyhow::anyhow!("reply buffer poisoned"))?
            .push(text.to_string());
        Ok(())
    }
}
