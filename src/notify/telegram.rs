use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::notify::Notifier;

/* Telegram caps messages at 4096 characters; stay under it */
const MAX_MESSAGE_LEN: usize = 4000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CHUNK_PAUSE: Duration = Duration::from_secs(1);

pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
}

impl TelegramConfig {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TG_TOKEN").map_err(|_| anyhow::anyhow!("TG_TOKEN not set"))?;

        let chat_id = env::var("TG_CHAT_ID").map_err(|_| anyhow::anyhow!("TG_CHAT_ID not set"))?;

        Ok(Self { token, chat_id })
    }
}

pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: "https://api.telegram.org".to_string(),
            token: config.token,
            chat_id: config.chat_id,
        })
    }

    async fn post_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("disable_web_page_preview", "true"),
        ];

        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .context("telegram sendMessage failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("telegram http error {status}: {body}");
        }

        debug!(length = text.len(), "telegram message sent");

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let chunk_count = chunks.len();

        for (index, chunk) in chunks.iter().enumerate() {
            self.post_message(chunk).await?;

            if index + 1 < chunk_count {
                tokio::time::sleep(CHUNK_PAUSE).await;
            }
        }

        Ok(())
    }
}

/// Splits on line boundaries so no chunk exceeds `max_len` bytes. A single
/// line longer than `max_len` is hard-split on character boundaries.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        if line.len() > max_len {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }

            let mut piece = String::new();
            for character in line.chars() {
                if piece.len() + character.len_utf8() > max_len {
                    chunks.push(std::mem::take(&mut piece));
                }
                piece.push(character);
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }

            continue;
        }

        let extra = if current.is_empty() {
            line.len()
        } else {
            line.len() + 1
        };

        if current.len() + extra > max_len {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_one_chunk() {
        let chunks = split_message("hello\nworld", 4000);

        assert_eq!(chunks, vec!["hello\nworld".to_string()]);
    }

    #[test]
    fn long_message_splits_on_line_boundaries() {
        let text = (0..100)
            .map(|i| format!("line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");

        let chunks = split_message(&text, 100);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|chunk| chunk.len() <= 100));
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn oversized_single_line_is_hard_split() {
        let text = "x".repeat(250);

        let chunks = split_message(&text, 100);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|chunk| chunk.len() <= 100));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn hard_split_respects_multibyte_boundaries() {
        let text = "가".repeat(100); /* 3 bytes each */

        let chunks = split_message(&text, 100);

        assert!(chunks.iter().all(|chunk| chunk.len() <= 100));
        assert_eq!(chunks.concat(), text);
    }
}
