use super::MAX_ATTACHMENT_SIZE;
use crate::error::{AppError, AppResult};
use serenity::model::channel::Attachment;

const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

pub(super) fn is_image(attachment: &Attachment) -> bool {
    if let Some(content_type) = attachment.content_type.as_deref() {
        return content_type.starts_with("image/");
    }
    let name = attachment.filename.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Fetches an attachment of `size` bytes into memory.
pub(super) async fn download(
    client: &reqwest::Client,
    url: &str,
    size: u32,
) -> AppResult<Vec<u8>> {
    if size > MAX_ATTACHMENT_SIZE {
        return Err(AppError::validation(format!(
            "The image is too large ({} MB max).",
            MAX_ATTACHMENT_SIZE / 1024 / 1024
        )));
    }

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(AppError::backend(format!(
            "Image download failed: HTTP {}",
            resp.status()
        )));
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Splits `text` into chunks of at most `max_len` characters, preferring
/// line breaks, then spaces.
pub(super) fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut remaining = text;

    while remaining.chars().count() > max_len {
        let limit = remaining
            .char_indices()
            .nth(max_len)
            .map_or(remaining.len(), |(i, _)| i);
        let window = &remaining[..limit];

        let split_at = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0)
            .map_or(limit, |i| i + 1);

        let chunk = &remaining[..split_at];
        if !chunk.trim().is_empty() {
            chunks.push(chunk.trim_end().to_string());
        }
        remaining = &remaining[split_at..];
    }

    if !remaining.trim().is_empty() || chunks.is_empty() {
        chunks.push(remaining.to_string());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn oversized_attachment_is_rejected_before_download() {
        let client = reqwest::Client::new();
        let err = download(&client, "http://127.0.0.1:9/food.png", MAX_ATTACHMENT_SIZE + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("too large")));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_backend_error() {
        let client = reqwest::Client::new();
        let err = download(&client, "http://127.0.0.1:9/food.png", 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_message("hello", 2000), ["hello"]);
    }

    #[test]
    fn prefers_line_breaks() {
        let text = "first line\nsecond line\nthird";
        assert_eq!(
            split_message(text, 15),
            ["first line", "second line", "third"]
        );
    }

    #[test]
    fn hard_splits_long_words_on_char_boundaries() {
        let text = "ééééééééé";
        let chunks = split_message(text, 4);
        assert_eq!(chunks, ["éééé", "éééé", "é"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }
}
