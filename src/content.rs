//! Book content loading.
//!
//! Books come from the content service as JSON; during development they are
//! just as often a file on disk. The loader accepts either and hands back the
//! parsed model with its closing page already appended.

use crate::book::Book;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Load a book from a local JSON file or an HTTP(S) URL.
pub fn load_book(source: &str) -> Result<Book> {
    let data = if is_url(source) {
        fetch_remote(source)?
    } else {
        let path = Path::new(source);
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read book file {}", path.display()))?
    };
    let book = Book::from_json(&data).context("Parsing book document")?;
    info!(
        book_id = %book.id,
        title = %book.title,
        pages = book.page_count(),
        "Loaded book"
    );
    Ok(book)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn fetch_remote(url: &str) -> Result<String> {
    info!(url, "Fetching book from content service");
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Building content HTTP client")?;
    client
        .get(url)
        .send()
        .with_context(|| format!("Fetching book from {url}"))?
        .error_for_status()
        .context("Content service returned an error status")?
        .text()
        .context("Reading book body")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn loads_book_from_disk() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("story-narrator-book-{nonce}.json"));
        fs::write(
            &path,
            r#"{"id": "bk", "title": "T", "pages": [{"number": 1, "text_boxes": []}]}"#,
        )
        .unwrap();
        let book = load_book(path.to_str().unwrap()).unwrap();
        assert_eq!(book.id, "bk");
        assert_eq!(book.page_count(), 2);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_book("/definitely/not/here.json").is_err());
    }
}
