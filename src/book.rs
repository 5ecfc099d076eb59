//! Story book model.
//!
//! Books arrive from the content service as a single JSON document and stay
//! immutable for the whole reading session. A synthetic closing page is
//! appended after the real content so narration has somewhere to land when
//! the story runs out.

use serde::Deserialize;

pub const END_PAGE_TITLE: &str = "The End";
pub const END_PAGE_FAREWELL: &str = "Thanks for reading along!";

/// A positioned, narratable span of text on a page. `text` is raw story text
/// and may carry bracketed delivery cues.
#[derive(Debug, Clone, Deserialize)]
pub struct TextBox {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub order: usize,
}

/// Ordered text boxes plus non-narrated background media.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub number: usize,
    #[serde(default)]
    pub text_boxes: Vec<TextBox>,
    #[serde(default)]
    pub background_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub pages: Vec<Page>,
}

impl Book {
    /// Parse the content service's book document and append the closing page.
    /// Text boxes are sorted into their narration order per page.
    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        let mut book: Book = serde_json::from_str(data)?;
        for page in &mut book.pages {
            page.text_boxes.sort_by_key(|text_box| text_box.order);
        }
        book.append_end_page();
        Ok(book)
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_last_page(&self, index: usize) -> bool {
        index + 1 >= self.pages.len()
    }

    pub fn text_box_count(&self, page_index: usize) -> usize {
        self.page(page_index)
            .map(|page| page.text_boxes.len())
            .unwrap_or(0)
    }

    pub fn text_box(&self, page_index: usize, box_index: usize) -> Option<&TextBox> {
        self.page(page_index)?.text_boxes.get(box_index)
    }

    fn append_end_page(&mut self) {
        let number = self.pages.last().map(|page| page.number + 1).unwrap_or(1);
        self.pages.push(Page {
            number,
            text_boxes: vec![
                TextBox {
                    id: format!("{}-end-title", self.id),
                    text: END_PAGE_TITLE.to_string(),
                    x: 0.5,
                    y: 0.4,
                    order: 0,
                },
                TextBox {
                    id: format!("{}-end-farewell", self.id),
                    text: END_PAGE_FAREWELL.to_string(),
                    x: 0.5,
                    y: 0.6,
                    order: 1,
                },
            ],
            background_url: None,
        });
    }
}
