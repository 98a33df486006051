//! Markdown to HTML rendering.

pub mod highlight;

use pulldown_cmark::{html, Event, Options, Parser};

pub use highlight::HighlightTransformer;

/// GitHub-flavoured markdown renderer with highlighted code blocks
pub struct MarkdownRenderer {
    options: Options,
    highlighter: HighlightTransformer,
}

impl MarkdownRenderer {
    pub fn new(highlight_theme: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self {
            options,
            highlighter: HighlightTransformer::new(highlight_theme),
        }
    }

    /// Convert a markdown body to an HTML fragment
    pub fn render(&self, markdown: &str) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options)
            .map(|event| match event {
                // Keep authored line breaks, as GitHub does
                Event::SoftBreak => Event::HardBreak,
                other => other,
            })
            .collect();

        let events = self.highlighter.transform(events);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(highlight::FALLBACK_THEME)
    }
}
