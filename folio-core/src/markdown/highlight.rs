//! Code syntax highlighting using syntect.

use folio_render::escape_html;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Theme used when the configured one is not bundled with syntect
pub const FALLBACK_THEME: &str = "InspiredGitHub";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// Transformer for syntax highlighting code blocks
pub struct HighlightTransformer {
    /// `None` only if syntect ships no themes at all; blocks then render plain
    theme: Option<&'static Theme>,
}

impl HighlightTransformer {
    pub fn new(theme_name: &str) -> Self {
        let themes = &theme_set().themes;
        let theme = themes.get(theme_name).or_else(|| {
            tracing::warn!(
                "Unknown highlight theme '{}', using {}",
                theme_name,
                FALLBACK_THEME
            );
            themes
                .get(FALLBACK_THEME)
                .or_else(|| themes.values().next())
        });
        Self { theme }
    }

    /// Replace every code block with highlighted HTML
    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut code_block: Option<Option<String>> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => language_token(&info).map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(lang);
                    code_content.clear();
                }
                Event::Text(text) if code_block.is_some() => {
                    code_content.push_str(text.as_ref());
                }
                Event::End(TagEnd::CodeBlock) if code_block.is_some() => {
                    let lang = code_block.take().flatten();
                    let html = self.highlight_code(&code_content, lang.as_deref());
                    result.push(Event::Html(CowStr::Boxed(html.into_boxed_str())));
                }
                other => result.push(other),
            }
        }

        result
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let Some(theme) = self.theme else {
            return plain_block(code, lang);
        };
        let Some(syntax) = detect_syntax(code, lang) else {
            tracing::warn!(
                "Could not detect a language for code block{}; rendering it plain",
                lang.map(|l| format!(" tagged '{}'", l)).unwrap_or_default()
            );
            return plain_block(code, lang);
        };

        match highlighted_html_for_string(code, syntax_set(), syntax, theme) {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!("Highlighting failed for {} block: {}", syntax.name, err);
                plain_block(code, lang)
            }
        }
    }
}

/// First word of a fence info string (`rust,ignore` -> `rust`)
fn language_token(info: &str) -> Option<&str> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .find(|token| !token.is_empty())
}

/// Tagged grammar first, then first-line detection
fn detect_syntax(code: &str, lang: Option<&str>) -> Option<&'static SyntaxReference> {
    let ss = syntax_set();
    lang.and_then(|lang| {
        ss.find_syntax_by_token(lang)
            .or_else(|| ss.find_syntax_by_extension(lang))
    })
    .or_else(|| {
        let first_line = code.lines().next()?;
        ss.find_syntax_by_first_line(first_line)
    })
}

fn plain_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(lang),
            escape_html(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", escape_html(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_token() {
        assert_eq!(language_token("rust"), Some("rust"));
        assert_eq!(language_token("rust,ignore"), Some("rust"));
        assert_eq!(language_token("  python title=x"), Some("python"));
        assert_eq!(language_token(""), None);
    }

    #[test]
    fn test_tagged_block_is_highlighted() {
        let transformer = HighlightTransformer::new(FALLBACK_THEME);
        let html = transformer.highlight_code("fn main() {}\n", Some("rust"));
        assert!(html.starts_with("<pre style="));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_first_line_detection() {
        assert!(detect_syntax("#!/bin/bash\necho hi\n", None).is_some());
        assert!(detect_syntax("#!/bin/bash\necho hi\n", Some("nosuchlang")).is_some());
    }

    #[test]
    fn test_undetectable_block_is_plain_and_escaped() {
        let transformer = HighlightTransformer::new(FALLBACK_THEME);
        let html = transformer.highlight_code("a < b\n", Some("nosuchlang"));
        assert_eq!(
            html,
            "<pre><code class=\"language-nosuchlang\">a &lt; b\n</code></pre>\n"
        );

        let html = transformer.highlight_code("plain words\n", None);
        assert_eq!(html, "<pre><code>plain words\n</code></pre>\n");

        let html = transformer.highlight_code("say 'hi' & \"bye\"\n", Some("nosuchlang"));
        assert!(html.contains("say &#039;hi&#039; &amp; &quot;bye&quot;"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let transformer = HighlightTransformer::new("no-such-theme");
        let html = transformer.highlight_code("let x = 1;\n", Some("rust"));
        assert!(html.starts_with("<pre style="));
    }
}
