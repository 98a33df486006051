//! Askama template definitions.

use crate::escape::escape_html;
use askama::Template;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Giscus comment thread settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentsWidget {
    pub repo: String,
    pub repo_id: String,
    pub category: String,
    pub category_id: String,

    #[serde(default = "default_comments_theme")]
    pub theme: String,
}

fn default_comments_theme() -> String {
    String::from("preferred_color_scheme")
}

/// Clap button settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClapsWidget {
    /// Endpoint the widget posts claps to
    pub endpoint: String,

    /// Script that mounts the widget
    pub script: String,
}

/// Optional interactive widgets embedded in a page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Widgets {
    #[serde(default)]
    pub comments: Option<CommentsWidget>,

    #[serde(default)]
    pub claps: Option<ClapsWidget>,
}

/// Inputs for one assembled page.
///
/// `content_html` and `stylesheet` are trusted and inserted verbatim; every
/// other field is escaped before it reaches the template.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub content_html: &'a str,
    pub stylesheet: &'a str,
    pub home_href: &'a str,
    pub feed_href: Option<&'a str>,
    pub widgets: &'a Widgets,
}

struct CommentsEmbed {
    repo: String,
    repo_id: String,
    category: String,
    category_id: String,
    theme: String,
}

struct ClapsEmbed {
    endpoint: String,
    script: String,
}

/// Standalone entry page
#[derive(Template)]
#[template(path = "page.html", escape = "none")]
struct PageTemplate {
    // Escaped scalars
    title: String,
    slug: String,
    description: Option<String>,
    home_href: String,
    feed_href: Option<String>,

    // Trusted markup
    stylesheet: String,
    content: String,

    comments: Option<CommentsEmbed>,
    claps: Option<ClapsEmbed>,
}

impl PageTemplate {
    fn from_page(page: &Page<'_>) -> Self {
        Self {
            title: escape_html(page.title),
            slug: escape_html(page.slug),
            description: page.description.map(escape_html),
            home_href: escape_html(page.home_href),
            feed_href: page.feed_href.map(escape_html),
            stylesheet: page.stylesheet.to_string(),
            content: page.content_html.to_string(),
            comments: page.widgets.comments.as_ref().map(|c| CommentsEmbed {
                repo: escape_html(&c.repo),
                repo_id: escape_html(&c.repo_id),
                category: escape_html(&c.category),
                category_id: escape_html(&c.category_id),
                theme: escape_html(&c.theme),
            }),
            claps: page.widgets.claps.as_ref().map(|c| ClapsEmbed {
                endpoint: escape_html(&c.endpoint),
                script: escape_html(&c.script),
            }),
        }
    }
}

/// Wrap rendered body HTML into a complete HTML document
pub fn assemble_page(page: &Page<'_>) -> Result<String, RenderError> {
    Ok(PageTemplate::from_page(page).render()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page<'a>(title: &'a str, widgets: &'a Widgets) -> Page<'a> {
        Page {
            title,
            slug: "hello-world",
            description: None,
            content_html: "<h1>Hello</h1>\n<p>Body &amp; more</p>",
            stylesheet: "body { color: #222; }",
            home_href: "/",
            feed_href: None,
            widgets,
        }
    }

    #[test]
    fn test_document_shell() {
        let widgets = Widgets::default();
        let html = assemble_page(&page("Hello", &widgets)).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains("body { color: #222; }"));
        assert!(html.contains(r#"<a href="/">← Back to home</a>"#));
        assert!(html.contains("<p>Body &amp; more</p>"));
        assert!(!html.contains("giscus"));
        assert!(!html.contains("clap-widget"));
        assert!(!html.contains("application/rss+xml"));
    }

    #[test]
    fn test_title_is_escaped() {
        let widgets = Widgets::default();
        let html = assemble_page(&page(r#"<script>alert("x")</script> & 'y'"#, &widgets)).unwrap();

        assert!(html.contains(
            "<title>&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#039;y&#039;</title>"
        ));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn test_description_and_feed_link() {
        let widgets = Widgets::default();
        let mut p = page("Hello", &widgets);
        p.description = Some("Fish & \"chips\"");
        p.feed_href = Some("/feed.xml");
        let html = assemble_page(&p).unwrap();

        assert!(html.contains(r#"<meta name="description" content="Fish &amp; &quot;chips&quot;">"#));
        assert!(html.contains(r#"href="/feed.xml""#));
    }

    #[test]
    fn test_widgets_are_keyed_by_slug() {
        let widgets = Widgets {
            comments: Some(CommentsWidget {
                repo: "me/site".into(),
                repo_id: "R_1".into(),
                category: "Posts & Notes".into(),
                category_id: "DIC_1".into(),
                theme: default_comments_theme(),
            }),
            claps: Some(ClapsWidget {
                endpoint: "https://claps.example.com/api".into(),
                script: "/claps.js".into(),
            }),
        };
        let html = assemble_page(&page("Hello", &widgets)).unwrap();

        assert!(html.contains("https://giscus.app/client.js"));
        assert!(html.contains(r#"data-repo="me/site""#));
        assert!(html.contains(r#"data-category="Posts &amp; Notes""#));
        assert!(html.contains(r#"data-term="hello-world""#));
        assert!(html.contains(r#"data-slug="hello-world""#));
        assert!(html.contains(r#"data-endpoint="https://claps.example.com/api""#));
        assert!(html.contains(r#"<script src="/claps.js" defer></script>"#));
    }
}
