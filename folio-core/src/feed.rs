//! RSS 2.0 feed generation.

use crate::config::Config;
use crate::models::{DerivedMetadata, FeedItem};
use crate::urls::absolutize_urls;
use chrono::NaiveDate;

/// Collects feed items across sections and renders the RSS document
#[derive(Debug, Clone)]
pub struct FeedBuilder {
    title: String,
    description: String,
    site_base: String,
    feed_path: String,
    items: Vec<FeedItem>,
}

impl FeedBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            site_base: config.site_base(),
            feed_path: config.feed.path.clone(),
            items: Vec::new(),
        }
    }

    /// Add a rendered entry of `section`
    pub fn push_entry(&mut self, section: &str, metadata: &DerivedMetadata, html: &str) {
        let item = feed_item(section, metadata, html, &self.site_base);
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Render the feed, newest items first
    pub fn render(&self) -> String {
        let mut items: Vec<&FeedItem> = self.items.iter().collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));

        let mut body = String::new();
        for item in items {
            body.push_str("    <item>\n");
            body.push_str(&format!("      <title>{}</title>\n", escape_xml(&item.title)));
            body.push_str(&format!("      <link>{}</link>\n", escape_xml(&item.link)));
            body.push_str(&format!(
                "      <description>{}</description>\n",
                escape_xml(&item.excerpt)
            ));
            body.push_str(&format!(
                "      <content:encoded>{}</content:encoded>\n",
                cdata(&item.absolute_html)
            ));
            if let Some(pub_date) = item.date.as_ref().and_then(naive_to_rfc2822) {
                body.push_str(&format!("      <pubDate>{}</pubDate>\n", pub_date));
            }
            body.push_str(&format!(
                "      <guid isPermaLink=\"true\">{}</guid>\n",
                escape_xml(&item.link)
            ));
            body.push_str("    </item>\n");
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{}</title>
    <link>{}</link>
    <description>{}</description>
    <atom:link href="{}" rel="self" type="application/rss+xml"/>
{}  </channel>
</rss>
"#,
            escape_xml(&self.title),
            escape_xml(&absolute_url(&self.site_base, "")),
            escape_xml(&self.description),
            escape_xml(&absolute_url(&self.site_base, &self.feed_path)),
            body
        )
    }
}

/// Build the feed item for a rendered entry
pub fn feed_item(
    section: &str,
    metadata: &DerivedMetadata,
    html: &str,
    site_base: &str,
) -> FeedItem {
    FeedItem {
        title: metadata.title.clone(),
        link: absolute_url(
            site_base,
            &encode_path(&format!("{}/{}", section, metadata.filename)),
        ),
        absolute_html: absolutize_urls(html, site_base, section),
        excerpt: metadata.excerpt.clone(),
        date: metadata.date,
    }
}

fn absolute_url(site_base: &str, rel: &str) -> String {
    let root = site_base.trim_end_matches('/');
    let rel_clean = rel.trim_start_matches('/');
    if rel_clean.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, rel_clean)
    }
}

/// Percent-encode each `/`-separated segment of a relative path
fn encode_path(rel: &str) -> String {
    rel.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Wrap in CDATA; a literal `]]>` is split across two sections
fn cdata(content: &str) -> String {
    format!("<![CDATA[{}]]>", content.replace("]]>", "]]]]><![CDATA[>"))
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn naive_to_rfc2822(date: &NaiveDate) -> Option<String> {
    let datetime = date.and_hms_opt(0, 0, 0)?;
    Some(datetime.and_utc().to_rfc2822())
}
