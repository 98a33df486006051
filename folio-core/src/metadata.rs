//! Title, slug, date and excerpt derivation.
//!
//! Every rule here is a chain of fallbacks: frontmatter wins, then the
//! markdown body, then the filename.

use crate::config::{DatePrefixStyle, SectionConfig, SectionKind};
use crate::models::{ContentEntry, DerivedMetadata, Frontmatter};
use crate::slug::slugify;
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Excerpt length, in characters, when cutting body text
pub const EXCERPT_CHARS: usize = 150;

const ELLIPSIS: &str = "...";

static COMPACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})-(.+)$").expect("valid compact date regex")
});
static DASHED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)$").expect("valid dashed date regex")
});
static BRACKETED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d{4})\.(\d{1,2})\.(\d{1,2})\]\s*(.+)$").expect("valid bracketed date regex")
});
static LOOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").expect("valid loose date regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));
static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*`_~]").expect("valid marker regex"));

/// Filename date patterns, in the order `Auto` tries them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrefixPattern {
    Compact,
    Dashed,
    Bracketed,
    Loose,
}

impl PrefixPattern {
    fn for_style(style: DatePrefixStyle) -> &'static [PrefixPattern] {
        match style {
            DatePrefixStyle::Auto => &[
                PrefixPattern::Compact,
                PrefixPattern::Dashed,
                PrefixPattern::Bracketed,
                PrefixPattern::Loose,
            ],
            DatePrefixStyle::Compact => &[PrefixPattern::Compact],
            DatePrefixStyle::Dashed => &[PrefixPattern::Dashed],
            DatePrefixStyle::None => &[],
        }
    }

    fn apply(self, stem: &str) -> Option<DatePrefix> {
        let re: &Regex = match self {
            PrefixPattern::Compact => &COMPACT_RE,
            PrefixPattern::Dashed => &DASHED_RE,
            PrefixPattern::Bracketed => &BRACKETED_RE,
            PrefixPattern::Loose => &LOOSE_RE,
        };
        if self == PrefixPattern::Loose {
            // Anywhere in the stem; the first real calendar date wins
            let date = re
                .captures_iter(stem)
                .find_map(|caps| ymd(&caps[1], &caps[2], &caps[3]))?;
            return Some(DatePrefix { date, strip: None });
        }

        let caps = re.captures(stem)?;
        let date = ymd(&caps[1], &caps[2], &caps[3])?;

        let strip = match self {
            PrefixPattern::Loose => None,
            PrefixPattern::Compact | PrefixPattern::Dashed => {
                let rest = caps.get(4)?;
                Some(StrippedPrefix {
                    prefix: stem[..rest.start()].to_string(),
                    slug: rest.as_str().to_string(),
                })
            }
            PrefixPattern::Bracketed => {
                let rest = caps.get(4)?;
                let slug = slugify(rest.as_str());
                if slug.is_empty() {
                    None
                } else {
                    Some(StrippedPrefix {
                        prefix: stem[..rest.start()].to_string(),
                        slug,
                    })
                }
            }
        };

        Some(DatePrefix { date, strip })
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// The part of a filename stem removed by a date prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedPrefix {
    /// Literal prefix, e.g. `"20260102-"`
    pub prefix: String,
    /// What the slug becomes once the prefix is gone
    pub slug: String,
}

/// A date recovered from a filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePrefix {
    pub date: NaiveDate,

    /// `None` for the loose pattern, which only yields a date
    pub strip: Option<StrippedPrefix>,
}

/// Parse a date out of a filename stem; the first matching pattern wins
///
/// # Examples
///
/// ```
/// use folio_core::config::DatePrefixStyle;
/// use folio_core::metadata::parse_date_prefix;
///
/// let parsed = parse_date_prefix("20260102-hello-world", DatePrefixStyle::Auto).unwrap();
/// assert_eq!(parsed.date.to_string(), "2026-01-02");
/// assert_eq!(parsed.strip.unwrap().slug, "hello-world");
/// ```
pub fn parse_date_prefix(stem: &str, style: DatePrefixStyle) -> Option<DatePrefix> {
    PrefixPattern::for_style(style)
        .iter()
        .find_map(|pattern| pattern.apply(stem))
}

/// Parse a frontmatter date (`2025-01-01` or RFC 3339)
pub fn parse_frontmatter_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading { level: usize, text: &'a str },
    Text,
}

/// Classify body lines; lines inside fenced code blocks are always `Text`
fn classify_lines(body: &str) -> Vec<(Line<'_>, &str)> {
    let mut fence: Option<(char, usize)> = None;
    let mut lines = Vec::new();

    for raw in body.lines() {
        let trimmed = raw.trim_start();
        if let Some((marker, len)) = fence_marker(trimmed) {
            match fence {
                None => fence = Some((marker, len)),
                Some((open, open_len))
                    if open == marker && len >= open_len && trimmed[len..].trim().is_empty() =>
                {
                    fence = None
                }
                Some(_) => {}
            }
            lines.push((Line::Text, raw));
            continue;
        }

        let line = if fence.is_some() {
            Line::Text
        } else if raw.trim().is_empty() {
            Line::Blank
        } else if let Some((level, text)) = atx_heading(raw) {
            Line::Heading { level, text }
        } else {
            Line::Text
        };
        lines.push((line, raw));
    }

    lines
}

fn fence_marker(line: &str) -> Option<(char, usize)> {
    let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some((marker, len))
}

/// Parse an ATX heading starting at column 0
fn atx_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let text = rest.trim();
    // Optional closing sequence, only when separated by whitespace
    let without_closing = text.trim_end_matches('#');
    let text = if without_closing.len() < text.len()
        && (without_closing.is_empty() || without_closing.ends_with([' ', '\t']))
    {
        without_closing.trim_end()
    } else {
        text
    };
    Some((level, text))
}

fn is_title(line: &Line<'_>) -> bool {
    matches!(line, Line::Heading { level: 1, text } if !text.is_empty())
}

/// Text of the first non-empty level-1 heading
pub fn first_heading(body: &str) -> Option<&str> {
    classify_lines(body)
        .into_iter()
        .find(|(line, _)| is_title(line))
        .and_then(|(line, _)| match line {
            Line::Heading { text, .. } => Some(text),
            _ => None,
        })
}

/// The paragraph right after the title heading, ending at a blank line or heading
fn paragraph_after_title(body: &str) -> Option<String> {
    let lines = classify_lines(body);
    let title_idx = lines.iter().position(|(line, _)| is_title(line))?;

    let paragraph: Vec<&str> = lines[title_idx + 1..]
        .iter()
        .skip_while(|(line, _)| *line == Line::Blank)
        .take_while(|(line, _)| *line == Line::Text)
        .map(|(_, raw)| *raw)
        .collect();

    if paragraph.is_empty() {
        None
    } else {
        Some(paragraph.join("\n"))
    }
}

/// Body with one leading heading line (if any) removed
fn strip_leading_heading(body: &str) -> &str {
    let trimmed = body.trim_start();
    let first_line = trimmed.lines().next().unwrap_or_default();
    if atx_heading(first_line).is_some() {
        trimmed[first_line.len()..].trim_start()
    } else {
        trimmed
    }
}

/// Unwrap links, strip markdown markers, and collapse to one line
pub fn clean_excerpt_text(text: &str) -> String {
    let unlinked = LINK_RE.replace_all(text, "$1");
    let unmarked = MARKER_RE.replace_all(&unlinked, "");
    unmarked.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn with_ellipsis(text: &str) -> String {
    format!("{}{}", truncate_chars(text, EXCERPT_CHARS).trim_end(), ELLIPSIS)
}

/// Derive an excerpt from the body alone; never empty
pub fn body_excerpt(body: &str, kind: SectionKind) -> String {
    if let Some(paragraph) = paragraph_after_title(body) {
        let cleaned = clean_excerpt_text(&paragraph);
        if !cleaned.is_empty() {
            return match kind {
                SectionKind::Blog => with_ellipsis(&cleaned),
                SectionKind::Projects => cleaned,
            };
        }
    }

    let mut text = clean_excerpt_text(strip_leading_heading(body));
    if text.is_empty() {
        // Body is nothing but a heading
        text = clean_excerpt_text(body);
    }
    with_ellipsis(&text)
}

fn frontmatter_excerpt(fm: &Frontmatter, kind: SectionKind) -> Option<&str> {
    match kind {
        SectionKind::Projects => fm.tldr().or_else(|| fm.excerpt()),
        SectionKind::Blog => fm.excerpt().or_else(|| fm.tldr()),
    }
}

/// Computes [`DerivedMetadata`] for the entries of one section
#[derive(Debug, Clone, Copy)]
pub struct MetadataExtractor {
    kind: SectionKind,
    date_prefix: DatePrefixStyle,
    today: NaiveDate,
}

impl MetadataExtractor {
    /// `today` is the build date, used for undated blog entries
    pub fn new(kind: SectionKind, date_prefix: DatePrefixStyle, today: NaiveDate) -> Self {
        Self {
            kind,
            date_prefix,
            today,
        }
    }

    pub fn for_section(section: &SectionConfig, today: NaiveDate) -> Self {
        Self::new(section.kind, section.date_prefix(), today)
    }

    pub fn extract(&self, entry: &ContentEntry) -> DerivedMetadata {
        let fm = &entry.frontmatter;
        let stem = entry.stem.as_str();
        let prefix = parse_date_prefix(stem, self.date_prefix);
        let stripped = prefix.as_ref().and_then(|p| p.strip.as_ref());

        let mut title = fm
            .title()
            .or_else(|| first_heading(&entry.body))
            .unwrap_or(stem)
            .to_string();
        if let Some(strip) = stripped {
            if let Some(rest) = title.strip_prefix(strip.prefix.as_str()) {
                let rest = rest.trim();
                if !rest.is_empty() {
                    title = rest.to_string();
                }
            }
        }

        let slug = fm
            .slug()
            .map(str::to_string)
            .or_else(|| stripped.map(|s| s.slug.clone()))
            .unwrap_or_else(|| stem.to_string());

        let date = prefix
            .as_ref()
            .map(|p| p.date)
            .or_else(|| fm.date().and_then(parse_frontmatter_date))
            .or_else(|| self.kind.defaults_date().then_some(self.today));

        let excerpt = frontmatter_excerpt(fm, self.kind)
            .map(str::to_string)
            .unwrap_or_else(|| body_excerpt(&entry.body, self.kind));

        DerivedMetadata {
            title,
            slug,
            date,
            excerpt,
            filename: format!("{}.html", stem),
        }
    }
}
