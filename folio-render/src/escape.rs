//! HTML escaping for values interpolated into page templates.

use std::fmt::Display;

/// Escape a value for use in HTML text or a quoted attribute.
///
/// Uses a fixed map over the five reserved characters. Any `Display` value is
/// accepted and converted to text first, so the routine never fails.
///
/// # Examples
///
/// ```
/// use folio_render::escape_html;
///
/// assert_eq!(escape_html("Tom & \"Jerry\""), "Tom &amp; &quot;Jerry&quot;");
/// assert_eq!(escape_html(42), "42");
/// ```
pub fn escape_html(value: impl Display) -> String {
    value
        .to_string()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escapes_reserved_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Bob's & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Bob&#039;s &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_html("Hello World"), "Hello World");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_non_string_input() {
        assert_eq!(escape_html(3.5), "3.5");
        assert_eq!(escape_html('<'), "&lt;");
    }

    proptest! {
        #[test]
        fn escaped_output_has_no_reserved_characters(input in any::<String>()) {
            let escaped = escape_html(&input);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
            prop_assert!(!escaped.contains('\''));

            // Every remaining ampersand starts one of the five entities.
            for (idx, _) in escaped.match_indices('&') {
                let rest = &escaped[idx..];
                prop_assert!(
                    ["&amp;", "&lt;", "&gt;", "&quot;", "&#039;"]
                        .iter()
                        .any(|entity| rest.starts_with(entity))
                );
            }
        }
    }
}
