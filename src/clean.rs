//! HTML-to-plain-text cleaning for article paragraphs.
//!
//! The Forbes detail API returns paragraph text with inline markup
//! (`<b>`, `<a href=...>`, occasionally double-encoded entities). This
//! module reduces such fragments to plain text for the output dataset.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

/// Leftover entity tokens that survive HTML parsing, e.g. a `&nbsp;`
/// that arrived double-encoded as `&amp;nbsp;`.
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-zA-Z]+;").unwrap());

/// Strip markup and tidy whitespace from one raw paragraph.
///
/// Steps, in order:
/// 1. Parse as an HTML fragment and keep only the text nodes. Malformed
///    markup degrades to best-effort extraction; this never fails.
/// 2. Remove remaining `&letters;` entity tokens.
/// 3. Trim leading/trailing whitespace.
/// 4. Collapse double spaces in a single left-to-right pass.
///
/// The double-space collapse is intentionally non-recursive: a run of
/// three spaces comes out as two. Runs of 3+ spaces stay partially
/// collapsed; downstream consumers expect exactly this.
pub fn clean_text(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    let text = ENTITY_RE.replace_all(&text, "");
    text.trim().replace("  ", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(clean_text("<b>Hi</b>"), "Hi");
        assert_eq!(
            clean_text("<p>Quarterly <a href=\"/x\">results</a> are in</p>"),
            "Quarterly results are in"
        );
    }

    #[test]
    fn test_strips_double_encoded_entities() {
        // "&amp;nbsp;" decodes to the literal token "&nbsp;" which the
        // regex pass then removes.
        assert_eq!(clean_text("price&amp;nbsp;rise"), "pricerise");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(clean_text("  <p>hello</p>  "), "hello");
    }

    #[test]
    fn test_double_space_collapse_is_single_pass() {
        assert_eq!(clean_text("a  b"), "a b");
        // Three spaces collapse to two, not one: the pass is not
        // recursive and must stay that way.
        assert_eq!(clean_text("a   b"), "a  b");
        assert_eq!(clean_text("a    b"), "a  b");
    }

    #[test]
    fn test_no_markup_remains() {
        let cleaned = clean_text("<div><b>Top&amp;gt; story</b> &amp; more <br/></div>");
        assert!(!cleaned.contains('<'));
        assert!(!cleaned.contains('>'));
        assert!(!ENTITY_RE.is_match(&cleaned));
        assert_eq!(cleaned, cleaned.trim());
    }

    #[test]
    fn test_malformed_html_degrades_gracefully() {
        assert_eq!(clean_text("<b>unclosed"), "unclosed");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(clean_text("Уже всё понятно"), "Уже всё понятно");
    }
}
