//! Ammonia-backed HTML sanitizer
//!
//! Allowlist cleaning for rich text, then a pass over anchors that marks
//! absolute http(s) links as external. Relative links are left as written.

use crate::domain::gateway::HtmlSanitizer;
use crate::domain::services::anchor::{
    AnchorAction, LinkTarget, classify_href, rewrite_anchors, strip_tags,
};
use ammonia::Builder;

pub const EXTERNAL_LINK_REL: &str = "noopener noreferrer nofollow";

pub struct AmmoniaSanitizer {
    builder: Builder<'static>,
}

impl Default for AmmoniaSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl AmmoniaSanitizer {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .link_rel(None)
            .add_tags(["figure", "figcaption", "picture", "source", "mark"])
            .add_tag_attributes("img", ["loading", "width", "height"])
            .add_tag_attributes("source", ["srcset", "type", "media"])
            .add_generic_attributes(["lang", "dir"])
            .url_schemes(["http", "https", "mailto"].into_iter().collect());
        Self { builder }
    }

    fn mark_external_links(html: &str) -> String {
        rewrite_anchors(html, |anchor| match anchor.href().map(classify_href) {
            Some(LinkTarget::External { .. }) => {
                let mut marked = anchor.clone();
                marked.set_attr("rel", EXTERNAL_LINK_REL);
                marked.set_attr("target", "_blank");
                AnchorAction::Replace(marked.render())
            }
            _ => AnchorAction::Keep,
        })
    }
}

impl HtmlSanitizer for AmmoniaSanitizer {
    fn clean(&self, html: &str) -> String {
        let cleaned = self.builder.clean(html).to_string();
        Self::mark_external_links(&cleaned)
    }

    fn plain_text(&self, input: &str) -> String {
        strip_tags(input)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::content_policy::ContentPolicy;
    use crate::domain::value_object::submission_kind::SubmissionKind;

    #[test]
    fn test_strips_scripts_and_handlers() {
        let sanitizer = AmmoniaSanitizer::new();
        let out = sanitizer.clean(r#"<p onclick="x()">Hi<script>alert(1)</script></p>"#);
        assert_eq!(out, "<p>Hi</p>");
    }

    #[test]
    fn test_external_links_marked() {
        let sanitizer = AmmoniaSanitizer::new();
        let out = sanitizer.clean(r#"<a href="https://example.org/x">x</a>"#);
        assert!(out.contains(r#"rel="noopener noreferrer nofollow""#));
        assert!(out.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_relative_links_untouched() {
        let sanitizer = AmmoniaSanitizer::new();
        let out = sanitizer.clean(r#"<a href="/about">About</a>"#);
        assert_eq!(out, r#"<a href="/about">About</a>"#);
    }

    #[test]
    fn test_backslash_links_treated_as_external() {
        let sanitizer = AmmoniaSanitizer::new();
        let policy = ContentPolicy::new(["competitor1.com"]);
        for href in [r"/\competitor1.com/deal", r"\\competitor1.com", r"\/competitor1.com"] {
            let cleaned = sanitizer.clean(&format!(r#"<p><a href="{href}">deal</a></p>"#));
            assert!(cleaned.contains(r#"target="_blank""#), "{cleaned}");
            assert_eq!(policy.apply(&cleaned, SubmissionKind::Guest), "<p>deal</p>");
        }
    }

    #[test]
    fn test_javascript_urls_removed() {
        let sanitizer = AmmoniaSanitizer::new();
        let out = sanitizer.clean(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!out.contains("javascript"));
    }

    #[test]
    fn test_clean_is_stable() {
        let sanitizer = AmmoniaSanitizer::new();
        let once = sanitizer.clean(r#"<p>A <a href="https://example.org">b</a> &amp; c</p>"#);
        assert_eq!(sanitizer.clean(&once), once);
    }

    #[test]
    fn test_plain_text() {
        let sanitizer = AmmoniaSanitizer::new();
        assert_eq!(
            sanitizer.plain_text("  <b>Monsoon</b>\n in   Sylhet "),
            "Monsoon in Sylhet"
        );
    }
}
