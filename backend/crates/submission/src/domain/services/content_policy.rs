//! Content Policy Filter
//!
//! Publish-time link rules:
//! - relative links, in-page anchors and unparseable hrefs are left alone
//! - links to a blocked host (or any subdomain of one) collapse to their text
//! - for sponsored content, surviving external links get sponsored markers
//!
//! The transformation is idempotent.

use super::anchor::{AnchorAction, LinkTarget, classify_href, rewrite_anchors};
use crate::domain::value_object::locale::Localized;
use crate::domain::value_object::submission_kind::SubmissionKind;

pub const SPONSORED_LINK_REL: &str = "sponsored nofollow noopener noreferrer";

#[derive(Debug, Clone, Default)]
pub struct ContentPolicy {
    blocked_hosts: Vec<String>,
}

impl ContentPolicy {
    /// Entries may be bare hosts (`competitor1.com`), wildcard hosts
    /// (`*.competitor1.com`) or full URLs.
    pub fn new<I, S>(blocked_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hosts: Vec<String> = blocked_hosts
            .into_iter()
            .filter_map(|entry| normalize_host(entry.as_ref()))
            .collect();
        hosts.sort();
        hosts.dedup();
        Self {
            blocked_hosts: hosts,
        }
    }

    pub fn blocked_hosts(&self) -> &[String] {
        &self.blocked_hosts
    }

    pub fn is_blocked_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.blocked_hosts.iter().any(|blocked| {
            host == *blocked
                || host
                    .strip_suffix(blocked.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn apply(&self, html: &str, kind: SubmissionKind) -> String {
        let mark_sponsored = kind.policy().marks_sponsored_links;

        rewrite_anchors(html, |anchor| {
            let Some(href) = anchor.href() else {
                return AnchorAction::Keep;
            };
            match classify_href(href) {
                LinkTarget::Relative | LinkTarget::Opaque => AnchorAction::Keep,
                LinkTarget::External { host } if self.is_blocked_host(&host) => {
                    tracing::debug!(host = %host, "Stripping link to blocked host");
                    AnchorAction::Replace(anchor.text())
                }
                LinkTarget::External { .. } if mark_sponsored => {
                    let mut marked = anchor.clone();
                    marked.set_attr("rel", SPONSORED_LINK_REL);
                    marked.set_attr("target", "_blank");
                    AnchorAction::Replace(marked.render())
                }
                LinkTarget::External { .. } => AnchorAction::Keep,
            }
        })
    }

    pub fn apply_localized(
        &self,
        content: &Localized<String>,
        kind: SubmissionKind,
    ) -> Localized<String> {
        content.map(|_, html| self.apply(html, kind))
    }
}

fn normalize_host(entry: &str) -> Option<String> {
    let entry = entry.trim().to_ascii_lowercase();
    let entry = entry.trim_start_matches("*.").trim_start_matches('.');
    let host = if entry.contains("://") {
        url::Url::parse(entry).ok()?.host_str()?.to_string()
    } else {
        entry.split(['/', ':']).next()?.to_string()
    };
    let host = host.trim_end_matches('.').to_string();
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ContentPolicy {
        ContentPolicy::new(["competitor1.com", " *.Rival.io ", "https://spam.net/path", ""])
    }

    #[test]
    fn test_normalized_hosts() {
        assert_eq!(
            policy().blocked_hosts(),
            &["competitor1.com", "rival.io", "spam.net"]
        );
    }

    #[test]
    fn test_host_matching() {
        let policy = policy();
        assert!(policy.is_blocked_host("competitor1.com"));
        assert!(policy.is_blocked_host("www.competitor1.com"));
        assert!(policy.is_blocked_host("a.b.rival.io"));
        assert!(!policy.is_blocked_host("notcompetitor1.com"));
        assert!(!policy.is_blocked_host("competitor1.com.evil.org"));
    }

    #[test]
    fn test_blocked_link_becomes_text() {
        let html = r#"<p>Try <a href="https://www.competitor1.com/deal">their <em>deal</em></a>.</p>"#;
        let out = policy().apply(html, SubmissionKind::Guest);
        assert_eq!(out, "<p>Try their deal.</p>");
    }

    #[test]
    fn test_backslash_links_to_blocked_host_become_text() {
        for href in [r"/\competitor1.com/deal", r"\\competitor1.com", r"\/competitor1.com"] {
            let html = format!(r#"<p>See <a href="{href}">the deal</a></p>"#);
            for kind in [SubmissionKind::Guest, SubmissionKind::Sponsored] {
                assert_eq!(policy().apply(&html, kind), "<p>See the deal</p>", "{href:?}");
            }
        }
    }

    #[test]
    fn test_guest_external_link_untouched() {
        let html = r#"<a href="https://example.org/">Example</a>"#;
        assert_eq!(policy().apply(html, SubmissionKind::Guest), html);
    }

    #[test]
    fn test_sponsored_external_link_marked() {
        let html = r#"<a href="https://example.org/" rel="dofollow">Example</a>"#;
        let out = policy().apply(html, SubmissionKind::Sponsored);
        assert_eq!(
            out,
            r#"<a href="https://example.org/" rel="sponsored nofollow noopener noreferrer" target="_blank">Example</a>"#
        );
    }

    #[test]
    fn test_relative_and_opaque_untouched() {
        let html = r##"<a href="/about">About</a><a href="#s2">Jump</a><a href="mailto:x@competitor1.com">Mail</a><a href="http://[bad">Bad</a><a name="x">Named</a>"##;
        assert_eq!(policy().apply(html, SubmissionKind::Sponsored), html);
    }

    #[test]
    fn test_idempotent() {
        let html = r#"<p><a href="https://competitor1.com">C</a> <a href='https://ok.org'>ok</a> <a href="/a">a</a></p>"#;
        for kind in [SubmissionKind::Guest, SubmissionKind::Sponsored] {
            let once = policy().apply(html, kind);
            let twice = policy().apply(&once, kind);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_apply_localized() {
        let content = Localized::new(
            Some(r#"<a href="https://competitor1.com">EN</a>"#.to_string()),
            Some(r#"<a href="https://competitor1.com">বাংলা</a>"#.to_string()),
        );
        let out = policy().apply_localized(&content, SubmissionKind::Sponsored);
        assert_eq!(out.en.as_deref(), Some("EN"));
        assert_eq!(out.bn.as_deref(), Some("বাংলা"));
    }
}
