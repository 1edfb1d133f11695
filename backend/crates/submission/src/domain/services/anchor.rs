//! Inline anchor scanning
//!
//! A small regex scanner over `<a ...>...</a>` markup. It is shared by the
//! publish-time content policy and the storage-time sanitizer, both of
//! which only need to look at links and leave the rest of the HTML alone.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("anchor pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

static SITE_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://self.invalid/").expect("base url is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub attrs: Vec<(String, Option<String>)>,
    pub inner: String,
}

/// What to do with a scanned anchor
pub enum AnchorAction {
    Keep,
    Replace(String),
}

/// Where an `href` points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Path, query or fragment on this site
    Relative,
    /// Absolute http(s) link with a host
    External { host: String },
    /// Anything that did not parse into a host; never rewritten
    Opaque,
}

impl Anchor {
    fn parse(attrs: &str, inner: &str) -> Self {
        let attrs = ATTR_RE
            .captures_iter(attrs)
            .map(|c| {
                let name = c[1].to_ascii_lowercase();
                let value = c
                    .get(2)
                    .or_else(|| c.get(3))
                    .or_else(|| c.get(4))
                    .map(|m| m.as_str().to_string());
                (name, value)
            })
            .collect();
        Self {
            attrs,
            inner: inner.to_string(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn href(&self) -> Option<&str> {
        self.attr("href")
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    /// Replace any existing value and move the attribute to the end
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.remove_attr(name);
        self.attrs.push((name.to_string(), Some(value.to_string())));
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<a");
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }
        out.push('>');
        out.push_str(&self.inner);
        out.push_str("</a>");
        out
    }

    /// Display text with any nested markup removed
    pub fn text(&self) -> String {
        strip_tags(&self.inner)
    }
}

pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Run `f` over every anchor; unchanged anchors keep their original bytes
pub fn rewrite_anchors(html: &str, mut f: impl FnMut(&Anchor) -> AnchorAction) -> String {
    ANCHOR_RE
        .replace_all(html, |caps: &Captures<'_>| {
            let anchor = Anchor::parse(&caps[1], &caps[2]);
            match f(&anchor) {
                AnchorAction::Keep => caps[0].to_string(),
                AnchorAction::Replace(replacement) => replacement,
            }
        })
        .into_owned()
}

pub fn classify_href(href: &str) -> LinkTarget {
    let href = href.trim().replace("&amp;", "&");
    if href.is_empty() {
        return LinkTarget::Relative;
    }

    let url = match Url::parse(&href) {
        Ok(url) => url,
        // Browsers resolve `//host`, `/\host` and `\\host` against the page,
        // so relative input only stays on-site if the join keeps the base host.
        Err(url::ParseError::RelativeUrlWithoutBase) => match SITE_BASE.join(&href) {
            Ok(url) if url.host_str() == SITE_BASE.host_str() => return LinkTarget::Relative,
            Ok(url) => url,
            Err(_) => return LinkTarget::Opaque,
        },
        Err(_) => return LinkTarget::Opaque,
    };

    match (url.scheme(), url.host_str()) {
        ("http" | "https", Some(host)) => LinkTarget::External {
            host: host.trim_end_matches('.').to_ascii_lowercase(),
        },
        _ => LinkTarget::Opaque,
    }
}
