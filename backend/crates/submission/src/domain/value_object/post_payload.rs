//! Post Payload Value Object
//!
//! The draft post carried by a submission. English fields are mandatory.
//! Bangla is all-or-nothing: once any Bangla field is given, title, excerpt
//! and content must all be present.

use super::locale::{Locale, Localized};
use super::submitter_profile::is_http_url;
use crate::error::{SubmissionError, SubmissionResult};
use serde::{Deserialize, Serialize};

const TITLE_MAX_CHARS: usize = 200;
const EXCERPT_MAX_CHARS: usize = 500;
const MAX_TAGS: usize = 10;
const TAG_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[serde(default)]
    pub title: Localized<String>,
    #[serde(default)]
    pub excerpt: Localized<String>,
    #[serde(default)]
    pub content: Localized<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
}

/// Replacement text for a revision; absent locales are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRevision {
    #[serde(default)]
    pub title: Localized<String>,
    #[serde(default)]
    pub excerpt: Localized<String>,
    #[serde(default)]
    pub content: Localized<String>,
}

impl ContentRevision {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.excerpt.is_empty() && self.content.is_empty()
    }
}

impl PostPayload {
    /// Trim tags, drop blank locale values and duplicate tags
    pub fn normalized(self) -> Self {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                tags.push(tag);
            }
        }
        Self {
            title: self.title.normalized(),
            excerpt: self.excerpt.normalized(),
            content: self.content.normalized(),
            category: self.category.trim().to_string(),
            tags,
            featured_image: self
                .featured_image
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn validate(&self, min_content_chars: usize) -> SubmissionResult<()> {
        let mut problems = Vec::new();

        for locale in Locale::ALL {
            let title = self.title.text(locale);
            let excerpt = self.excerpt.text(locale);
            let content = self.content.text(locale);

            let any = title.is_some() || excerpt.is_some() || content.is_some();
            if !locale.is_primary() && !any {
                continue;
            }

            for (field, value) in [("title", title), ("excerpt", excerpt), ("content", content)] {
                if value.is_none() {
                    problems.push(format!("{field}.{locale} is required"));
                }
            }

            if let Some(title) = title
                && title.trim().chars().count() > TITLE_MAX_CHARS
            {
                problems.push(format!(
                    "title.{locale} must be at most {TITLE_MAX_CHARS} characters"
                ));
            }
            if let Some(excerpt) = excerpt
                && excerpt.trim().chars().count() > EXCERPT_MAX_CHARS
            {
                problems.push(format!(
                    "excerpt.{locale} must be at most {EXCERPT_MAX_CHARS} characters"
                ));
            }
            if let Some(content) = content {
                let length = content.trim().chars().count();
                if length < min_content_chars {
                    problems.push(format!(
                        "content.{locale} is below the minimum length of {min_content_chars} characters (got {length})"
                    ));
                }
            }
        }

        if self.category.is_empty() {
            problems.push("category is required".to_string());
        }

        if self.tags.len() > MAX_TAGS {
            problems.push(format!("at most {MAX_TAGS} tags are allowed"));
        }
        if self.tags.iter().any(|t| t.chars().count() > TAG_MAX_CHARS) {
            problems.push(format!("tags must be at most {TAG_MAX_CHARS} characters"));
        }

        if let Some(image) = &self.featured_image
            && !is_http_url(image)
        {
            problems.push("featuredImage must be an absolute http(s) URL".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SubmissionError::Validation(problems.join("; ")))
        }
    }

    /// Overwrite the locales a revision supplies
    pub fn apply_revision(&mut self, revision: ContentRevision) {
        let ContentRevision {
            title,
            excerpt,
            content,
        } = revision;
        for (target, update) in [
            (&mut self.title, title.normalized()),
            (&mut self.excerpt, excerpt.normalized()),
            (&mut self.content, content.normalized()),
        ] {
            for locale in Locale::ALL {
                if let Some(value) = update.get(locale) {
                    target.set(locale, Some(value.clone()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english_payload(content_chars: usize) -> PostPayload {
        PostPayload {
            title: Localized::new(Some("Monsoon in Sylhet".to_string()), None),
            excerpt: Localized::new(Some("Tea gardens after rain".to_string()), None),
            content: Localized::new(Some("a".repeat(content_chars)), None),
            category: "travel".to_string(),
            tags: vec!["tea".to_string()],
            featured_image: None,
        }
    }

    #[test]
    fn test_minimum_content_length() {
        let err = english_payload(799).validate(800).unwrap_err();
        assert!(err.to_string().contains("minimum length"));
        assert!(english_payload(800).validate(800).is_ok());
    }

    #[test]
    fn test_length_counts_trimmed_characters() {
        let mut payload = english_payload(0);
        payload.content.en = Some(format!("   {}   ", "ক".repeat(800)));
        assert!(payload.validate(800).is_ok());

        payload.content.en = Some(format!("   {}   ", "ক".repeat(799)));
        assert!(payload.validate(800).is_err());
    }

    #[test]
    fn test_english_is_mandatory() {
        let mut payload = english_payload(800);
        payload.title.en = None;
        let err = payload.validate(800).unwrap_err();
        assert!(err.to_string().contains("title.en is required"));
    }

    #[test]
    fn test_partial_bangla_is_rejected() {
        let mut payload = english_payload(800);
        payload.title.bn = Some("সিলেটে বর্ষা".to_string());
        let message = payload.validate(800).unwrap_err().to_string();
        assert!(message.contains("excerpt.bn is required"));
        assert!(message.contains("content.bn is required"));
    }

    #[test]
    fn test_bangla_content_length_applies() {
        let mut payload = english_payload(800);
        payload.title.bn = Some("সিলেটে বর্ষা".to_string());
        payload.excerpt.bn = Some("বৃষ্টির পর চা বাগান".to_string());
        payload.content.bn = Some("ক".repeat(10));
        let message = payload.validate(800).unwrap_err().to_string();
        assert!(message.contains("content.bn"));
        assert!(message.contains("minimum length"));
    }

    #[test]
    fn test_normalized_dedupes_tags() {
        let mut payload = english_payload(800);
        payload.tags = vec![" Tea ".into(), "tea".into(), "".into(), "Sylhet".into()];
        payload.title.bn = Some("   ".into());
        let payload = payload.normalized();
        assert_eq!(payload.tags, vec!["Tea".to_string(), "Sylhet".to_string()]);
        assert_eq!(payload.title.bn, None);
    }

    #[test]
    fn test_apply_revision_keeps_missing_locales() {
        let mut payload = english_payload(800);
        payload.apply_revision(ContentRevision {
            content: Localized::new(Some("b".repeat(900)), None),
            ..Default::default()
        });
        assert_eq!(payload.content.en.as_deref().map(str::len), Some(900));
        assert_eq!(payload.title.text(Locale::En), Some("Monsoon in Sylhet"));
    }
}
