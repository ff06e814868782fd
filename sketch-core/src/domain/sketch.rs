use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::draft::ValidDraft;

/// Author recorded on every comment; the gallery has no accounts.
pub const GUEST_USER: &str = "guest";

const ID_PREFIX: &str = "sketch";
const ID_SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct SketchId(String);

impl SketchId {
    /// `sketch_<unix millis>_<random suffix>`.
    pub fn generate() -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(ID_SUFFIX_LEN)
            .collect();
        Self(format!(
            "{}_{}_{}",
            ID_PREFIX,
            Utc::now().timestamp_millis(),
            suffix
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SketchId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for SketchId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SketchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Self-contained encoded image, usually a `data:image/...;base64,...` URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

/// Header and body of a `data:` URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub media_type: &'a str,
    pub base64: bool,
    pub data: &'a str,
}

impl ImagePayload {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn data_url(&self) -> Option<DataUrl<'_>> {
        let rest = self.0.trim().strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let base64 = header.ends_with(";base64");
        let media_type = header.split(';').next().unwrap_or_default();
        Some(DataUrl {
            media_type,
            base64,
            data,
        })
    }

    /// Size of the image bytes once decoded. Payloads that are not data
    /// URLs are measured as-is.
    pub fn decoded_len(&self) -> usize {
        match self.data_url() {
            Some(DataUrl {
                base64: true, data, ..
            }) => {
                let padding = data.bytes().rev().take_while(|b| *b == b'=').count();
                (data.len() * 3 / 4).saturating_sub(padding)
            }
            Some(DataUrl { data, .. }) => data.len(),
            None => self.0.len(),
        }
    }
}

impl From<String> for ImagePayload {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ImagePayload {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub user: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

impl Comment {
    pub fn from_guest(text: impl Into<String>) -> Self {
        Self {
            user: GUEST_USER.to_owned(),
            text: text.into(),
            date: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[display("Sketch {{ id: {}, title: {}, likes: {} }}", id, title, likes)]
pub struct Sketch {
    pub id: SketchId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub image: ImagePayload,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Sketch {
    pub fn new(id: SketchId, draft: ValidDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            tags: draft.tags,
            image: draft.image,
            created_at: Utc::now(),
            likes: 0,
            comments: Vec::new(),
        }
    }

    /// Copy of this sketch with the editable fields taken from `draft`.
    /// Identity, creation time, likes and comments carry over untouched.
    pub fn revised(&self, draft: ValidDraft) -> Self {
        Self {
            id: self.id.clone(),
            title: draft.title,
            description: draft.description,
            tags: draft.tags,
            image: draft.image,
            created_at: self.created_at,
            likes: self.likes,
            comments: self.comments.clone(),
        }
    }

    /// `needle` must already be lowercased.
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
    }

    pub fn tags_raw(&self) -> String {
        self.tags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_follow_the_prefix_format() {
        let id = SketchId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "sketch");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert_ne!(id, SketchId::generate());
    }

    #[test]
    fn data_url_header_is_split() {
        let image = ImagePayload::from("data:image/png;base64,iVBORw0KGgo=");
        let url = image.data_url().unwrap();

        assert_eq!(url.media_type, "image/png");
        assert!(url.base64);
        assert_eq!(url.data, "iVBORw0KGgo=");
        assert!(ImagePayload::from("blob:abc").data_url().is_none());
    }

    #[test]
    fn decoded_len_accounts_for_padding() {
        assert_eq!(ImagePayload::from("data:image/png;base64,AAAA").decoded_len(), 3);
        assert_eq!(ImagePayload::from("data:image/png;base64,AAA=").decoded_len(), 2);
        assert_eq!(ImagePayload::from("data:image/png;base64,AA==").decoded_len(), 1);
        assert_eq!(ImagePayload::from("data:image/svg+xml,<svg/>").decoded_len(), 6);
    }

    #[test]
    fn tag_match_is_case_insensitive_substring() {
        let sketch = Sketch {
            id: SketchId::from("sketch_1_a"),
            title: "Dog".into(),
            description: "A good dog".into(),
            tags: vec!["Hotdog".into(), "food".into()],
            image: ImagePayload::from("data:image/png;base64,AAAA"),
            created_at: Utc::now(),
            likes: 0,
            comments: Vec::new(),
        };

        assert!(sketch.has_tag_containing("dog"));
        assert!(sketch.has_tag_containing("foo"));
        assert!(!sketch.has_tag_containing("cat"));
        assert_eq!(sketch.tags_raw(), "Hotdog, food");
        assert_eq!(
            sketch.to_string(),
            "Sketch { id: sketch_1_a, title: Dog, likes: 0 }"
        );
    }
}
