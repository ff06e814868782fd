use std::fmt;

use thiserror::Error;

use crate::domain::sketch::{ImagePayload, Sketch};

pub const TITLE_MIN_CHARS: usize = 2;
pub const DESCRIPTION_MIN_CHARS: usize = 5;
/// Largest accepted image once decoded (5 MiB).
pub const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;
const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Unvalidated create/update input, as typed into the sketch form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SketchDraft {
    pub title: String,
    pub description: String,
    pub tags_raw: String,
    pub image: ImagePayload,
}

/// Prefills an edit form. The existing image is re-supplied so an edit that
/// leaves it alone still validates.
impl From<&Sketch> for SketchDraft {
    fn from(sketch: &Sketch) -> Self {
        Self {
            title: sketch.title.clone(),
            description: sketch.description.clone(),
            tags_raw: sketch.tags_raw(),
            image: sketch.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Tags,
    Image,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Description, Field::Tags, Field::Image];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Tags => "tags",
            Field::Image => "image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("is required")]
    Required,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("must contain at least one non-empty tag")]
    NoValidTags,
    #[error("must be an image, got {media_type:?}")]
    NotAnImage { media_type: String },
    #[error("must be at most {max_bytes} bytes")]
    TooLarge { max_bytes: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct FieldError {
    pub field: Field,
    pub reason: ValidationReason,
}

impl FieldError {
    fn new(field: Field, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Every failing field of a draft, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|err| err.field == field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A draft that passed validation, with text trimmed and tags split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) tags: Vec<String>,
    pub(crate) image: ImagePayload,
}

impl ValidDraft {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Splits comma-delimited input, trimming each entry and dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

impl SketchDraft {
    pub fn validate(&self) -> Result<ValidDraft, ValidationErrors> {
        let errors: Vec<FieldError> = Field::ALL
            .iter()
            .filter_map(|field| self.validate_field(*field).err())
            .collect();

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(ValidDraft {
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            tags: parse_tags(&self.tags_raw),
            image: self.image.clone(),
        })
    }

    /// Checks a single field, for live feedback while the form is edited.
    pub fn validate_field(&self, field: Field) -> Result<(), FieldError> {
        let reason = match field {
            Field::Title => check_text(&self.title, TITLE_MIN_CHARS),
            Field::Description => check_text(&self.description, DESCRIPTION_MIN_CHARS),
            Field::Tags => check_tags(&self.tags_raw),
            Field::Image => check_image(&self.image),
        };

        match reason {
            Some(reason) => Err(FieldError::new(field, reason)),
            None => Ok(()),
        }
    }
}

fn check_text(value: &str, min: usize) -> Option<ValidationReason> {
    let value = value.trim();
    if value.is_empty() {
        Some(ValidationReason::Required)
    } else if value.chars().count() < min {
        Some(ValidationReason::TooShort { min })
    } else {
        None
    }
}

fn check_tags(raw: &str) -> Option<ValidationReason> {
    if raw.trim().is_empty() {
        Some(ValidationReason::Required)
    } else if parse_tags(raw).is_empty() {
        Some(ValidationReason::NoValidTags)
    } else {
        None
    }
}

/// Media types are case-insensitive.
fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .get(..IMAGE_MEDIA_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IMAGE_MEDIA_PREFIX))
}

fn check_image(image: &ImagePayload) -> Option<ValidationReason> {
    if image.is_blank() {
        return Some(ValidationReason::Required);
    }

    if let Some(url) = image.data_url() {
        if !is_image_media_type(url.media_type) {
            return Some(ValidationReason::NotAnImage {
                media_type: url.media_type.to_owned(),
            });
        }
    }

    if image.decoded_len() > IMAGE_MAX_BYTES {
        return Some(ValidationReason::TooLarge {
            max_bytes: IMAGE_MAX_BYTES,
        });
    }

    None
}
