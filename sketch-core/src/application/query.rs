use std::cmp::Ordering;
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use feruca::Collator;

use crate::domain::sketch::Sketch;

/// Gallery ordering. Unknown keys keep the collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    Latest,
    Likes,
    Alphabetical,
    #[default]
    Unspecified,
}

impl SortKey {
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "latest" => SortKey::Latest,
            "likes" => SortKey::Likes,
            "alphabetical" => SortKey::Alphabetical,
            _ => SortKey::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Latest => "latest",
            SortKey::Likes => "likes",
            SortKey::Alphabetical => "alphabetical",
            SortKey::Unspecified => "",
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortKey::parse(s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locale-aware title ordering (Unicode collation, CLDR root order):
/// accents and case only break ties, lowercase first.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let mut collator = Collator::default();
    collator.collate(a, b)
}

/// Keeps sketches with a tag containing `tag_query` (case-insensitive, taken
/// verbatim; an empty query keeps everything), then orders them by `sort`.
/// The sort is stable and the input is never modified, so the result can be
/// fed back in.
pub fn filter_and_sort<'a, I>(sketches: I, tag_query: &str, sort: SortKey) -> Vec<&'a Sketch>
where
    I: IntoIterator<Item = &'a Sketch>,
{
    let needle = tag_query.to_lowercase();
    let mut view: Vec<&Sketch> = sketches
        .into_iter()
        .filter(|sketch| needle.is_empty() || sketch.has_tag_containing(&needle))
        .collect();

    match sort {
        SortKey::Latest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Likes => view.sort_by(|a, b| b.likes.cmp(&a.likes)),
        SortKey::Alphabetical => {
            let mut collator = Collator::default();
            view.sort_by(|a, b| collator.collate(a.title.as_str(), b.title.as_str()));
        }
        SortKey::Unspecified => {}
    }

    view
}

/// Every tag in the gallery, once, in first-seen order.
pub fn distinct_tags<'a, I>(sketches: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a Sketch>,
{
    let mut seen = HashSet::new();
    sketches
        .into_iter()
        .flat_map(|sketch| sketch.tags.iter().map(String::as_str))
        .filter(|tag| seen.insert(*tag))
        .collect()
}
