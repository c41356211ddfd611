use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::bank::Category;

pub const OVERALL: &str = "overall";

/// A selectable tag: a concrete category or the `overall` view over all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Category(Category),
    Overall,
}

impl Tag {
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case(OVERALL) {
            return Some(Tag::Overall);
        }
        Category::parse(value).map(Tag::Category)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Category(category) => category.as_str(),
            Tag::Overall => OVERALL,
        }
    }
}

impl From<Category> for Tag {
    fn from(category: Category) -> Self {
        Tag::Category(category)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Tag::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category tag {value:?}")))
    }
}

/// Ordered, duplicate-free set of tags chosen before the question set is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    tags: Vec<Tag>,
}

impl Selection {
    /// Parses raw tags, skipping anything unrecognized.
    pub fn parse<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .filter_map(|value| {
                let value = value.as_ref();
                let tag = Tag::parse(value);
                if tag.is_none() {
                    debug!(tag = value, "skipping unknown category tag");
                }
                tag
            })
            .collect()
    }

    /// Parses a comma or semicolon separated list such as `"overall;stress"`.
    pub fn parse_list(list: &str) -> Self {
        Self::parse(
            list.split([',', ';'])
                .map(str::trim)
                .filter(|value| !value.is_empty()),
        )
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn includes_overall(&self) -> bool {
        self.contains(Tag::Overall)
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tags.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn from_categories(categories: &[Category]) -> Self {
        categories.iter().copied().map(Tag::from).collect()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|tag| tag.as_str().to_string()).collect()
    }
}

impl FromIterator<Tag> for Selection {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        let mut tags = Vec::new();
        for tag in iter {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Self { tags }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_skips_unknown_and_duplicates() {
        let selection = Selection::parse(["Stress", "sleep", "overall", "stress", ""]);
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec![Tag::Category(Category::Stress), Tag::Overall]
        );
        assert!(selection.includes_overall());
    }

    #[test]
    fn test_from_categories_keeps_order() {
        let selection =
            Selection::from_categories(&[Category::Adhd, Category::Stress, Category::Adhd]);
        assert_eq!(selection.to_strings(), vec!["adhd", "stress"]);
        assert!(!selection.includes_overall());
    }

    #[test]
    fn test_parse_list() {
        let selection = Selection::parse_list("depression; adhd,overall");
        assert_eq!(selection.to_strings(), vec!["depression", "adhd", "overall"]);
    }

    #[test]
    fn test_serde_roundtrip_uses_plain_strings() {
        let selection = Selection::parse(["overall", "wellbeing"]);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"["overall","wellbeing"]"#);
        let back: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }

    #[test]
    fn test_overall_sorts_after_categories() {
        assert!(Tag::Category(Category::Wellbeing) < Tag::Overall);
        assert!(Tag::Category(Category::Depression) < Tag::Category(Category::Stress));
    }
}
