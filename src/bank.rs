use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maximum score a single answer can carry.
pub const MAX_OPTION_SCORE: u8 = 4;

/// Psychological dimension a question belongs to.
///
/// Declaration order is the order used when `overall` expands into every
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Depression,
    Stress,
    Anxiety,
    Adhd,
    Wellbeing,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Depression,
        Category::Stress,
        Category::Anxiety,
        Category::Adhd,
        Category::Wellbeing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Depression => "depression",
            Category::Stress => "stress",
            Category::Anxiety => "anxiety",
            Category::Adhd => "adhd",
            Category::Wellbeing => "wellbeing",
        }
    }

    /// Case-insensitive lookup of a category tag.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of scoreable answer labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    Never,
    Rarely,
    Sometimes,
    Often,
    Always,
    Yes,
    No,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 7] = [
        OptionLabel::Never,
        OptionLabel::Rarely,
        OptionLabel::Sometimes,
        OptionLabel::Often,
        OptionLabel::Always,
        OptionLabel::Yes,
        OptionLabel::No,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::Never => "Never",
            OptionLabel::Rarely => "Rarely",
            OptionLabel::Sometimes => "Sometimes",
            OptionLabel::Often => "Often",
            OptionLabel::Always => "Always",
            OptionLabel::Yes => "Yes",
            OptionLabel::No => "No",
        }
    }

    /// Raw agreement score, 0..=4.
    pub fn score(&self) -> u8 {
        match self {
            OptionLabel::Never | OptionLabel::No => 0,
            OptionLabel::Rarely => 1,
            OptionLabel::Sometimes => 2,
            OptionLabel::Often => 3,
            OptionLabel::Always | OptionLabel::Yes => MAX_OPTION_SCORE,
        }
    }

    /// Returns `None` for anything that is not an option label, free text included.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        OptionLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a question is presented and answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Single choice among option labels. The only scored kind.
    #[default]
    Radio,
    /// Multi-select.
    Checkbox,
    /// Free text.
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub category: Category,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    /// Positively worded item; high agreement means good wellbeing.
    pub reverse: bool,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    id: u32,
    text: String,
    #[serde(default)]
    kind: QuestionKind,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    reverse: bool,
}

#[derive(Debug, Deserialize)]
struct RawBank {
    version: String,
    categories: BTreeMap<Category, Vec<RawQuestion>>,
}

/// Versioned, validated question catalog.
///
/// Built once and shared read-only; nothing mutates it after loading.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    version: String,
    categories: BTreeMap<Category, Vec<Question>>,
}

impl QuestionBank {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: RawBank = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let f = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(f);
        let raw: RawBank = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawBank) -> Result<Self, Error> {
        let categories = raw
            .categories
            .into_iter()
            .map(|(category, questions)| {
                let questions = questions
                    .into_iter()
                    .map(|q| Question {
                        id: q.id,
                        text: q.text,
                        category,
                        kind: q.kind,
                        options: q.options,
                        reverse: q.reverse,
                    })
                    .collect();
                (category, questions)
            })
            .collect();
        let bank = Self {
            version: raw.version,
            categories,
        };
        bank.validate()?;
        Ok(bank)
    }

    fn validate(&self) -> Result<(), Error> {
        let mut ids = HashSet::new();
        let mut texts = HashSet::new();
        for question in self.iter() {
            if !ids.insert(question.id) {
                return Err(Error::InvalidBank(format!(
                    "duplicate question id {}",
                    question.id
                )));
            }
            if !texts.insert(question.text.trim().to_lowercase()) {
                return Err(Error::InvalidBank(format!(
                    "duplicate question text {:?}",
                    question.text
                )));
            }
            match question.kind {
                QuestionKind::Radio => {
                    if question.options.is_empty() {
                        return Err(Error::InvalidBank(format!(
                            "question {} has no options",
                            question.id
                        )));
                    }
                    if let Some(option) = question
                        .options
                        .iter()
                        .find(|option| OptionLabel::parse(option).is_none())
                    {
                        return Err(Error::InvalidBank(format!(
                            "question {} has unknown option {:?}",
                            question.id, option
                        )));
                    }
                }
                QuestionKind::Checkbox if question.options.is_empty() => {
                    return Err(Error::InvalidBank(format!(
                        "question {} has no options",
                        question.id
                    )));
                }
                QuestionKind::Checkbox | QuestionKind::Text => {}
            }
        }
        Ok(())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Questions of one category in catalog order.
    pub fn questions(&self, category: Category) -> &[Question] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every question, categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.categories.values().flatten()
    }

    /// Looks up a question by its catalog id.
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.iter().find(|question| question.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.iter().nth(index)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
