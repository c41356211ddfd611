use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bank::{QuestionKind, MAX_OPTION_SCORE};
use crate::question_set::QuestionSet;
use crate::selection::{Selection, Tag};
use crate::store::ResponseStore;

/// Switches shared by question-set building and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// When `overall` and a concrete category are both selected, that
    /// category's questions are listed twice and both listings count. With
    /// `false` every question is listed and counted once per tag.
    pub allow_overlap_counting: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            allow_overlap_counting: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryAccumulator {
    pub total: u32,
    pub count: u32,
}

impl CategoryAccumulator {
    fn add(&mut self, score: u8) {
        self.total += u32::from(score);
        self.count += 1;
    }

    /// `round(total / (count * 4) * 100)` clamped to 0..=100, or 0 with no answers.
    pub fn percentage(&self) -> u8 {
        if self.count == 0 {
            return 0;
        }
        let max = f64::from(self.count) * f64::from(MAX_OPTION_SCORE);
        let ratio = f64::from(self.total) / max;
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub percentage: u8,
    pub answered_count: u32,
}

impl CategoryScore {
    pub fn rating(&self) -> Rating {
        Rating::classify(self)
    }
}

impl From<CategoryAccumulator> for CategoryScore {
    fn from(acc: CategoryAccumulator) -> Self {
        Self {
            percentage: acc.percentage(),
            answered_count: acc.count,
        }
    }
}

/// Dashboard classification of a category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Good,
    Average,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
    #[serde(rename = "Not Available")]
    NotAvailable,
}

impl Rating {
    pub fn classify(score: &CategoryScore) -> Self {
        match score.percentage {
            _ if score.answered_count == 0 => Rating::NotAvailable,
            75..=u8::MAX => Rating::Good,
            50..=74 => Rating::Average,
            _ => Rating::NeedsAttention,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::NeedsAttention => "Needs Attention",
            Rating::NotAvailable => "Not Available",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-tag scores of one submitted assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentResult {
    scores: BTreeMap<Tag, CategoryScore>,
}

impl AssessmentResult {
    pub fn get(&self, tag: impl Into<Tag>) -> Option<&CategoryScore> {
        self.scores.get(&tag.into())
    }

    pub fn percentage(&self, tag: impl Into<Tag>) -> Option<u8> {
        self.get(tag).map(|score| score.percentage)
    }

    pub fn overall(&self) -> Option<&CategoryScore> {
        self.scores.get(&Tag::Overall)
    }

    /// Concrete categories first, `overall` last.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &CategoryScore)> {
        self.scores.iter().map(|(&tag, score)| (tag, score))
    }

    /// Bare `tag -> percentage` view.
    pub fn percentages(&self) -> BTreeMap<String, u8> {
        self.iter()
            .map(|(tag, score)| (tag.to_string(), score.percentage))
            .collect()
    }

    pub fn ratings(&self) -> BTreeMap<Tag, Rating> {
        self.iter().map(|(tag, score)| (tag, score.rating())).collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    options: EngineOptions,
}

impl ScoringEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Reduces answers to per-tag scores. Never fails: missing, free-text and
    /// multi-select answers are left out, as are positions outside `set`.
    pub fn score(
        &self,
        set: &QuestionSet,
        responses: &ResponseStore,
        selection: &Selection,
    ) -> AssessmentResult {
        let mut accumulators = selection
            .iter()
            .map(|tag| (tag, CategoryAccumulator::default()))
            .collect::<BTreeMap<_, _>>();
        let mut counted: HashSet<(Tag, u32)> = HashSet::new();

        for (index, answer) in responses.iter() {
            let Some(entry) = set.get(index) else {
                debug!(index, "answer has no question, skipping");
                continue;
            };
            if entry.question.kind != QuestionKind::Radio {
                continue;
            }
            let Some(label) = answer.option() else {
                debug!(index, "answer is not an option label, skipping");
                continue;
            };
            let effective = effective_score(label.score(), entry.question.reverse);

            for tag in [Tag::Category(entry.category), Tag::Overall] {
                let Some(acc) = accumulators.get_mut(&tag) else {
                    continue;
                };
                if !self.options.allow_overlap_counting
                    && !counted.insert((tag, entry.question.id))
                {
                    continue;
                }
                acc.add(effective);
            }
        }

        let scores = accumulators
            .into_iter()
            .map(|(tag, acc)| (tag, CategoryScore::from(acc)))
            .collect::<BTreeMap<_, _>>();
        debug!(?scores, "assessment scored");
        AssessmentResult { scores }
    }
}

/// Inverts positively worded items so a high score always means more concern.
pub fn effective_score(raw: u8, reverse: bool) -> u8 {
    let raw = raw.min(MAX_OPTION_SCORE);
    if reverse {
        MAX_OPTION_SCORE - raw
    } else {
        raw
    }
}
