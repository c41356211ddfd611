use std::collections::HashSet;

use serde::Serialize;

use crate::bank::{Category, Question, QuestionBank};
use crate::selection::{Selection, Tag};

/// One position of a question set together with the category that owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub question: Question,
    pub category: Category,
}

/// Ordered questions presented in one assessment session.
///
/// Positions are the keys of [`crate::ResponseStore`]; the set never changes
/// after it is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionSet {
    entries: Vec<Entry>,
}

impl QuestionSet {
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn category_of(&self, index: usize) -> Option<Category> {
        self.entries.get(index).map(|entry| entry.category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct QuestionSetBuilder<'a> {
    bank: &'a QuestionBank,
    allow_overlap: bool,
}

impl<'a> QuestionSetBuilder<'a> {
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self {
            bank,
            allow_overlap: true,
        }
    }

    /// When false, a question already in the set is not listed a second time
    /// if `overall` and its own category are both selected.
    pub fn allow_overlap(mut self, allow: bool) -> Self {
        self.allow_overlap = allow;
        self
    }

    pub fn build(&self, selection: &Selection) -> QuestionSet {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        for tag in selection.iter() {
            let categories: &[Category] = match tag {
                Tag::Overall => &Category::ALL,
                Tag::Category(ref category) => std::slice::from_ref(category),
            };
            for &category in categories {
                for question in self.bank.questions(category) {
                    if !self.allow_overlap && !seen.insert(question.id) {
                        continue;
                    }
                    entries.push(Entry {
                        question: question.clone(),
                        category,
                    });
                }
            }
        }
        QuestionSet { entries }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::QUESTIONS;

    fn ids(set: &QuestionSet) -> Vec<u32> {
        set.iter().map(|entry| entry.question.id).collect()
    }

    #[test]
    fn test_single_category() {
        let set = QuestionSetBuilder::new(&QUESTIONS).build(&Selection::parse(["anxiety"]));
        assert_eq!(ids(&set), vec![14, 15, 16, 17, 18, 19]);
        assert_eq!(set.category_of(0), Some(Category::Anxiety));
        assert_eq!(set.category_of(6), None);
    }

    #[test]
    fn test_follows_selection_order() {
        let set =
            QuestionSetBuilder::new(&QUESTIONS).build(&Selection::parse(["adhd", "depression"]));
        assert_eq!(set.len(), 6 + 7);
        assert_eq!(set.category_of(0), Some(Category::Adhd));
        assert_eq!(set.category_of(6), Some(Category::Depression));
    }

    #[test]
    fn test_overall_expands_in_declaration_order() {
        let set = QuestionSetBuilder::new(&QUESTIONS).build(&Selection::parse(["overall"]));
        assert_eq!(set.len(), QUESTIONS.len());
        assert_eq!(ids(&set), (1..=32).collect::<Vec<_>>());
        assert!(set
            .iter()
            .all(|entry| entry.category == entry.question.category));
    }

    #[test]
    fn test_overall_with_category_duplicates_by_default() {
        let set =
            QuestionSetBuilder::new(&QUESTIONS).build(&Selection::parse(["overall", "stress"]));
        assert_eq!(set.len(), 32 + 6);
        assert_eq!(set.get(32).map(|entry| entry.question.id), Some(8));
    }

    #[test]
    fn test_overlap_disabled_lists_each_question_once() {
        let set = QuestionSetBuilder::new(&QUESTIONS)
            .allow_overlap(false)
            .build(&Selection::parse(["stress", "overall"]));
        assert_eq!(set.len(), 32);
        assert_eq!(set.get(0).map(|entry| entry.question.id), Some(8));
        assert_eq!(set.get(6).map(|entry| entry.question.id), Some(1));
    }

    #[test]
    fn test_unknown_tags_build_nothing() {
        let set = QuestionSetBuilder::new(&QUESTIONS).build(&Selection::parse(["sleep", "mood"]));
        assert!(set.is_empty());
    }
}
