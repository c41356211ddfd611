use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bank::OptionLabel;
use crate::error::Error;
use crate::question_set::QuestionSet;

/// A respondent's answer to one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// An option label or free text.
    Single(String),
    /// Checkbox selections.
    Multiple(Vec<String>),
}

impl Answer {
    /// The option label carried by a single answer. Free text and
    /// multi-select answers never carry one.
    pub fn option(&self) -> Option<OptionLabel> {
        match self {
            Answer::Single(value) => OptionLabel::parse(value),
            Answer::Multiple(_) => None,
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Answer::Single(value) => value.trim().is_empty(),
            Answer::Multiple(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }
}

impl From<OptionLabel> for Answer {
    fn from(label: OptionLabel) -> Self {
        Answer::Single(label.as_str().to_string())
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Single(value.to_string())
    }
}

impl From<Vec<String>> for Answer {
    fn from(values: Vec<String>) -> Self {
        Answer::Multiple(values)
    }
}

/// Answers keyed by question-set position. Unanswered positions are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStore {
    capacity: usize,
    values: BTreeMap<usize, Answer>,
}

impl ResponseStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: BTreeMap::new(),
        }
    }

    pub fn for_set(set: &QuestionSet) -> Self {
        Self::new(set.len())
    }

    /// Stores the answer at the first unanswered position and returns it.
    pub fn push(&mut self, answer: impl Into<Answer>) -> Result<usize, Error> {
        let index = self
            .unanswered()
            .next()
            .ok_or(Error::IllegalQuestion(self.capacity))?;
        self.insert(index, answer)?;
        Ok(index)
    }

    /// Stores or replaces the answer at `index`, returning the previous one.
    pub fn insert(
        &mut self,
        index: usize,
        answer: impl Into<Answer>,
    ) -> Result<Option<Answer>, Error> {
        if index >= self.capacity {
            return Err(Error::IllegalQuestion(index));
        }
        let answer = answer.into();
        if answer.is_blank() {
            return Err(Error::IllegalAnswer(index));
        }
        Ok(self.values.insert(index, answer))
    }

    pub fn remove(&mut self, index: usize) -> Option<Answer> {
        self.values.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&Answer> {
        self.values.get(&index)
    }

    /// Answers in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Answer)> {
        self.values.iter().map(|(&index, answer)| (index, answer))
    }

    /// Number of answered positions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_complete(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn unanswered(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.capacity).filter(|index| !self.values.contains_key(index))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut store = ResponseStore::new(3);
        for _ in 0..3 {
            assert!(store.push(OptionLabel::Often).is_ok());
        }
        assert!(store.is_complete());
        assert!(matches!(
            store.push(OptionLabel::Often),
            Err(Error::IllegalQuestion(3))
        ));
    }

    #[test]
    fn test_push_fills_first_unanswered() {
        let mut store = ResponseStore::new(3);
        store.insert(0, "Always").unwrap();
        assert_eq!(store.push("Never").unwrap(), 1);
        assert_eq!(store.get(0), Some(&Answer::Single("Always".to_string())));
        store.remove(1);
        store.insert(2, "Rarely").unwrap();
        assert_eq!(store.push("Often").unwrap(), 1);
        assert_eq!(store.get(2).and_then(Answer::option), Some(OptionLabel::Rarely));
        assert!(matches!(store.push("Often"), Err(Error::IllegalQuestion(3))));
    }

    #[test]
    fn test_push_after_deserialize_keeps_answers() {
        let json = r#"{ "capacity": 2, "values": { "0": "Sometimes" } }"#;
        let mut store: ResponseStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.push("Always").unwrap(), 1);
        assert_eq!(store.get(0).and_then(Answer::option), Some(OptionLabel::Sometimes));
        assert!(store.is_complete());
    }

    #[test]
    fn test_insert_bounds() {
        let mut store = ResponseStore::new(57);
        assert!(store.insert(0, "Never").is_ok());
        assert!(store.insert(56, "Always").is_ok());
        assert!(store.insert(57, "Always").is_err());
        assert!(matches!(store.insert(10, "  "), Err(Error::IllegalAnswer(10))));
        assert!(matches!(
            store.insert(11, Vec::<String>::new()),
            Err(Error::IllegalAnswer(11))
        ));
    }

    #[test]
    fn test_insert_replaces_answer() {
        let mut store = ResponseStore::new(2);
        assert_eq!(store.insert(1, "Rarely").unwrap(), None);
        assert_eq!(
            store.insert(1, "Often").unwrap(),
            Some(Answer::Single("Rarely".to_string()))
        );
        assert_eq!(store.get(1).and_then(Answer::option), Some(OptionLabel::Often));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unanswered() {
        let mut store = ResponseStore::new(4);
        store.insert(1, "Yes").unwrap();
        store.insert(3, "No").unwrap();
        assert_eq!(store.unanswered().collect::<Vec<_>>(), vec![0, 2]);
        store.remove(3);
        assert_eq!(store.unanswered().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!(!store.is_complete());
    }

    #[test]
    fn test_answer_option() {
        assert_eq!(Answer::from("sometimes").option(), Some(OptionLabel::Sometimes));
        assert_eq!(Answer::from("More sleep").option(), None);
        assert_eq!(
            Answer::Multiple(vec!["Always".to_string()]).option(),
            None
        );
    }

    #[test]
    fn test_deserialize_mixed_answers() {
        let json = r#"{ "capacity": 3, "values": { "0": "Always", "2": ["Music", "Exercise"] } }"#;
        let store: ResponseStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.get(0), Some(&Answer::Single("Always".to_string())));
        assert_eq!(
            store.get(2),
            Some(&Answer::Multiple(vec![
                "Music".to_string(),
                "Exercise".to_string()
            ]))
        );
        assert_eq!(store.get(1), None);
    }
}
