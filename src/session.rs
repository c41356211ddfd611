use std::sync::Arc;

use crate::bank::QuestionBank;
use crate::error::Error;
use crate::persist::{self, ResultSink, Submission};
use crate::question_set::{QuestionSet, QuestionSetBuilder};
use crate::scoring::{AssessmentResult, EngineOptions, ScoringEngine};
use crate::selection::Selection;
use crate::store::{Answer, ResponseStore};

/// One respondent's pass through a question set.
#[derive(Debug, Clone)]
pub struct Assessment {
    selection: Selection,
    questions: QuestionSet,
    responses: ResponseStore,
    engine: ScoringEngine,
}

impl Assessment {
    pub fn start(bank: &QuestionBank, selection: Selection, options: EngineOptions) -> Self {
        let questions = QuestionSetBuilder::new(bank)
            .allow_overlap(options.allow_overlap_counting)
            .build(&selection);
        let responses = ResponseStore::for_set(&questions);
        Self {
            selection,
            questions,
            responses,
            engine: ScoringEngine::new(options),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn responses(&self) -> &ResponseStore {
        &self.responses
    }

    pub fn answer(&mut self, index: usize, answer: impl Into<Answer>) -> Result<(), Error> {
        self.responses.insert(index, answer)?;
        Ok(())
    }

    pub fn score(&self) -> AssessmentResult {
        self.engine
            .score(&self.questions, &self.responses, &self.selection)
    }

    /// Scores and hands the result to `sink`; the answers are consumed.
    pub fn submit(self, sink: Arc<dyn ResultSink>, user_id: Option<String>) -> Submission {
        let results = self.score();
        let record = persist::record(user_id, &self.selection, self.responses, results);
        persist::submit(sink, record)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bank::{Category, OptionLabel};
    use crate::persist::{MemorySink, SaveStatus};
    use crate::scoring::Rating;
    use crate::QUESTIONS;

    #[test]
    fn test_partial_completion() {
        let mut assessment = Assessment::start(
            &QUESTIONS,
            Selection::parse(["depression", "adhd"]),
            EngineOptions::default(),
        );
        assert_eq!(assessment.questions().len(), 13);
        // depression: "I feel hopeful about my future." is reverse scored
        assessment.answer(5, OptionLabel::Never).unwrap();
        assessment.answer(6, "Exams went fine").unwrap();
        let result = assessment.score();
        assert_eq!(result.percentage(Category::Depression), Some(100));
        assert_eq!(result.get(Category::Adhd).unwrap().rating(), Rating::NotAvailable);
        assert!(assessment.answer(13, OptionLabel::Yes).is_err());
    }

    #[tokio::test]
    async fn test_submit_saves_scored_record() {
        let mut assessment = Assessment::start(
            &QUESTIONS,
            Selection::parse(["adhd"]),
            EngineOptions::default(),
        );
        for index in 0..6 {
            assessment.answer(index, OptionLabel::Yes).unwrap();
        }
        let sink = Arc::new(MemorySink::default());
        let submission = assessment.submit(sink.clone(), Some("student-9".to_string()));
        // 5 items score 4, the reverse scored item scores 0
        assert_eq!(submission.result.percentage(Category::Adhd), Some(83));
        assert_eq!(submission.wait().await, SaveStatus::Saved);
        let records = sink.records().await;
        assert_eq!(records[0].responses.len(), 6);
    }

    #[test]
    fn test_submit_outside_runtime_returns_result() {
        let mut assessment = Assessment::start(
            &QUESTIONS,
            Selection::parse(["stress"]),
            EngineOptions::default(),
        );
        assessment.answer(0, "Often").unwrap();
        let sink = Arc::new(MemorySink::default());
        let submission = assessment.submit(sink, Some("student-4".to_string()));
        let stress = submission.result.get(Category::Stress).unwrap();
        assert_eq!(stress.percentage, 75);
        assert_eq!(stress.answered_count, 1);
    }
}
