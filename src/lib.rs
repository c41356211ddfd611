use once_cell::sync::Lazy;

pub mod bank;
pub mod bulk;
pub mod config;
pub mod error;
pub mod persist;
pub mod question_set;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod store;
pub mod telemetry;

pub use bank::{Category, OptionLabel, Question, QuestionBank, QuestionKind};
pub use bulk::{read_bulk, BulkRow};
pub use error::Error;
pub use persist::{
    AssessmentRecord, JsonLinesSink, MemorySink, PersistError, ResultSink, SaveStatus, Submission,
};
pub use question_set::{QuestionSet, QuestionSetBuilder};
pub use scoring::{AssessmentResult, CategoryScore, EngineOptions, Rating, ScoringEngine};
pub use selection::{Selection, Tag};
pub use session::Assessment;
pub use store::{Answer, ResponseStore};

const BUILTIN_BANK: &str = include_str!("../resources/questions.json");

/// Question bank shipped with the crate.
pub static QUESTIONS: Lazy<QuestionBank> = Lazy::new(|| {
    QuestionBank::from_json(BUILTIN_BANK).expect("embedded question bank is valid")
});

/// The configured bank file, or the embedded one.
pub fn load_bank(config: &config::AppConfig) -> Result<QuestionBank, Error> {
    match &config.question_bank {
        Some(path) => QuestionBank::load(path),
        None => Ok((*QUESTIONS).clone()),
    }
}
