use std::io::Read;

use crate::bank::QuestionBank;
use crate::error::Error;
use crate::scoring::{AssessmentResult, EngineOptions};
use crate::selection::Selection;
use crate::session::Assessment;
use crate::store::Answer;

const FIXED_COLUMNS: usize = 2;

#[derive(Debug, Clone)]
pub struct BulkRow {
    pub respondent: String,
    pub selection: Selection,
    pub result: AssessmentResult,
}

/// Scores every row of a CSV export.
///
/// Layout: `respondent,categories,<answer per question position>`. The
/// categories cell holds a `;` separated selection. An empty answer cell is
/// unanswered and a cell containing `|` is a multi-select. A bad row yields an
/// error for that row only.
pub fn read_bulk<'a, R: Read + 'a>(
    bank: &'a QuestionBank,
    options: EngineOptions,
    reader: R,
) -> impl Iterator<Item = Result<BulkRow, Error>> + 'a {
    csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records()
        .map(move |record| score_record(bank, options, &record?))
}

fn score_record(
    bank: &QuestionBank,
    options: EngineOptions,
    record: &csv::StringRecord,
) -> Result<BulkRow, Error> {
    let respondent = record.get(0).unwrap_or_default().to_string();
    let selection = Selection::parse_list(record.get(1).unwrap_or_default());
    let mut assessment = Assessment::start(bank, selection.clone(), options);

    for (index, cell) in record.iter().skip(FIXED_COLUMNS).enumerate() {
        if cell.is_empty() {
            continue;
        }
        assessment.answer(index, parse_cell(cell))?;
    }

    Ok(BulkRow {
        respondent,
        selection,
        result: assessment.score(),
    })
}

fn parse_cell(cell: &str) -> Answer {
    if cell.contains('|') {
        Answer::Multiple(
            cell.split('|')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect(),
        )
    } else {
        Answer::Single(cell.to_string())
    }
}
