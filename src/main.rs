use std::io::stdin;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use wellness_check::config::AppConfig;
use wellness_check::{
    load_bank, telemetry, Answer, Assessment, Error, JsonLinesSink, Question, QuestionKind,
    ResultSink, SaveStatus, Selection,
};

#[derive(Parser)]
#[command(author, version, about = "Student wellness self-assessment")]
struct Args {
    /// Categories to assess, e.g. `depression,stress` or `overall`
    #[arg(short, long, value_delimiter = ',', default_value = "overall")]
    categories: Vec<String>,

    /// Signed-in student; results are only saved when set
    #[arg(long)]
    user_id: Option<String>,

    /// JSON-lines file receiving saved results
    #[arg(long)]
    results: Option<PathBuf>,

    /// List and count each question once even when `overall` overlaps a category
    #[arg(long, default_value_t = false)]
    no_overlap: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    let mut config = AppConfig::load()?;
    if let Some(results) = args.results {
        config.results_path = results;
    }
    if args.no_overlap {
        config.engine.allow_overlap_counting = false;
    }
    telemetry::init(&config)?;

    let bank = load_bank(&config)?;
    let selection = Selection::parse(&args.categories);
    if selection.is_empty() {
        println!("Choose at least one of: depression, stress, anxiety, adhd, wellbeing, overall.");
        return Ok(());
    }

    let mut assessment = Assessment::start(&bank, selection, config.engine);
    let questions = assessment.questions().clone();
    let mut buffer = String::new();

    'questions: for (index, entry) in questions.iter().enumerate() {
        println!("{}. {}", index + 1, entry.question.text);
        print_options(&entry.question);
        loop {
            buffer.clear();
            if stdin().read_line(&mut buffer)? == 0 {
                break 'questions;
            }
            match parse_input(&entry.question, buffer.trim()) {
                Some(None) => break,
                Some(Some(answer)) => {
                    assessment.answer(index, answer)?;
                    break;
                }
                None => println!("Please enter one of the listed numbers, or leave it blank to skip."),
            }
        }
        println!();
    }

    let sink: Arc<dyn ResultSink> = Arc::new(JsonLinesSink::new(&config.results_path));
    let submission = assessment.submit(sink, args.user_id);

    for (tag, score) in submission.result.iter() {
        println!(
            "{:<12} {:>3}%  {}",
            tag.as_str(),
            score.percentage,
            score.rating()
        );
    }

    match submission.wait().await {
        SaveStatus::Saved => println!("Your results have been saved."),
        SaveStatus::Skipped => println!("You are not signed in, so your results were not saved."),
        SaveStatus::Failed(message) => println!("Warning: {message}"),
    }
    Ok(())
}

fn print_options(question: &Question) {
    match question.kind {
        QuestionKind::Radio | QuestionKind::Checkbox => {
            for (number, option) in question.options.iter().enumerate() {
                print!("  {} => {}", number + 1, option);
            }
            println!();
            if question.kind == QuestionKind::Checkbox {
                println!("  (select any, separated by spaces)");
            }
        }
        QuestionKind::Text => println!("  (free text)"),
    }
}

/// `None` means the input was invalid, `Some(None)` that the question was skipped.
fn parse_input(question: &Question, value: &str) -> Option<Option<Answer>> {
    if value.is_empty() {
        return Some(None);
    }
    let option_at = |number: &str| {
        number
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| question.options.get(n))
            .cloned()
    };
    match question.kind {
        QuestionKind::Radio => option_at(value).map(|option| Some(Answer::Single(option))),
        QuestionKind::Checkbox => value
            .split([' ', ','])
            .filter(|number| !number.is_empty())
            .map(option_at)
            .collect::<Option<Vec<_>>>()
            .map(|options| Some(Answer::Multiple(options))),
        QuestionKind::Text => Some(Some(Answer::Single(value.to_string()))),
    }
}
