//! Prompt loop and preview rendering.

use std::io::Cursor;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use sheetpipe_cli::terminal::{TerminalInteraction, dtype_table, preview_table};
use sheetpipe_core::{Answer, Interaction, Preview, Question};

fn answer(input: &str, question: Question) -> (Answer, String) {
    let mut interaction = TerminalInteraction::new(Cursor::new(input.as_bytes()), Vec::new());
    let answer = interaction.confirm(question);
    let output = String::from_utf8(interaction.into_output()).unwrap();
    (answer, output)
}

fn frame(rows: usize) -> DataFrame {
    let ids: Vec<String> = (1..=rows).map(|idx| idx.to_string()).collect();
    let notes: Vec<Option<&str>> = (1..=rows)
        .map(|idx| if idx % 2 == 0 { None } else { Some("note") })
        .collect();
    DataFrame::new(vec![
        Series::new("id".into(), ids).into_column(),
        Series::new("note".into(), notes).into_column(),
    ])
    .unwrap()
}

#[test]
fn invalid_answers_are_asked_again() {
    let (answer, output) = answer("maybe\nY\n", Question::PerformCleanup);
    assert_eq!(answer, Answer::Yes);
    assert_eq!(
        output,
        "Would you like to perform cleanup? (y/n/a): Choose 'y': yes, 'n': no, 'a': abort\n\
         Would you like to perform cleanup? (y/n/a): "
    );
}

#[test]
fn push_prompt_accepts_no() {
    let (answer, _) = answer("n\n", Question::PushToDatabase);
    assert_eq!(answer, Answer::No);
}

#[test]
fn end_of_input_aborts() {
    let (answer, _) = answer("", Question::PushToDatabase);
    assert_eq!(answer, Answer::Abort);
}

#[test]
fn preview_shows_at_most_ten_rows() {
    let rendered = preview_table(&frame(25), 10).to_string();
    assert!(rendered.contains("10"));
    assert!(!rendered.contains("11"));
    assert!(rendered.contains("null"));
}

#[test]
fn dtype_table_lists_every_column() {
    let rendered = dtype_table(&frame(2)).to_string();
    assert!(rendered.contains("id"));
    assert!(rendered.contains("note"));
    assert!(rendered.contains("str"));
}

#[test]
fn preview_writes_title_and_tables() {
    let mut interaction = TerminalInteraction::new(Cursor::new(&b""[..]), Vec::new());
    interaction.preview(Preview::AfterCleanup, &frame(3));
    let output = String::from_utf8(interaction.into_output()).unwrap();
    assert!(output.contains("POST-CLEANING PREVIEW"));
    assert!(output.contains("Data types:"));
    assert!(output.contains("First rows:"));
}
