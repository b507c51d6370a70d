//! Terminal previews and prompts.

use std::io::{self, BufRead, Write};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};
use sheetpipe_core::{Answer, Interaction, Preview, Question};
use tracing::{trace, warn};

use crate::logging::redact_value;

/// Rows shown in a preview.
pub const PREVIEW_ROWS: usize = 10;

const CHOICES_HINT: &str = "Choose 'y': yes, 'n': no, 'a': abort";

/// [`Interaction`] over a reader and a writer, normally stdin and stdout.
pub struct TerminalInteraction<R, W> {
    input: R,
    output: W,
}

impl TerminalInteraction<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalInteraction<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn emit(&mut self, text: &str) {
        if let Err(error) = self
            .output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush())
        {
            warn!(%error, "could not write to the terminal");
        }
    }
}

impl<R: BufRead, W: Write> Interaction for TerminalInteraction<R, W> {
    fn preview(&mut self, stage: Preview, df: &DataFrame) {
        let text = format!(
            "\n{}: the data you would push looks like this\n\nData types:\n{}\n\nFirst rows:\n{}\n",
            stage.title(),
            dtype_table(df),
            preview_table(df, PREVIEW_ROWS),
        );
        self.emit(&text);
        if let Some(first) = row_text(df, 0) {
            trace!(row = %redact_value(&first), "first previewed row");
        }
    }

    /// Re-asks until `y`, `n` or `a`; end of input counts as abort.
    fn confirm(&mut self, question: Question) -> Answer {
        loop {
            self.emit(question.prompt());
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return Answer::Abort,
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "could not read the answer");
                    return Answer::Abort;
                }
            }
            if let Some(answer) = Answer::parse(&line) {
                return answer;
            }
            self.emit(&format!("{CHOICES_HINT}\n"));
        }
    }
}

pub fn dtype_table(df: &DataFrame) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Type")]);
    apply_preview_style(&mut table);
    for column in df.get_columns() {
        table.add_row(vec![
            Cell::new(column.name().as_str()),
            Cell::new(column.dtype().to_string()),
        ]);
    }
    table
}

/// Header plus the first `rows` rows of `df`.
pub fn preview_table(df: &DataFrame, rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .into_iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_preview_style(&mut table);
    for idx in 0..df.height().min(rows) {
        let cells: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| match column.get(idx) {
                Ok(AnyValue::Null) | Err(_) => dim_cell("null"),
                Ok(value) => Cell::new(value_text(&value)),
            })
            .collect();
        table.add_row(cells);
    }
    table
}

fn value_text(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::String(text) => (*text).to_string(),
        AnyValue::StringOwned(text) => text.to_string(),
        other => other.to_string(),
    }
}

fn row_text(df: &DataFrame, idx: usize) -> Option<String> {
    if idx >= df.height() {
        return None;
    }
    let values: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| column.get(idx).map(|value| value_text(&value)).unwrap_or_default())
        .collect();
    Some(values.join(" | "))
}

fn apply_preview_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(value: &str) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
