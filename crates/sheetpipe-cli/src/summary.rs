use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sheetpipe_config::InitReport;
use sheetpipe_core::{RunOutcome, SkipReason};

use crate::commands::UploadResult;

pub fn print_summary(result: &UploadResult) {
    let job = &result.job;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    let sheet = job.sheet_name.clone().unwrap_or_else(|| job.sheet_key.clone());
    table.add_row(vec![label_cell("Sheet"), Cell::new(sheet)]);
    table.add_row(vec![label_cell("Target"), Cell::new(job.target.to_string())]);
    table.add_row(vec![label_cell("Destination"), Cell::new(&result.destination)]);
    match &result.outcome {
        RunOutcome::Pushed { report, check } => {
            table.add_row(vec![
                label_cell("Table"),
                Cell::new(report.outcome.to_string())
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
            table.add_row(vec![label_cell("Rows loaded"), count_cell(report.rows)]);
            table.add_row(vec![label_cell("Columns in table"), count_cell(check.columns)]);
            table.add_row(vec![label_cell("Rows in table"), count_cell(check.rows)]);
        }
        RunOutcome::Skipped(reason) => {
            let text = match reason {
                SkipReason::DryRun => "nothing pushed (dry run)",
                SkipReason::Declined => "nothing pushed (declined)",
            };
            table.add_row(vec![label_cell("Table"), Cell::new(text).fg(Color::Yellow)]);
        }
        RunOutcome::Aborted => {
            table.add_row(vec![
                label_cell("Table"),
                Cell::new("aborted by user")
                    .fg(Color::Red)
                    .add_attribute(Attribute::Bold),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_init_report(report: &InitReport) {
    if report.project_created {
        println!("Project created: {}", report.project_dir.display());
    } else {
        println!("Project already present: {}", report.project_dir.display());
    }
    println!("Profiles: {}", report.profiles_file.display());
    println!(
        "Google credentials: {} (add an access_token or api_key)",
        report.google_credentials.display()
    );
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Left);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn count_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}
