use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use intake_model::{Confidence, ConfidenceTier};
use intake_wizard::{Blocker, DocumentSummary, ReviewSummary};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn confidence_cell(confidence: Confidence) -> Cell {
    let color = match confidence.tier() {
        ConfidenceTier::High => Color::Green,
        ConfidenceTier::Medium => Color::Blue,
        ConfidenceTier::Low => Color::Yellow,
        ConfidenceTier::None => Color::DarkGrey,
    };
    Cell::new(confidence.to_string()).fg(color)
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn print_review(review: &ReviewSummary) {
    println!("Profile: {}", review.profile);
    println!("Name: {}", review.name);
    if let Some(batch_id) = &review.batch_id {
        println!("Batch ID: {batch_id}");
    }
    if let Some(file_name) = &review.file_name {
        println!(
            "File: {file_name} ({} rows, {} columns)",
            review.row_count, review.column_count
        );
    }
    match &review.documents {
        DocumentSummary::None => {}
        DocumentSummary::ExistingBatch { batch_id } => {
            println!("Documents: existing batch {batch_id}");
        }
        DocumentSummary::Upload { files } => {
            println!("Documents: {} uploaded ({})", files.len(), files.join(", "));
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in &review.mapped {
        table.add_row(vec![
            Cell::new(&entry.source_column),
            Cell::new(&entry.target_field).add_attribute(Attribute::Bold),
            confidence_cell(Confidence::saturating(u32::from(entry.confidence))),
            Cell::new(entry.origin.as_str()),
        ]);
    }
    println!("{table}");

    if !review.unmapped_columns.is_empty() {
        println!("Unmapped: {}", review.unmapped_columns.join(", "));
    }
    for warning in &review.warnings {
        println!("warning: {warning}");
    }
    if let Some(template) = &review.template {
        println!("Template to save: {}", template.name);
    }
}

pub fn print_blockers(blockers: &[Blocker]) {
    eprintln!("cannot continue:");
    for blocker in blockers {
        eprintln!("  - {blocker}");
    }
}
