//! Table rendering for command output.

use chrono::SecondsFormat;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ldb_model::{
    ID_ATTRIBUTE, PartOfSpeech, Record, RecordSchema, Root, Source, SurfaceForm,
    SurfaceFormStatus, User,
};
use ldb_store::{ImportSummary, LanguageDatabase, RecordRef};

pub fn apply_table_style(table: &mut Table) {
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

fn dim_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Records per section.
pub fn counts_table(db: &LanguageDatabase) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Section"), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut total = 0;
    for (section, count) in db.counts() {
        total += count;
        table.add_row(vec![Cell::new(section), count_cell(count)]);
    }
    table.add_row(vec![
        Cell::new("total").add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Surface forms per classification status.
pub fn status_table(db: &LanguageDatabase) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Status"), header_cell("Surface forms")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (status, count) in db.status_counts() {
        table.add_row(vec![status_cell(status), count_cell(count)]);
    }
    table
}

fn status_cell(status: SurfaceFormStatus) -> Cell {
    let cell = Cell::new(status);
    match status {
        SurfaceFormStatus::Todo => cell.fg(Color::Yellow),
        SurfaceFormStatus::Classified => cell.fg(Color::Green),
        SurfaceFormStatus::Ignored => cell.fg(Color::DarkGrey),
        SurfaceFormStatus::Rejected => cell.fg(Color::Red),
    }
}

/// Search results, one row per record.
pub fn records_table(records: &[RecordRef<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Id"),
        header_cell("Label"),
        header_cell("Fields"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for record in records {
        table.add_row(vec![
            Cell::new(record.section()),
            Cell::new(record.id()),
            Cell::new(record.label()).add_attribute(Attribute::Bold),
            Cell::new(field_summary(record)),
        ]);
    }
    table
}

/// `name=value` pairs of every field except the id and the label.
pub fn field_summary(record: &RecordRef<'_>) -> String {
    let schema: &RecordSchema = match record {
        RecordRef::PartOfSpeech(_) => PartOfSpeech::schema(),
        RecordRef::Root(_) => Root::schema(),
        RecordRef::Source(_) => Source::schema(),
        RecordRef::SurfaceForm(_) => SurfaceForm::schema(),
        RecordRef::User(_) => User::schema(),
    };
    let label = record.label();
    schema
        .attributes
        .iter()
        .chain(schema.values)
        .filter(|&&name| name != ID_ATTRIBUTE)
        .filter_map(|&name| record.field(name).map(|value| (name, value)))
        .filter(|(_, value)| value != label)
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn import_table(summary: &ImportSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Import"), header_cell("Lines")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("added"), count_cell(summary.added)]);
    table.add_row(vec![Cell::new("already known"), count_cell(summary.duplicates)]);
    table.add_row(vec![Cell::new("comments"), count_cell(summary.comments)]);
    table
}

/// One-line description of a surface form and where it came from.
pub fn describe_surface_form(db: &LanguageDatabase, sf: &SurfaceForm) -> String {
    let mut line = format!("#{} {:?} [{}]", sf.id(), sf.value, sf.status);
    if let Ok(Some(root)) = db.root_of(sf) {
        line.push_str(&format!(" root #{} {:?}", root.id(), root.value));
    }
    if let Ok(Some(source)) = db.source_of(sf) {
        line.push_str(&format!(" from {:?}", source.name));
    }
    line.push_str(&format!(
        " at {}",
        sf.date.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    line
}
