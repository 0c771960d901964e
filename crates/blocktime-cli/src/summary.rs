use blocktime_common::any_to_string;
use blocktime_model::{DatasetKind, FactTable, RowIssue};
use blocktime_reconcile::ReconcileStats;
use blocktime_report::{Overview, SpecialtyReport};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

pub fn print_stats(stats: &ReconcileStats, facts: &FactTable) {
    println!("Cases: {}", stats.cases);
    println!("Fact columns: {}", facts.column_names().len());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Match"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("Roster matches", stats.roster_matches),
        ("Division specialty", stats.division_matches),
        ("Dictionary (full name)", stats.dictionary_primary_matches),
        ("Dictionary (second part)", stats.dictionary_secondary_matches),
        ("Robot-assisted overrides", stats.robot_overrides),
        ("Burn overrides", stats.burn_overrides),
        ("Availability matches", stats.availability_matches),
    ];
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), count_cell(count, Color::Green)]);
    }
    let warnings = [
        ("UNDEFINED specialty", stats.undefined),
        ("Unparsed timestamps", stats.unparsed_timestamps),
        ("Ambiguous dictionary names", stats.ambiguous_dictionary_names),
        ("Duplicate roster names", stats.duplicate_roster_names),
    ];
    for (label, count) in warnings {
        table.add_row(vec![Cell::new(label), count_cell(count, Color::Yellow)]);
    }
    println!("{table}");
}

pub fn print_issues(issues: &[RowIssue], limit: usize) {
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Problem"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for issue in issues.iter().take(limit) {
        table.add_row(vec![
            dataset_cell(issue.dataset),
            Cell::new(issue.row),
            Cell::new(&issue.column),
            Cell::new(issue.kind.as_str()).fg(Color::Yellow),
            Cell::new(&issue.value),
        ]);
    }
    println!();
    println!("Malformed cells ({} total):", issues.len());
    println!("{table}");
    if issues.len() > limit {
        println!("... {} more", issues.len() - limit);
    }
}

pub fn print_overview(overview: &Overview) {
    println!("Total utilization: {}", rate_text(overview.total_rate));
    println!("Mean monthly utilization: {}", rate_text(overview.mean_monthly_rate));

    let mut monthly = Table::new();
    monthly.set_header(vec![
        header_cell("Month"),
        header_cell("Patient Hours"),
        header_cell("Available Hours"),
        header_cell("Utilization %"),
    ]);
    apply_summary_table_style(&mut monthly);
    for column in 1..4 {
        align_column(&mut monthly, column, CellAlignment::Right);
    }
    for row in &overview.monthly {
        monthly.add_row(vec![
            Cell::new(format!("{}-{:02}", row.year, row.month)),
            Cell::new(format!("{:.2}", row.patient_hours)),
            optional_cell(row.available_hours),
            optional_cell(row.utilization_rate),
        ]);
    }
    println!("{monthly}");

    let mut ranking = Table::new();
    ranking.set_header(vec![
        header_cell("Rank"),
        header_cell("Specialty"),
        header_cell("Mean Utilization %"),
    ]);
    apply_table_style(&mut ranking);
    align_column(&mut ranking, 0, CellAlignment::Right);
    align_column(&mut ranking, 2, CellAlignment::Right);
    for (idx, rank) in overview.ranking.iter().enumerate() {
        ranking.add_row(vec![
            dim_cell(idx + 1),
            specialty_cell(rank.specialty.as_str()),
            optional_cell(rank.mean_rate),
        ]);
    }
    println!();
    println!("Specialties by mean monthly utilization:");
    println!("{ranking}");
    println!(
        "Top {}: {}",
        overview.top.len(),
        join_codes(overview.top.iter().map(|r| r.specialty.as_str()))
    );
    println!(
        "Bottom {}: {}",
        overview.bottom.len(),
        join_codes(overview.bottom.iter().map(|r| r.specialty.as_str()))
    );
}

pub fn print_specialty_report(report: &SpecialtyReport) {
    let mut weekdays = Table::new();
    weekdays.set_header(vec![
        header_cell("Weekday"),
        header_cell("Patient Hours"),
        header_cell("Available Hours"),
        header_cell("Utilization %"),
    ]);
    apply_summary_table_style(&mut weekdays);
    for column in 1..4 {
        align_column(&mut weekdays, column, CellAlignment::Right);
    }
    for total in &report.weekday_totals {
        weekdays.add_row(vec![
            Cell::new(total.weekday.as_str()),
            Cell::new(format!("{:.2}", total.patient_hours)),
            Cell::new(format!("{:.2}", total.available_hours)),
            optional_cell(total.utilization_rate),
        ]);
    }
    println!();
    match &report.filter.specialty {
        Some(specialty) => println!("Weekday utilization for {specialty}:"),
        None => println!("Weekday utilization, all specialties:"),
    }
    println!("{weekdays}");

    let mut distribution = Table::new();
    distribution.set_header(vec![
        header_cell("Specialty"),
        header_cell("Cases"),
        header_cell("Mean Minutes"),
        header_cell("Median Minutes"),
    ]);
    apply_table_style(&mut distribution);
    for column in 1..4 {
        align_column(&mut distribution, column, CellAlignment::Right);
    }
    for row in &report.distribution {
        distribution.add_row(vec![
            specialty_cell(row.specialty.as_str()),
            Cell::new(row.cases),
            optional_cell(row.mean_minutes),
            optional_cell(row.median_minutes),
        ]);
    }
    println!("{distribution}");

    let mut surgeons = Table::new();
    surgeons.set_header(vec![
        header_cell("Surgeon"),
        header_cell("Cases"),
        header_cell("Mean Minutes"),
    ]);
    apply_table_style(&mut surgeons);
    align_column(&mut surgeons, 1, CellAlignment::Right);
    align_column(&mut surgeons, 2, CellAlignment::Right);
    for row in &report.surgeons {
        surgeons.add_row(vec![
            Cell::new(&row.surgeon),
            Cell::new(row.total_cases),
            optional_cell(row.mean_patient_minutes),
        ]);
    }
    println!("{surgeons}");
}

pub fn print_frame_preview(kind: DatasetKind, df: &DataFrame, rows: usize) {
    println!("Dataset: {} ({kind})", kind.label());
    println!("Records: {}", df.height());
    println!("Columns: {}", df.width());
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .into_iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for idx in 0..df.height().min(rows) {
        let cells: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| {
                let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
                if value.is_empty() {
                    dim_cell("-")
                } else {
                    Cell::new(value)
                }
            })
            .collect();
        table.add_row(cells);
    }
    println!("{table}");
}

fn rate_text(rate: Option<f64>) -> String {
    rate.map_or_else(|| "-".to_string(), |value| format!("{value:.2}%"))
}

fn join_codes<'a>(codes: impl Iterator<Item = &'a str>) -> String {
    let joined = codes.collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "-".to_string() } else { joined }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dataset_cell(kind: DatasetKind) -> Cell {
    Cell::new(kind.key())
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn specialty_cell(code: &str) -> Cell {
    if code == blocktime_model::codes::UNDEFINED {
        Cell::new(code).fg(Color::DarkGrey)
    } else {
        Cell::new(code)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.2}")),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
