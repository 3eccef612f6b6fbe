use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use nutri_energy::EnergyPlan;
use nutri_model::{CategoryMap, CoverageMetric, IssueSeverity, QualityReport, ValidationReport};
use nutri_output::SearchPage;

use nutri_cli::types::RunOutcome;

pub fn print_run_summary(outcome: &RunOutcome) {
    let report = &outcome.report;
    println!("Dataset: {}", report.dataset.display());
    match (&report.sha256, report.dry_run) {
        (Some(sha256), _) => println!("SHA-256: {sha256}"),
        (None, true) => println!("Dry run: nothing written"),
        (None, false) => println!("Dataset not replaced"),
    }
    if let Some(path) = &report.backup {
        println!("Backup: {}", path.display());
    }
    if let Some(path) = &outcome.report_path {
        println!("Run report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Mapping"),
        header_cell("Verified"),
        header_cell("Records"),
        header_cell("Duplicates"),
        header_cell("Unique"),
        header_cell("Ids"),
    ]);
    apply_table_style(&mut table);
    for column in 2..=5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for source in &report.sources {
        let stats = report.merge.per_source.get(&source.tag);
        let ids = stats
            .and_then(|stats| stats.first_id.zip(stats.last_id))
            .map_or_else(|| "-".to_string(), |(first, last)| format!("{first}-{last}"));
        table.add_row(vec![
            Cell::new(source.tag)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(source.mapping.as_str()),
            count_cell(source.references_verified, Color::Green),
            Cell::new(source.records),
            count_cell(
                stats.map_or(0, |stats| stats.duplicates_removed),
                Color::Yellow,
            ),
            Cell::new(stats.map_or(0, |stats| stats.unique)),
            Cell::new(ids),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(report.merge.input).add_attribute(Attribute::Bold),
        count_cell(report.merge.duplicates_removed, Color::Yellow).add_attribute(Attribute::Bold),
        Cell::new(report.merge.unique).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");

    print_quality_table(&report.quality, report.previous_quality.as_ref());
    print_issue_table(&report.validation);

    if !report.unmapped_categories.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Unmapped category"),
            header_cell("Records"),
            header_cell("Closest entry"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for unmapped in &report.unmapped_categories {
            table.add_row(vec![
                Cell::new(&unmapped.name),
                Cell::new(unmapped.count),
                unmapped
                    .suggestion
                    .as_ref()
                    .map_or_else(|| dim_cell("-"), Cell::new),
            ]);
        }
        println!();
        println!("{table}");
    }

    let gate = &report.gate;
    for regression in &gate.coverage_regressions {
        eprintln!(
            "Coverage of {} dropped from {:.2}% to {:.2}% ({:.2} points)",
            regression.metric.label(),
            regression.previous,
            regression.current,
            regression.drop
        );
    }
    if !gate.overrides_applied.is_empty() {
        eprintln!("Overrides applied: {}", gate.overrides_applied.join(", "));
    }
    if gate.block_write {
        let mut hints = Vec::new();
        if !gate.coverage_regressions.is_empty() {
            hints.push("--accept-coverage-regression");
        }
        if !gate.blocking_issues.is_empty() {
            hints.push("--allow-validation-errors");
        }
        eprintln!(
            "error: canonical dataset not replaced. Use {} to override.",
            hints.join(" and ")
        );
    }
}

pub fn print_quality_table(current: &QualityReport, previous: Option<&QualityReport>) {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("Coverage"),
        header_cell("Records"),
        header_cell("Percent"),
    ];
    if previous.is_some() {
        header.push(header_cell("Previous"));
    }
    table.set_header(header);
    apply_table_style(&mut table);
    for column in 1..=3 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for metric in CoverageMetric::ALL {
        let stat = current.stat(metric);
        let mut row = vec![
            Cell::new(metric.label()),
            Cell::new(stat.count),
            Cell::new(format!("{:.2}%", stat.percent)),
        ];
        if let Some(previous) = previous {
            let before = previous.stat(metric).percent;
            let cell = Cell::new(format!("{before:.2}%"));
            row.push(if before > stat.percent {
                cell.fg(Color::Yellow)
            } else {
                cell.fg(Color::DarkGrey)
            });
        }
        table.add_row(row);
    }
    let mut empty = vec![
        Cell::new("no data"),
        count_cell(current.empty.count, Color::Yellow),
        Cell::new(format!("{:.2}%", current.empty.percent)),
    ];
    if previous.is_some() {
        empty.push(dim_cell("-"));
    }
    table.add_row(empty);
    println!();
    println!("Quality ({} records):", current.total_records);
    println!("{table}");
}

pub fn print_category_table(report: &QualityReport, categories: &CategoryMap) {
    if report.categories.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Label"),
        header_cell("Records"),
        header_cell("Without data"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for category in &report.categories {
        table.add_row(vec![
            Cell::new(&category.category),
            Cell::new(categories.label_for(&category.category)),
            Cell::new(category.count),
            count_cell(category.without_data, Color::Yellow),
        ]);
    }
    println!();
    println!("{table}");
}

pub fn print_issue_table(report: &ValidationReport) {
    if report.issues.is_empty() {
        return;
    }
    let mut issues: Vec<_> = report.issues.iter().collect();
    issues.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.source.cmp(&b.source))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Source"),
        header_cell("Field"),
        header_cell("Count"),
        header_cell("Message"),
        header_cell("Examples"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(&issue.code),
            issue
                .source
                .map_or_else(|| dim_cell("-"), Cell::new),
            issue.field.as_ref().map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(issue.count).fg(severity_color(issue.severity)),
            Cell::new(&issue.message),
            if issue.examples.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(issue.examples.join("; "))
            },
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn print_search_page(page: &SearchPage) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Source"),
        header_cell("Name"),
        header_cell("Category"),
        header_cell("kcal"),
        header_cell("Protein g"),
        header_cell("Lipids g"),
        header_cell("Carb g"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for column in 4..=7 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for record in &page.items {
        let nutrients = &record.nutrients;
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(record.source),
            Cell::new(&record.name),
            Cell::new(&record.category),
            Cell::new(format!("{:.2}", nutrients.energy_kcal)),
            Cell::new(format!("{:.2}", nutrients.protein_g)),
            Cell::new(format!("{:.2}", nutrients.lipids_g)),
            Cell::new(format!("{:.2}", nutrients.carbohydrate_g)),
        ]);
    }
    println!("{table}");
    println!(
        "Page {} of {} ({} matching)",
        page.page,
        page.total_pages.max(1),
        page.filtered_count
    );
}

pub fn print_energy_plan(plan: &EnergyPlan) {
    let bmr = &plan.bmr;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("kcal/day")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(format!("BMR ({})", bmr.used.info().name)),
        Cell::new(format!("{:.1}", bmr.kcal)),
    ]);
    table.add_row(vec![
        Cell::new("BMR with conditions"),
        Cell::new(format!("{:.1}", plan.adjusted_bmr)),
    ]);
    table.add_row(vec![
        Cell::new("Total energy expenditure"),
        Cell::new(format!("{:.1}", plan.total_energy_expenditure)),
    ]);
    table.add_row(vec![
        Cell::new("Target").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}", plan.target_kcal))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    if let Some(reason) = bmr.fallback {
        eprintln!(
            "note: {} was not used ({reason}); fell back to {}",
            bmr.requested.info().name,
            bmr.used.info().name
        );
    }

    let macros = &plan.macros;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Macronutrient"), header_cell("g/day")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Carbohydrate"),
        Cell::new(format!("{:.1}", macros.carbohydrate_g)),
    ]);
    table.add_row(vec![
        Cell::new("Protein"),
        Cell::new(format!("{:.1}", macros.protein_g)),
    ]);
    table.add_row(vec![
        Cell::new("Fat"),
        Cell::new(format!("{:.1}", macros.fat_g)),
    ]);
    println!("{table}");
}

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

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        IssueSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_color(severity: IssueSeverity) -> Color {
    match severity {
        IssueSeverity::Error => Color::Red,
        IssueSeverity::Warning => Color::Yellow,
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
