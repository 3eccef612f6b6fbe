use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{debug, info, info_span, warn};

use nutri_cli::logging::redact_value;
use nutri_cli::pipeline::{RunOptions, run};
use nutri_cli::types::RunOutcome;
use nutri_energy::{
    AnthropometricProfile, EnergyPlan, EnergyRequest, MacroSplit, SpecialConditions, Trimester,
};
use nutri_map::MappingRepository;
use nutri_model::SourceTag;
use nutri_output::{SearchQuery, SortOrder, categories, read_canonical, search};
use nutri_standards::{builtin_mapping, default_category_map, load_config};
use nutri_validate::{CheckOptions, GateOverrides, report, run_checks};

use crate::cli::{EnergyArgs, ReportArgs, RunArgs, SearchArgs, SourcesArgs};
use crate::summary::{
    apply_table_style, header_cell, print_category_table, print_energy_plan, print_issue_table,
    print_quality_table, print_search_page,
};

pub fn run_pipeline(args: &RunArgs) -> Result<RunOutcome> {
    let span = info_span!("run", config = %args.config.display());
    let _guard = span.enter();
    let config = load_config(&args.config)
        .with_context(|| format!("load configuration {}", args.config.display()))?;
    debug!(source_count = config.sources.len(), "configuration loaded");
    let options = RunOptions {
        overrides: GateOverrides {
            accept_coverage_regression: args.accept_coverage_regression,
            allow_validation_errors: args.allow_validation_errors,
        },
        allow_unverified_mappings: args.allow_unverified_mappings,
        last_updated: args.last_updated,
        dry_run: args.dry_run,
        ..RunOptions::default()
    };
    run(&config, &options)
}

pub fn run_report(args: &ReportArgs) -> Result<()> {
    let dataset = read_canonical(&args.dataset)
        .with_context(|| format!("read dataset {}", args.dataset.display()))?;
    let quality = report(&dataset.alimentos);
    let validation = run_checks(&dataset.alimentos, &CheckOptions::default());
    if args.json {
        let json = serde_json::json!({
            "dataset": args.dataset,
            "lastUpdated": dataset.last_updated,
            "quality": quality,
            "validation": validation,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }
    println!("Dataset: {}", args.dataset.display());
    println!("Last updated: {}", dataset.last_updated);
    print_quality_table(&quality, None);
    print_category_table(&quality, &default_category_map());
    print_issue_table(&validation);
    Ok(())
}

pub fn run_search(args: &SearchArgs) -> Result<()> {
    let start = Instant::now();
    let dataset = read_canonical(&args.dataset)
        .with_context(|| format!("read dataset {}", args.dataset.display()))?;
    let source = args.source.map(SourceTag::from);
    if let Some(category) = &args.category
        && !categories(&dataset, source).contains(category)
    {
        info!(category = %category, "category not present in dataset");
    }
    let query = SearchQuery {
        text: args.query.clone(),
        category: args.category.clone(),
        source,
        page: args.page,
        limit: args.limit,
        sort: args.sort.into(),
        order: if args.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        },
    };
    let page = search(&dataset, &query);
    debug!(
        filtered_count = page.filtered_count,
        duration_ms = start.elapsed().as_millis(),
        "search complete"
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_search_page(&page);
    }
    Ok(())
}

pub fn run_energy(args: &EnergyArgs) -> Result<()> {
    let mut profile =
        AnthropometricProfile::new(args.weight, args.height, args.age, args.sex.into())
            .with_conditions(SpecialConditions {
                pregnancy: args.trimester.and_then(Trimester::from_number),
                lactation: args.lactation.map(Into::into),
                thyroid: args.thyroid,
                metabolic_disorder: args.metabolic_disorder,
            });
    if let Some(body_fat) = args.body_fat {
        profile = profile.with_body_fat(body_fat);
    }
    if let Some(lean_mass) = args.lean_mass {
        profile = profile.with_lean_mass(lean_mass);
    }
    debug!(
        weight_kg = redact_value(&args.weight.to_string()),
        height_cm = redact_value(&args.height.to_string()),
        age_years = redact_value(&args.age.to_string()),
        "energy profile"
    );
    let request = EnergyRequest {
        profile,
        equation: args.equation.into(),
        activity: args.activity.into(),
        objective: args.objective.into(),
        split: MacroSplit::new(args.carb, args.protein, args.fat),
    };
    let split_total = request.split.total_pct();
    if (split_total - 100.0).abs() > 0.01 {
        warn!(total_pct = split_total, "macro split does not sum to 100%");
    }
    let plan = EnergyPlan::compute(&request).context("compute energy plan")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_energy_plan(&plan);
    }
    Ok(())
}

pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Description"),
        header_cell("Layout"),
        header_cell("Columns"),
        header_cell("References"),
        header_cell("Id offset"),
    ]);
    apply_table_style(&mut table);
    for index in 3..=5 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    for tag in SourceTag::ALL {
        let mapping = builtin_mapping(tag);
        table.add_row(vec![
            Cell::new(tag),
            Cell::new(tag.description()),
            Cell::new(mapping.layout),
            Cell::new(mapping.width()),
            Cell::new(mapping.references.len()),
            Cell::new(tag.default_id_offset()),
        ]);
    }
    println!("{table}");

    if let Some(dir) = &args.export {
        let repository = MappingRepository::new(dir.clone())?;
        for tag in SourceTag::ALL {
            let path = repository.save_columns(&builtin_mapping(tag))?;
            println!("Wrote {}", path.display());
        }
        let path = repository.save_categories(&default_category_map())?;
        println!("Wrote {}", path.display());
    }

    if let Some(dir) = &args.list {
        if !dir.is_dir() {
            anyhow::bail!("mapping directory {} does not exist", dir.display());
        }
        let stored = MappingRepository::new(dir.clone())?.list()?;
        if stored.is_empty() {
            println!("No stored mappings in {}; built-ins apply.", dir.display());
            return Ok(());
        }
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Source"),
            header_cell("Kind"),
            header_cell("File"),
        ]);
        apply_table_style(&mut table);
        for entry in stored {
            table.add_row(vec![
                entry
                    .source
                    .map_or_else(|| Cell::new("all"), Cell::new),
                Cell::new(entry.kind.as_str()),
                Cell::new(entry.file_path.display()),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}
