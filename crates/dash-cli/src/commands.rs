use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, warn};

use dash_cli::config::DashboardConfig;
use dash_cli::summary::{SectionRow, bar_table, fill_table, legend_lines, section_table, series_table};
use dash_core::vocabulary::{extract, extract_dependent};
use dash_core::{
    AnimationConfig, Animator, ChoroplethController, ChoroplethStyle, ComparisonController,
    ComparisonStyle, ControlChange, Controls, Dashboard, DashboardMessage, LineChartController,
    MapSurface, RecordingMapSurface, RecordingSurface, Section, SectionData, SectionId,
    SectionStatus, Surface, TimerQueue, ViewController, comparison_slots, indicator_slots, slots,
};
use dash_ingest::{CsvDataSource, DataSource, load_feature_collection};
use dash_model::{Dataset, DatasetKind, format_numeric};

use crate::cli::{
    AnimateArgs, ChartArgs, CompareArgs, ComparisonArg, DashboardArgs, MapArg, MapArgs,
    OptionsArgs,
};

pub fn run_options(args: &OptionsArgs) -> Result<()> {
    let dataset = load(&args.csv, args.schema.kind())?;
    if dataset.schema.field(&args.field).is_none() {
        bail!(
            "field '{}' is not part of the {} schema",
            args.field,
            dataset.kind()
        );
    }
    let options = match &args.when {
        Some((field, value)) => extract_dependent(&dataset.records, field, value, &args.field),
        None => extract(&dataset.records, &args.field),
    };
    if options.is_empty() {
        warn!(field = %args.field, "no options");
    }
    for option in options.iter() {
        println!("{option}");
    }
    Ok(())
}

pub fn run_chart(args: &ChartArgs) -> Result<()> {
    let dataset = load(&args.csv, DatasetKind::StateIndicators)?;
    let mut controls = Controls::new(Arc::clone(&dataset), indicator_slots());
    if let Some(variable) = &args.variable {
        controls.apply(&ControlChange::select(slots::VARIABLE, variable))?;
    }
    if let Some(percentile) = &args.percentile {
        controls.apply(&ControlChange::select(slots::PERCENTILE, percentile))?;
    }
    controls.apply(&ControlChange::select_many(slots::STATES, &args.states))?;

    let state = controls.state();
    println!(
        "{} / {} / {} state(s)",
        state.single(slots::VARIABLE).unwrap_or("-"),
        state.single(slots::PERCENTILE).unwrap_or("-"),
        state.many(slots::STATES).len()
    );

    let mut chart = LineChartController::new(dataset, RecordingSurface::new());
    chart.on_state_change(state);
    let series: Vec<_> = chart.surface().series().collect();
    if series.is_empty() {
        println!("Nothing to draw.");
        return Ok(());
    }
    if let Some(scales) = chart.scales() {
        println!(
            "x {}..{}  y {}..{}",
            format_numeric(scales.x.domain.min),
            format_numeric(scales.x.domain.max),
            format_numeric(scales.y.domain.min),
            format_numeric(scales.y.domain.max)
        );
    }
    println!("{}", series_table(&series));
    if args.paths {
        for shape in &series {
            println!("{}  {}", shape.key, shape.path_data());
        }
    }
    Ok(())
}

pub fn run_compare(args: &CompareArgs) -> Result<()> {
    let (kind, style) = match args.schema {
        ComparisonArg::Household => (DatasetKind::HouseholdIncome, ComparisonStyle::Household),
        ComparisonArg::Age => (DatasetKind::AgeIncome, ComparisonStyle::Age),
    };
    let dataset = load(&args.csv, kind)?;
    let mut controls = Controls::new(
        Arc::clone(&dataset),
        comparison_slots(style.category_field()),
    );
    let changes = [
        args.year.as_deref().map(|y| ControlChange::select(slots::YEAR, y)),
        args.option_1
            .as_deref()
            .map(|o| ControlChange::select(slots::OPTION_1, o)),
        args.option_2
            .as_deref()
            .map(|o| ControlChange::select(slots::OPTION_2, o)),
        Some(ControlChange::toggle(slots::PLOT_ALL, args.plot_all)),
    ];
    for change in changes.iter().flatten() {
        controls.apply(change)?;
    }

    let mut chart = ComparisonController::new(
        dataset,
        style,
        [RecordingSurface::new(), RecordingSurface::new()],
    );
    chart.on_state_change(controls.state());
    println!(
        "Year {}",
        controls.state().single(slots::YEAR).unwrap_or("-")
    );
    for index in 0..2 {
        let Some(panel) = chart.panel(index) else {
            continue;
        };
        let bars: Vec<_> = panel.bars().collect();
        if bars.is_empty() {
            debug!(panel = index + 1, "panel empty");
            continue;
        }
        let title = panel.labels().last().unwrap_or("-");
        println!("Panel {}: {title}", index + 1);
        println!("{}", bar_table(&bars));
    }
    Ok(())
}

pub fn run_map(args: &MapArgs) -> Result<()> {
    let (kind, style) = match args.schema {
        MapArg::Unemployment => (DatasetKind::Unemployment, ChoroplethStyle::Unemployment),
        MapArg::Employment => (DatasetKind::Employment, ChoroplethStyle::Employment),
    };
    let dataset = load(&args.csv, kind)?;
    let features = load_feature_collection(&args.geojson)
        .with_context(|| format!("load {}", args.geojson.display()))?;
    let mut chart = ChoroplethController::new(dataset, features, style, RecordingMapSurface::new());
    chart.render();

    let surface = chart.surface();
    println!("{}", fill_table(&surface.fills));
    for line in legend_lines(&surface.legend_title, &surface.legend) {
        println!("{line}");
    }
    if let Some(name) = &args.hover {
        let Some(payload) = chart.hover(name) else {
            bail!("no state named '{name}' in {}", args.geojson.display());
        };
        println!();
        for line in payload.tooltip_lines() {
            println!("{line}");
        }
    }
    Ok(())
}

/// Plays the animation against the wall clock until the last year is drawn.
pub fn run_animate(args: &AnimateArgs) -> Result<()> {
    if !(args.step.is_finite() && args.step > 0.0) {
        bail!("--step must be a positive number, got {}", args.step);
    }
    let dataset = load(&args.csv, DatasetKind::Gsp)?;
    let config = AnimationConfig {
        interval: Duration::from_millis(args.interval_ms.max(1)),
        step: args.step,
    };
    let mut animator = Animator::new(dataset, RecordingSurface::new(), config);
    let mut timers = TimerQueue::new();
    let Some(domain) = animator.domain() else {
        bail!("{} has no years to animate", args.csv.display());
    };
    println!(
        "Years {}..{}",
        format_numeric(domain.min),
        format_numeric(domain.max)
    );
    if !animator.play(&mut timers) {
        bail!("animation could not start");
    }
    while let Some(deadline) = timers.next_deadline() {
        thread::sleep(deadline.saturating_sub(timers.now()));
        while let Some(id) = timers.pop_due(deadline) {
            let drawn = animator.cursor();
            let Some(outcome) = animator.on_tick(id, &mut timers) else {
                continue;
            };
            let year = drawn.map_or_else(|| "-".to_string(), format_numeric);
            println!(
                "frame {:>3}  through {year}  {} shapes",
                animator.surface().frames(),
                outcome.shapes()
            );
        }
        timers.settle(deadline);
        if !animator.is_playing() {
            break;
        }
    }
    info!(frames = animator.surface().frames(), "animation finished");
    Ok(())
}

/// Loads every configured section into one dashboard. Returns true when
/// any section failed.
pub fn run_dashboard(args: &DashboardArgs) -> Result<bool> {
    let config = DashboardConfig::load(&args.config)?;
    let span = info_span!("dashboard", config = %args.config.display());
    let _guard = span.enter();

    let source = CsvDataSource::new();
    let mut dashboard: Dashboard = Dashboard::new(config.animation_config());
    for section in SectionId::ALL {
        let result = match config.csv_path(section) {
            Some(csv) => SectionData::load(&source, section, csv, config.geojson_path())
                .map_err(|err| err.to_string()),
            None => Err(format!("no `data` path configured for {section}")),
        };
        dashboard.update(DashboardMessage::Loaded { section, result });
    }

    let rows: Vec<SectionRow> = SectionId::ALL
        .into_iter()
        .map(|section| {
            let dataset = dashboard.section(section).and_then(section_dataset);
            SectionRow {
                section,
                records: dataset.map(Dataset::len),
                issues: dataset.map_or(0, |d| d.issues.len()),
                status: dashboard.status(section),
            }
        })
        .collect();
    println!("{}", section_table(&rows));
    Ok(rows
        .iter()
        .any(|row| matches!(row.status, SectionStatus::Failed(_))))
}

fn section_dataset<S, M>(section: &Section<S, M>) -> Option<&Dataset>
where
    S: Surface,
    M: MapSurface,
{
    match section {
        Section::Indicators { controls, .. } | Section::Comparison { controls, .. } => {
            Some(controls.dataset().as_ref())
        }
        Section::Map { chart } => Some(chart.dataset()),
        Section::Animation { animator } => Some(animator.dataset()),
    }
}

fn load(path: &Path, kind: DatasetKind) -> Result<Arc<Dataset>> {
    let dataset = CsvDataSource::new()
        .load_kind(path, kind)
        .with_context(|| format!("load {}", path.display()))?;
    if !dataset.issues.is_empty() {
        warn!(
            path = %path.display(),
            issues = dataset.issues.len(),
            "values could not be read and were left empty"
        );
    }
    Ok(dataset)
}
