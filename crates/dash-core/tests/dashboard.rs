//! Message-driven dashboard behavior.

use std::sync::Arc;
use std::time::Duration;

use dash_core::{
    ControlChange, Dashboard, DashboardMessage, HoverTarget, Section, SectionData, SectionId,
    SectionStatus, ShapeTag, slots,
};
use dash_ingest::parse_feature_collection;
use dash_model::{Dataset, DatasetKind, HoverPayload, Record, fields};

fn gsp_data(first: u32, last: u32) -> SectionData {
    let records = (first..=last)
        .map(|year| {
            Record::new()
                .with_text(fields::STATE, "Ohio")
                .with_number(fields::CENSUS_YEAR, f64::from(year))
                .with_number(fields::GSP, f64::from(year) - 1_900.0)
        })
        .collect();
    SectionData {
        dataset: Arc::new(Dataset::new(DatasetKind::Gsp.schema(), records)),
        features: None,
    }
}

fn household_data() -> SectionData {
    let row = |kind: &str, income: f64| {
        Record::new()
            .with_text(fields::HOUSEHOLD_TYPE, kind)
            .with_number(fields::CENSUS_YEAR, 2023.0)
            .with_number(fields::MEDIAN_INCOME, income)
    };
    SectionData {
        dataset: Arc::new(Dataset::new(
            DatasetKind::HouseholdIncome.schema(),
            vec![row("Family", 96_922.0), row("Nonfamily", 46_000.0)],
        )),
        features: None,
    }
}

fn employment_data() -> SectionData {
    let features = parse_feature_collection(
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Ohio"},"geometry":null}
        ]}"#,
    )
    .expect("geojson");
    SectionData {
        dataset: Arc::new(Dataset::new(
            DatasetKind::Employment.schema(),
            vec![
                Record::new()
                    .with_text(fields::STATE, "Ohio")
                    .with_number(fields::TOTAL_EMPLOYMENT, 5_600_000.0)
                    .with_number(fields::NET_CHANGE, 42_300.0)
                    .with_number(fields::PERCENT_CHANGE, 0.8),
            ],
        )),
        features: Some(features),
    }
}

fn loaded(section: SectionId, data: SectionData) -> DashboardMessage {
    DashboardMessage::Loaded {
        section,
        result: Ok(data),
    }
}

fn frames(dashboard: &Dashboard) -> usize {
    match dashboard.section(SectionId::Gsp) {
        Some(Section::Animation { animator }) => animator.surface().frames(),
        _ => 0,
    }
}

#[test]
fn animation_emits_one_frame_per_year_then_stops() {
    let mut dashboard: Dashboard = Dashboard::default();
    dashboard.update(loaded(SectionId::Gsp, gsp_data(2000, 2003)));
    let before = frames(&dashboard);

    dashboard.update(DashboardMessage::PlayPause);
    assert_eq!(dashboard.timers().active_count(), 1);
    let redraws = dashboard.advance_clock(Duration::from_secs(60));

    assert_eq!(redraws, 4);
    assert_eq!(frames(&dashboard) - before, 4);
    assert_eq!(dashboard.timers().active_count(), 0);
    assert_eq!(dashboard.advance_clock(Duration::from_secs(60)), 0);
}

#[test]
fn controls_before_load_are_ignored() {
    let mut dashboard: Dashboard = Dashboard::default();
    let redraws = dashboard.update(DashboardMessage::Control {
        section: SectionId::Household,
        change: ControlChange::toggle(slots::PLOT_ALL, true),
    });
    assert_eq!(redraws, 0);
    assert_eq!(dashboard.update(DashboardMessage::PlayPause), 0);
    assert_eq!(dashboard.status(SectionId::Household), SectionStatus::Loading);
}

#[test]
fn one_action_redraws_once() {
    let mut dashboard: Dashboard = Dashboard::default();
    assert_eq!(dashboard.update(loaded(SectionId::Household, household_data())), 1);

    let toggle = DashboardMessage::Control {
        section: SectionId::Household,
        change: ControlChange::toggle(slots::PLOT_ALL, true),
    };
    assert_eq!(dashboard.update(toggle.clone()), 1);
    assert_eq!(dashboard.update(toggle), 0);

    let Some(Section::Comparison { chart, .. }) = dashboard.section(SectionId::Household) else {
        panic!("household section not ready");
    };
    assert_eq!(chart.panel(0).expect("panel").count(ShapeTag::Bar), 2);
}

#[test]
fn failed_section_leaves_others_working() {
    let mut dashboard: Dashboard = Dashboard::default();
    dashboard.update(DashboardMessage::Loaded {
        section: SectionId::Indicators,
        result: Err("state_indicators.csv: not found".to_string()),
    });
    dashboard.update(loaded(SectionId::Household, household_data()));

    assert!(matches!(
        dashboard.status(SectionId::Indicators),
        SectionStatus::Failed(_)
    ));
    assert_eq!(dashboard.status(SectionId::Household), SectionStatus::Ready);
    let redraws = dashboard.update(DashboardMessage::Control {
        section: SectionId::Indicators,
        change: ControlChange::select(slots::VARIABLE, "gdp"),
    });
    assert_eq!(redraws, 0);
}

#[test]
fn map_hover_resolves_typed_payload() {
    let mut dashboard: Dashboard = Dashboard::default();
    dashboard.update(loaded(SectionId::Employment, employment_data()));
    dashboard.update(DashboardMessage::Hover {
        section: SectionId::Employment,
        target: Some(HoverTarget::Feature("Ohio".to_string())),
    });

    let payload = dashboard.hovered().expect("hovered");
    assert!(matches!(payload, HoverPayload::Employment { .. }));
    insta::assert_snapshot!(payload.tooltip_lines().join("\n"), @r"
    Ohio
    2024 Total Employment: 5,600,000
    Net Change Over Last 12 Months: 42,300
    Percent Change Over Last 12 Months: 0.8%
    ");

    dashboard.update(DashboardMessage::Hover {
        section: SectionId::Employment,
        target: None,
    });
    assert!(dashboard.hovered().is_none());
}

#[test]
fn bar_hover_uses_panel_payload() {
    let mut dashboard: Dashboard = Dashboard::default();
    dashboard.update(loaded(SectionId::Household, household_data()));
    // Panel 0 holds: y axis, axis label, one bar, title.
    dashboard.update(DashboardMessage::Hover {
        section: SectionId::Household,
        target: Some(HoverTarget::Shape { panel: 0, index: 2 }),
    });
    assert_eq!(
        dashboard.hovered(),
        Some(&HoverPayload::HouseholdBar {
            household_type: "Family".to_string(),
            income: 96_922.0,
        })
    );
}
