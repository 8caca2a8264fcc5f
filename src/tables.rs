use std::ops::Add;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    analysis::UnitAnalysis,
    core::{metrics::Metrics, record::CurtailmentRecord},
    quantity::power::Megawatts,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_metrics_table(analyses: &[UnitAnalysis]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Unit", "Minutes", "Notified", "Curtailed", "Cost"]);
    for analysis in analyses {
        table.add_row(metrics_row(
            Cell::new(&analysis.unit),
            analysis.frame.len(),
            &analysis.metrics,
        ));
    }
    let total =
        analyses.iter().map(|analysis| analysis.metrics).fold(Metrics::default(), Add::add);
    table.add_row(metrics_row(
        Cell::new("Total").add_attribute(Attribute::Bold),
        analyses.iter().map(|analysis| analysis.frame.len()).sum(),
        &total,
    ));
    table
}

fn metrics_row(unit: Cell, n_minutes: usize, metrics: &Metrics) -> Vec<Cell> {
    vec![
        unit,
        Cell::new(n_minutes).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
        Cell::new(metrics.notified_energy).set_alignment(CellAlignment::Right),
        Cell::new(metrics.curtailed_energy).set_alignment(CellAlignment::Right).fg(
            if metrics.curtailed_energy.0 > 0.0 { Color::Red } else { Color::Green },
        ),
        metrics.curtailment_cost.map_or_else(
            || Cell::new("n/a").add_attribute(Attribute::Dim),
            |cost| Cell::new(cost).set_alignment(CellAlignment::Right),
        ),
    ]
}

pub fn build_records_table(records: &[CurtailmentRecord]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Time", "FPN", "BOAL", "After BOAL", "Delta"]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.time.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(record.time.format("%H:%M")),
            Cell::new(record.level_fpn).set_alignment(CellAlignment::Right),
            record.level_boal.map_or_else(
                || Cell::new("").add_attribute(Attribute::Dim),
                |level| Cell::new(level).set_alignment(CellAlignment::Right),
            ),
            Cell::new(record.level_after_boal).set_alignment(CellAlignment::Right),
            Cell::new(record.delta_mw).set_alignment(CellAlignment::Right).fg(
                if record.delta_mw > Megawatts::ZERO { Color::Red } else { Color::Green },
            ),
        ]);
    }
    table
}
