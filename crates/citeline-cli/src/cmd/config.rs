//! `citeline config` - show effective configuration

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use citeline_core::{DAMPING_FACTOR, MIN_RING_LENGTH};

use crate::config::Config;

pub fn show(config: &Config) {
    eprintln!("\n{}", settings_table(config));
}

fn settings_table(config: &Config) -> Table {
    let resolver = &config.analysis.resolver;
    let graph = &config.analysis.graph;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec![
        "Fuzzy threshold".to_string(),
        format!("{:.2}", resolver.fuzzy_threshold),
    ]);
    table.add_row(vec![
        "Edit distance ratio".to_string(),
        format!("{:.2} (min 2 edits)", resolver.distance_ratio),
    ]);
    table.add_row(vec![
        "Known typos".to_string(),
        resolver.known_typos.len().to_string(),
    ]);
    table.add_row(vec![
        "Venue renames".to_string(),
        resolver.venue_renames.len().to_string(),
    ]);
    table.add_row(vec!["PageRank damping".to_string(), DAMPING_FACTOR.to_string()]);
    table.add_row(vec![
        "PageRank tolerance".to_string(),
        format!("{:e}", graph.pagerank_tolerance),
    ]);
    table.add_row(vec![
        "PageRank max iterations".to_string(),
        graph.pagerank_max_iterations.to_string(),
    ]);
    table.add_row(vec!["Min ring length".to_string(), MIN_RING_LENGTH.to_string()]);
    table.add_row(vec!["Cycle budget".to_string(), graph.max_cycles.to_string()]);
    table.add_row(vec!["Top cited".to_string(), graph.top_cited.to_string()]);
    table.add_row(vec![
        "Method phrases".to_string(),
        config.analysis.extraction.method_phrases.len().to_string(),
    ]);
    table.add_row(vec![
        "Report path".to_string(),
        config
            .output
            .report
            .as_ref()
            .map_or_else(|| "not set".to_string(), |p| p.display().to_string()),
    ]);
    table
}
