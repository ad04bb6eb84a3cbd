use crate::ir::NodeType;
use serde::{Deserialize, Serialize};
use std::path::Path;

const PRESERVE_FLAGS: [&str; 6] = [
    "recentlyCreated",
    "ensureVisible",
    "persistNode",
    "preserveInLayout",
    "positionLocked",
    "permanent",
];

/// A node type whose instances share one horizontal row, whatever their parents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedRow {
    pub node_type: NodeType,
    pub spacing: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub columns: usize,
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub preserve_flags: Vec<String>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            columns: 5,
            spacing_x: 300.0,
            spacing_y: 200.0,
            origin_x: 100.0,
            origin_y: 100.0,
            preserve_flags: PRESERVE_FLAGS.iter().map(|flag| flag.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Gap between generic siblings and between multiple roots.
    pub horizontal_spacing: f32,
    pub rrpmember_spacing: f32,
    pub vertical_spacing: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub rrp_band_row_height: f32,
    pub unified_rows: Vec<UnifiedRow>,
    pub balance_by_subtree: bool,
    pub use_parent_id_fallback: bool,
    pub fallback: FallbackConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 120.0,
            horizontal_spacing: 350.0,
            rrpmember_spacing: 150.0,
            vertical_spacing: 200.0,
            margin_x: 0.0,
            margin_y: 0.0,
            rrp_band_row_height: 28.0,
            unified_rows: [
                NodeType::Dnn,
                NodeType::Rrp,
                NodeType::CellArea,
                NodeType::SNssai,
            ]
            .into_iter()
            .map(|node_type| UnifiedRow {
                node_type,
                spacing: 400.0,
            })
            .collect(),
            balance_by_subtree: false,
            use_parent_id_fallback: true,
            fallback: FallbackConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnifiedRowFile {
    node_type: NodeType,
    spacing: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FallbackConfigFile {
    columns: Option<usize>,
    spacing_x: Option<f32>,
    spacing_y: Option<f32>,
    origin_x: Option<f32>,
    origin_y: Option<f32>,
    preserve_flags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    horizontal_spacing: Option<f32>,
    rrpmember_spacing: Option<f32>,
    vertical_spacing: Option<f32>,
    margin_x: Option<f32>,
    margin_y: Option<f32>,
    rrp_band_row_height: Option<f32>,
    unified_spacing: Option<f32>,
    unified_rows: Option<Vec<UnifiedRowFile>>,
    balance_by_subtree: Option<bool>,
    use_parent_id_fallback: Option<bool>,
    fallback: Option<FallbackConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses JSON5 overrides (comments and trailing commas allowed) over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;
    apply_overrides(&mut config.layout, parsed);
    Ok(config)
}

fn apply_overrides(layout: &mut LayoutConfig, parsed: ConfigFile) {
    if let Some(v) = parsed.node_width {
        layout.node_width = v;
    }
    if let Some(v) = parsed.node_height {
        layout.node_height = v;
    }
    if let Some(v) = parsed.horizontal_spacing {
        layout.horizontal_spacing = v;
    }
    if let Some(v) = parsed.rrpmember_spacing {
        layout.rrpmember_spacing = v;
    }
    if let Some(v) = parsed.vertical_spacing {
        layout.vertical_spacing = v;
    }
    if let Some(v) = parsed.margin_x {
        layout.margin_x = v;
    }
    if let Some(v) = parsed.margin_y {
        layout.margin_y = v;
    }
    if let Some(v) = parsed.rrp_band_row_height {
        layout.rrp_band_row_height = v;
    }
    // A bare spacing applies to every row; an explicit row list replaces the set.
    if let Some(v) = parsed.unified_spacing {
        for row in &mut layout.unified_rows {
            row.spacing = v;
        }
    }
    if let Some(rows) = parsed.unified_rows {
        let default_spacing = layout
            .unified_rows
            .first()
            .map(|row| row.spacing)
            .unwrap_or(400.0);
        layout.unified_rows = rows
            .into_iter()
            .filter(|row| row.node_type != NodeType::Unknown)
            .map(|row| UnifiedRow {
                node_type: row.node_type,
                spacing: row.spacing.unwrap_or(default_spacing),
            })
            .collect();
    }
    if let Some(v) = parsed.balance_by_subtree {
        layout.balance_by_subtree = v;
    }
    if let Some(v) = parsed.use_parent_id_fallback {
        layout.use_parent_id_fallback = v;
    }
    if let Some(fallback) = parsed.fallback {
        if let Some(v) = fallback.columns {
            layout.fallback.columns = v;
        }
        if let Some(v) = fallback.spacing_x {
            layout.fallback.spacing_x = v;
        }
        if let Some(v) = fallback.spacing_y {
            layout.fallback.spacing_y = v;
        }
        if let Some(v) = fallback.origin_x {
            layout.fallback.origin_x = v;
        }
        if let Some(v) = fallback.origin_y {
            layout.fallback.origin_y = v;
        }
        if let Some(v) = fallback.preserve_flags {
            layout.fallback.preserve_flags = v;
        }
    }
}
