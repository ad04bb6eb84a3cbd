use crate::ir::{Edge, Node};
use crate::layout::{Bounds, LayoutOutcome, LayoutResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A saved or exported editor graph: `{ nodes, edges, ... }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Other top-level fields (timestamps, viewport) carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LayoutDocument {
    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub removed_edges: usize,
    pub duplicate_edges: usize,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsDump>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BoundsDump {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Bounds> for BoundsDump {
    fn from(bounds: Bounds) -> Self {
        Self {
            x: bounds.min_x,
            y: bounds.min_y,
            width: bounds.width(),
            height: bounds.height(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutDump {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub report: LayoutReport,
}

impl LayoutDump {
    pub fn from_result(result: LayoutResult, extra: Map<String, Value>) -> Self {
        let fallback_reason = match &result.outcome {
            LayoutOutcome::Fallback(err) => Some(err.to_string()),
            _ => None,
        };
        let report = LayoutReport {
            removed_edges: result.removed_edges,
            duplicate_edges: result.duplicate_edges,
            used_fallback: result.outcome.is_fallback(),
            fallback_reason,
            bounds: result.bounds.map(BoundsDump::from),
        };
        LayoutDump {
            nodes: result.nodes,
            edges: result.cleaned_edges,
            extra,
            report,
        }
    }

    pub fn to_json(&self, pretty: bool) -> anyhow::Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }
}

pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump, pretty: bool) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            if pretty {
                serde_json::to_writer_pretty(&mut writer, dump)?;
            } else {
                serde_json::to_writer(&mut writer, dump)?;
            }
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(dump.to_json(pretty)?.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::compute_layout;
    use serde_json::json;

    #[test]
    fn document_keeps_unknown_top_level_fields() {
        let doc = LayoutDocument::from_json(
            r#"{"nodes": [{"id": "network-1", "type": "customNode", "position": {"x": 5, "y": 6},
                "data": {"type": "network"}, "selected": true}],
               "edges": [], "timestamp": 1750337555550}"#,
        )
        .unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.extra["timestamp"], json!(1750337555550u64));
        assert_eq!(doc.nodes[0].extra["selected"], json!(true));
    }

    #[test]
    fn dump_reports_removed_edges_and_fallback() {
        let doc = LayoutDocument::from_json(
            r#"{"nodes": [{"id": "a", "type": "network"}],
               "edges": [{"id": "a-x", "source": "a", "target": "x"}]}"#,
        )
        .unwrap();
        let extra = doc.extra.clone();
        let result = compute_layout(&doc.nodes, &doc.edges, &LayoutConfig::default());
        let dump = LayoutDump::from_result(result, extra);
        let value: Value = serde_json::from_str(&dump.to_json(false).unwrap()).unwrap();
        assert_eq!(value["report"]["removedEdges"], json!(1));
        assert_eq!(value["report"]["usedFallback"], json!(false));
        assert_eq!(value["edges"], json!([]));
        assert_eq!(value["nodes"][0]["position"], json!({"x": 0.0, "y": 0.0}));
    }
}
