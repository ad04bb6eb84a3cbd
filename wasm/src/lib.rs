use ran_graph_layout::{LayoutConfig, layout_document_json, parse_config};
use wasm_bindgen::prelude::*;

fn build_layout_config(config_json: Option<&str>) -> Result<LayoutConfig, String> {
    match config_json {
        Some(raw) if !raw.trim().is_empty() => parse_config(raw)
            .map(|config| config.layout)
            .map_err(|error| error.to_string()),
        _ => Ok(LayoutConfig::default()),
    }
}

/// Lays out a `{ nodes, edges }` document. `config_json` takes the same keys
/// as the CLI config file.
#[wasm_bindgen]
pub fn layout_graph_json(graph_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let config = build_layout_config(config_json.as_deref()).map_err(|error| JsValue::from_str(&error))?;
    layout_document_json(graph_json, &config, false).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use ran_graph_layout::{LayoutConfig, layout_document_json};

    use crate::build_layout_config;

    #[test]
    fn lays_out_graph_with_config_overrides() {
        let graph = r#"{
            "nodes": [
                {"id": "rrp-1", "type": "rrp"},
                {"id": "rrpmember-1", "type": "rrpmember"},
                {"id": "rrpmember-2", "type": "rrpmember"}
            ],
            "edges": [
                {"id": "e1", "source": "rrp-1", "target": "rrpmember-1"},
                {"id": "e2", "source": "rrp-1", "target": "rrpmember-2"}
            ]
        }"#;

        let config = build_layout_config(Some("{ rrpmemberSpacing: 200, marginY: 10 }")).unwrap();
        assert_eq!(config.rrpmember_spacing, 200.0);

        let output = layout_document_json(graph, &config, false).expect("graph should lay out");
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes[0]["position"]["y"], 10.0);
        assert_eq!(nodes[1]["position"]["x"], -100.0);
        assert_eq!(nodes[2]["position"]["x"], 100.0);
    }

    #[test]
    fn blank_config_uses_defaults() {
        let config = build_layout_config(Some("  ")).unwrap();
        assert_eq!(config.horizontal_spacing, LayoutConfig::default().horizontal_spacing);
        assert!(build_layout_config(Some("{ nodeWidth: ")).is_err());
    }
}
