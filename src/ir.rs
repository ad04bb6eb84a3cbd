use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const SOURCE_HANDLE: &str = "bottom-source";
pub const TARGET_HANDLE: &str = "top-target";

const DEFAULT_NODE_WIDTH: f32 = 180.0;

/// Domain node types, ordered along the configuration hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Network,
    CellArea,
    Rrp,
    #[serde(rename = "rrpmember")]
    RrpMember,
    #[serde(rename = "s-nssai")]
    SNssai,
    Dnn,
    #[serde(rename = "qosflow")]
    QosFlow,
    #[serde(rename = "fiveqi", alias = "5qi")]
    FiveQi,
    #[serde(other)]
    Unknown,
}

impl NodeType {
    pub const ALL: [NodeType; 8] = [
        NodeType::Network,
        NodeType::CellArea,
        NodeType::Rrp,
        NodeType::RrpMember,
        NodeType::SNssai,
        NodeType::Dnn,
        NodeType::QosFlow,
        NodeType::FiveQi,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "network" => Some(Self::Network),
            "cell-area" => Some(Self::CellArea),
            "rrp" => Some(Self::Rrp),
            "rrpmember" => Some(Self::RrpMember),
            "s-nssai" => Some(Self::SNssai),
            "dnn" => Some(Self::Dnn),
            "qosflow" => Some(Self::QosFlow),
            "fiveqi" | "5qi" => Some(Self::FiveQi),
            _ => None,
        }
    }

    /// Infers a type from an editor-generated id such as `rrp-1750337216606-1118`.
    /// Longer prefixes are checked first so `rrpmember-*` never reads as `rrp`.
    pub fn from_id_prefix(id: &str) -> Option<Self> {
        const PREFIXES: [(&str, NodeType); 9] = [
            ("s-nssai", NodeType::SNssai),
            ("rrpmember", NodeType::RrpMember),
            ("cell-area", NodeType::CellArea),
            ("qosflow", NodeType::QosFlow),
            ("network", NodeType::Network),
            ("fiveqi", NodeType::FiveQi),
            ("5qi", NodeType::FiveQi),
            ("dnn", NodeType::Dnn),
            ("rrp", NodeType::Rrp),
        ];
        PREFIXES
            .iter()
            .find(|(prefix, _)| {
                id.strip_prefix(prefix)
                    .map(|rest| rest.is_empty() || rest.starts_with('-'))
                    .unwrap_or(false)
            })
            .map(|(_, kind)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::CellArea => "cell-area",
            Self::Rrp => "rrp",
            Self::RrpMember => "rrpmember",
            Self::SNssai => "s-nssai",
            Self::Dnn => "dnn",
            Self::QosFlow => "qosflow",
            Self::FiveQi => "fiveqi",
            Self::Unknown => "unknown",
        }
    }

    /// The node type created beneath this one by the editor.
    pub fn child_type(&self) -> Option<Self> {
        match self {
            Self::Network => Some(Self::CellArea),
            Self::CellArea => Some(Self::Rrp),
            Self::Rrp => Some(Self::RrpMember),
            Self::RrpMember => Some(Self::SNssai),
            Self::SNssai => Some(Self::Dnn),
            Self::Dnn => Some(Self::QosFlow),
            Self::QosFlow => Some(Self::FiveQi),
            Self::FiveQi | Self::Unknown => None,
        }
    }

    /// Rendered box width as drawn by the editor.
    pub fn default_width(&self) -> f32 {
        match self {
            Self::SNssai => 360.0,
            Self::Dnn => 320.0,
            Self::Rrp => 240.0,
            Self::QosFlow => 300.0,
            Self::FiveQi => 280.0,
            _ => DEFAULT_NODE_WIDTH,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Raw `type` as stored by the editor (`"dnn"`, or `"customNode"` with the
    /// domain type kept in `data.type`).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Editor fields the layout engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeType) -> Self {
        Self {
            id: id.into(),
            kind: kind.as_str().to_string(),
            position: Position::default(),
            data: Map::new(),
            extra: Map::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Effective domain type: the node's own type, then `data.type`, then the id prefix.
    pub fn node_type(&self) -> NodeType {
        NodeType::from_token(&self.kind)
            .or_else(|| {
                self.data
                    .get("type")
                    .and_then(Value::as_str)
                    .and_then(NodeType::from_token)
            })
            .or_else(|| NodeType::from_id_prefix(&self.id))
            .unwrap_or(NodeType::Unknown)
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Back-reference to the node this one was created under, if recorded.
    pub fn parent_id(&self) -> Option<&str> {
        self.data
            .get("parentId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Number of band rows an RRP node renders.
    pub fn band_count(&self) -> usize {
        self.data
            .get("rrpBands")
            .and_then(Value::as_array)
            .map(|bands| bands.len())
            .unwrap_or(0)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        match self.data.get(flag) {
            Some(Value::Bool(value)) => *value,
            Some(Value::Null) | None => false,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    Auto,
    #[default]
    Manual,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}-{target}"),
            source,
            target,
            source_handle: Some(SOURCE_HANDLE.to_string()),
            target_handle: Some(TARGET_HANDLE.to_string()),
            data: None,
            extra: Map::new(),
        }
    }

    pub fn created_by(mut self, created_by: CreatedBy) -> Self {
        self.data.get_or_insert_with(EdgeData::default).created_by = Some(created_by);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str, kind: NodeType) -> &mut Node {
        self.nodes.push(Node::new(id, kind));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn connect(&mut self, source: &str, target: &str) {
        self.edges.push(Edge::new(source, target).created_by(CreatedBy::Manual));
    }

    /// Adds `id` beneath `parent` the way the editor does when spawning a child:
    /// the node records its parent and the edge is marked automatic.
    pub fn add_child(&mut self, parent: &str, id: &str, kind: NodeType) {
        let node = Node::new(id, kind).with_data("parentId", Value::String(parent.to_string()));
        self.nodes.push(node);
        self.edges.push(Edge::new(parent, id).created_by(CreatedBy::Auto));
    }
}
