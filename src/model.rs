use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid diagram payload: {0}")]
    Parse(#[from] json5::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionKind {
    #[default]
    Primary,
    Secondary,
    Monitoring,
}

impl ConnectionKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            "monitoring" => Some(Self::Monitoring),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Monitoring => "monitoring",
        }
    }
}

/// Technology entries arrive either as a plain list of names or as a
/// name -> short description map, depending on how the payload was authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TechGroup {
    Names(Vec<String>),
    Detailed(BTreeMap<String, String>),
}

impl TechGroup {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Names(names) => names.iter().map(String::as_str).collect(),
            Self::Detailed(map) => map.keys().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub technologies: BTreeMap<String, TechGroup>,
    #[serde(default)]
    pub metrics: BTreeMap<String, String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Node {
    /// Categories merged into one flat tag list, in category name order.
    pub fn flat_technologies(&self) -> Vec<&str> {
        let mut tags = Vec::new();
        for group in self.technologies.values() {
            tags.extend(group.names());
        }
        tags
    }

    pub fn has_explicit_position(&self) -> bool {
        matches!((self.x, self.y), (Some(x), Some(y)) if x.is_finite() && y.is_finite())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind_token: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
}

impl Connection {
    /// Unrecognized tokens fall back to the primary visual style.
    pub fn kind(&self) -> ConnectionKind {
        self.kind_token
            .as_deref()
            .and_then(ConnectionKind::from_token)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub security: String,
    #[serde(default)]
    pub compliance: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// One architecture view: nodes, typed connections and security zones.
/// Read-only input to the engine; all derived state (positions, viewport,
/// expansion) lives outside this aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// Parses a diagram payload. Strict JSON is tried first; JSON5 covers
/// relaxed authoring (unquoted keys, trailing commas, comments).
pub fn parse_diagram(input: &str) -> Result<Diagram, ModelError> {
    if let Ok(diagram) = serde_json::from_str::<Diagram>(input) {
        return Ok(diagram);
    }
    Ok(json5::from_str(input)?)
}

/// Canonical view of a payload: malformed nodes and dangling connections
/// removed, ids resolvable through `index`. Borrows the diagram it was
/// validated from.
#[derive(Debug)]
pub struct ValidatedDiagram<'a> {
    pub nodes: Vec<&'a Node>,
    pub connections: Vec<&'a Connection>,
    pub zones: Vec<&'a Zone>,
    index: BTreeMap<&'a str, usize>,
}

impl<'a> ValidatedDiagram<'a> {
    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.index.get(id).map(|idx| self.nodes[*idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Diagram {
    /// Drops nodes with empty or duplicate ids and nodes whose explicit
    /// coordinates are not finite, then drops connections whose endpoints
    /// no longer resolve. Every drop is reported; none is fatal.
    pub fn validate(&self) -> ValidatedDiagram<'_> {
        let mut nodes = Vec::new();
        let mut index = BTreeMap::new();

        for node in &self.nodes {
            if node.id.is_empty() {
                warn!("dropping node without id (label: {:?})", node.label);
                continue;
            }
            if index.contains_key(node.id.as_str()) {
                warn!(id = %node.id, "dropping node with duplicate id");
                continue;
            }
            let coords_finite = match (node.x, node.y) {
                (Some(x), Some(y)) => x.is_finite() && y.is_finite(),
                (None, None) => true,
                // Half-specified positions cannot be honored.
                _ => false,
            };
            if !coords_finite {
                warn!(id = %node.id, "dropping node with unusable coordinates");
                continue;
            }
            index.insert(node.id.as_str(), nodes.len());
            nodes.push(node);
        }

        let mut connections = Vec::new();
        for conn in &self.connections {
            if !index.contains_key(conn.from.as_str()) || !index.contains_key(conn.to.as_str()) {
                warn!(from = %conn.from, to = %conn.to, "skipping dangling connection");
                continue;
            }
            connections.push(conn);
        }

        // Zones with no resolvable members are resolved (and omitted) by the
        // clusterer; the declared list passes through untouched.
        let zones = self.zones.iter().collect();

        ValidatedDiagram {
            nodes,
            connections,
            zones,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json5_payload() {
        let input = r#"{
            title: 'Fraud Detection',
            nodes: [
                { id: 'sources', label: 'Transaction Sources', x: 100, y: 100 },
                { id: 'stream', label: 'Stream Processing' },
            ],
            connections: [
                { from: 'sources', to: 'stream', label: 'Events', type: 'primary', protocol: 'Kafka' },
            ],
            zones: [
                { id: 'dmz', label: 'Ingestion Zone', security: 'DMZ', compliance: ['PCI-DSS'], nodes: ['sources'] },
            ],
        }"#;
        let diagram = parse_diagram(input).unwrap();
        assert_eq!(diagram.nodes.len(), 2);
        assert!(diagram.nodes[0].has_explicit_position());
        assert!(!diagram.nodes[1].has_explicit_position());
        assert_eq!(diagram.connections[0].kind(), ConnectionKind::Primary);
        assert_eq!(diagram.zones[0].compliance, vec!["PCI-DSS".to_string()]);
    }

    #[test]
    fn parses_strict_json_payload() {
        let input = r#"{
            "title": "Checkout",
            "nodes": [{ "id": "api", "label": "API Gateway" }],
            "connections": [{ "from": "api", "to": "api", "type": "secondary" }]
        }"#;
        let diagram = parse_diagram(input).unwrap();
        assert_eq!(diagram.title, "Checkout");
        assert_eq!(diagram.nodes[0].id, "api");
        assert_eq!(diagram.connections[0].kind(), ConnectionKind::Secondary);
    }

    #[test]
    fn unknown_connection_type_falls_back_to_primary() {
        let conn = Connection {
            from: "a".to_string(),
            to: "b".to_string(),
            label: String::new(),
            kind_token: Some("experimental".to_string()),
            protocol: None,
        };
        assert_eq!(conn.kind(), ConnectionKind::Primary);
        assert_eq!(ConnectionKind::from_token("monitoring"), Some(ConnectionKind::Monitoring));
        assert_eq!(ConnectionKind::from_token("experimental"), None);
    }

    #[test]
    fn flattens_technologies_across_categories() {
        let input = r#"{
            nodes: [{
                id: 'n',
                technologies: {
                    channels: { 'POS Systems': 'Real-time', 'Mobile Apps': 'Payments' },
                    streaming: ['Kafka', 'Flink'],
                },
            }],
        }"#;
        let diagram = parse_diagram(input).unwrap();
        let tags = diagram.nodes[0].flat_technologies();
        assert_eq!(tags, vec!["Mobile Apps", "POS Systems", "Kafka", "Flink"]);
    }

    #[test]
    fn validate_drops_dangling_and_malformed() {
        let input = r#"{
            nodes: [
                { id: 'a' },
                { id: '' },
                { id: 'a' },
                { id: 'b', x: 10 },
                { id: 'c' },
            ],
            connections: [
                { from: 'a', to: 'c' },
                { from: 'a', to: 'ghost' },
                { from: 'b', to: 'c' },
            ],
        }"#;
        let diagram = parse_diagram(input).unwrap();
        let validated = diagram.validate();
        assert_eq!(validated.nodes.len(), 2);
        assert!(validated.contains("a"));
        assert!(validated.contains("c"));
        assert!(!validated.contains("b"));
        // Only a -> c survives: one endpoint missing kills the other two.
        assert_eq!(validated.connections.len(), 1);
        assert_eq!(validated.connections[0].to, "c");
    }
}
