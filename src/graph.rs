//! Visual-graph input types.
//!
//! The editor exports its canvas as JSON: nodes referencing a (module file,
//! component) pair under an instance name, plus edges between node ports.
//! The compiler only reads these structures; it never mutates editor state.

use serde::{Deserialize, Serialize};

/// The full canvas export: ordered node and edge collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    /// All placed module instances, in placement order.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// All drawn connections, in drawing order.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Look up a node by its editor id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A module instance placed on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Editor-assigned node id, referenced by edges.
    pub id: String,
    /// Filename of the module holding the component definition.
    pub source_file: String,
    /// Name of the component definition inside the module.
    pub component_name: String,
    /// Instance name, unique across the graph; the clone is renamed to this.
    pub name: String,
    /// Named connection points exposed by this instance.
    #[serde(default)]
    pub port_labels: Vec<PortLabel>,
    /// Per-variable classification and optional instance-local values.
    #[serde(default)]
    pub variables: Vec<VariableConfig>,
}

impl Node {
    /// Find this node's port label by name.
    pub fn port_label(&self, label: &str) -> Option<&PortLabel> {
        self.port_labels.iter().find(|p| p.label == label)
    }

    /// Find a variable config by variable name.
    pub fn variable_config(&self, name: &str) -> Option<&VariableConfig> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// A named connection point on a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortLabel {
    /// Port name; connections match source and target labels by this name.
    pub label: String,
    /// Ordered variable-name option list carried over the port.
    #[serde(default)]
    pub option: Vec<String>,
    /// Directionality tag of the port.
    #[serde(rename = "port_type", default)]
    pub kind: PortKind,
    /// Marks the port as a multi-input aggregation point.
    #[serde(rename = "is_multi_port_sum", default)]
    pub multi_port_sum: bool,
}

/// Directionality tag of a port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    /// Connects to any port.
    #[default]
    #[serde(rename = "general_ports")]
    General,
    /// Inflow side; connects only to exit ports.
    #[serde(rename = "entrance_ports")]
    Entrance,
    /// Outflow side; connects only to entrance ports.
    #[serde(rename = "exit_ports")]
    Exit,
}

impl PortKind {
    /// Whether a connection may be made between ports of these two kinds.
    ///
    /// General pairs with anything; entrance and exit only pair with each
    /// other.
    pub fn compatible_with(self, other: Self) -> bool {
        match (self, other) {
            (Self::General, _) | (_, Self::General) => true,
            (Self::Entrance, Self::Exit) | (Self::Exit, Self::Entrance) => true,
            (Self::Entrance, Self::Entrance) | (Self::Exit, Self::Exit) => false,
        }
    }
}

/// Classification of a variable on a placed instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Free variable computed by the model; never bound to a value.
    #[default]
    Variable,
    /// Boundary condition supplied by a connected instance; never bound.
    BoundaryCondition,
    /// Instance-local constant, bound through the instance parameter holder.
    Constant,
    /// Shared constant, bound through the global parameter holder.
    GlobalConstant,
}

/// Per-variable configuration entry attached to a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableConfig {
    /// Variable name inside the instantiated component.
    pub name: String,
    /// Classification controlling parameter binding.
    #[serde(rename = "type", default)]
    pub kind: VariableKind,
    /// Instance-local value, when [`VariableKind::Constant`].
    #[serde(default)]
    pub value: Option<String>,
    /// Units the value was recorded in, when known.
    #[serde(default)]
    pub units: Option<String>,
}

/// A drawn connection between two node ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Editor-assigned edge id.
    pub id: String,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
}
