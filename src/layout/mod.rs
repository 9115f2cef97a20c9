//! Force-directed layout and renderable figure assembly.
//!
//! [`spring_layout`] computes 2D node positions with a Fruchterman-Reingold
//! force simulation: every node pair repels with `k^2 / d^2`, every edge
//! attracts with `d^2 / k`, and a linearly cooling temperature caps each
//! node's per-iteration displacement. Positions are recentered on the
//! origin and rescaled into `[-1, 1]` at the end.
//!
//! [`NetworkFigure`] packages the positioned graph as two traces in the
//! shape a plotly-style front end consumes directly: an edge trace of
//! line segments separated by null break markers, and a node trace of
//! labeled markers styled by node kind.

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use rand::Rng;
use serde::Serialize;

use crate::session::{InteractionGraph, NodeKind};

/// Iteration budget for the force simulation.
pub const LAYOUT_ITERATIONS: usize = 50;

/// Optimal node distance (the `k` constant).
pub const SPRING_CONSTANT: f64 = 1.0;

/// Pairwise distances are clamped below this before computing forces.
const MIN_DISTANCE: f64 = 0.01;

/// Marker size for subgroup nodes.
pub const SUBGROUP_MARKER_SIZE: u32 = 30;
/// Marker size for agent nodes.
pub const AGENT_MARKER_SIZE: u32 = 20;

/// Compute spring-layout positions for every node.
///
/// Returns one `[x, y]` position per node, in node-index order. Initial
/// positions are drawn uniformly from `[0, 1)^2` using the supplied RNG,
/// so a seeded RNG makes the layout reproducible. An empty graph yields
/// an empty position list.
pub fn spring_layout<N, E>(
    graph: &UnGraph<N, E>,
    k: f64,
    iterations: usize,
    rng: &mut impl Rng,
) -> Vec<[f64; 2]> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let mut adjacency = vec![false; n * n];
    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        adjacency[a * n + b] = true;
        adjacency[b * n + a] = true;
    }

    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();

    // Initial temperature is a tenth of the wider axis extent, cooled
    // linearly so the final iterations only nudge.
    let extent = |axis: usize| {
        let values = pos.iter().map(|p| p[axis]);
        let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = values.fold(f64::INFINITY, f64::min);
        max - min
    };
    let mut t = 0.1 * f64::max(extent(0), extent(1));
    let dt = t / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut displacement = vec![[0.0f64; 2]; n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);

                let mut force = k * k / (dist * dist);
                if adjacency[i * n + j] {
                    force -= dist / k;
                }
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }

        for i in 0..n {
            let length = (displacement[i][0].powi(2) + displacement[i][1].powi(2)).sqrt();
            let length = if length < 0.01 { 0.1 } else { length };
            pos[i][0] += displacement[i][0] * t / length;
            pos[i][1] += displacement[i][1] * t / length;
        }

        t -= dt;
    }

    rescale(&mut pos);
    pos
}

/// Recenter positions on the origin and scale the widest coordinate to 1.
fn rescale(pos: &mut [[f64; 2]]) {
    let n = pos.len() as f64;
    if pos.is_empty() {
        return;
    }

    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
    }

    let lim = pos
        .iter()
        .map(|p| f64::max(p[0].abs(), p[1].abs()))
        .fold(0.0, f64::max);
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= lim;
            p[1] /= lim;
        }
    }
}

/// Line styling for the edge trace.
#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    /// Line width in pixels
    pub width: f64,
    /// CSS color
    pub color: String,
}

/// Edge trace: line segments with a null break after each segment.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeTrace {
    /// X coordinates as (x0, x1, null) triples per edge
    pub x: Vec<Option<f64>>,
    /// Y coordinates as (y0, y1, null) triples per edge
    pub y: Vec<Option<f64>>,
    /// Line styling
    pub line: LineStyle,
    /// Hover behavior
    pub hoverinfo: String,
    /// Trace mode
    pub mode: String,
}

/// Marker outline styling.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerLine {
    /// Outline width in pixels
    pub width: f64,
}

/// Marker styling for the node trace.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerStyle {
    /// Show the color scale alongside the plot
    pub showscale: bool,
    /// Named color scale
    pub colorscale: String,
    /// Per-node marker size
    pub size: Vec<u32>,
    /// Per-node color category (0 = subgroup, 1 = agent)
    pub color: Vec<u32>,
    /// Marker outline
    pub line: MarkerLine,
}

/// Node trace: one labeled marker per node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeTrace {
    /// X coordinate per node
    pub x: Vec<f64>,
    /// Y coordinate per node
    pub y: Vec<f64>,
    /// Node labels
    pub text: Vec<String>,
    /// Trace mode
    pub mode: String,
    /// Hover behavior
    pub hoverinfo: String,
    /// Marker styling
    pub marker: MarkerStyle,
}

/// Plot margins.
#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    /// Bottom margin
    pub b: u32,
    /// Left margin
    pub l: u32,
    /// Right margin
    pub r: u32,
    /// Top margin
    pub t: u32,
}

/// Axis styling: everything hidden.
#[derive(Debug, Clone, Serialize)]
pub struct AxisStyle {
    /// Grid lines
    pub showgrid: bool,
    /// Zero line
    pub zeroline: bool,
    /// Tick labels
    pub showticklabels: bool,
}

/// Figure-level layout options.
#[derive(Debug, Clone, Serialize)]
pub struct FigureLayout {
    /// Legend visibility
    pub showlegend: bool,
    /// Hover mode
    pub hovermode: String,
    /// Plot margins
    pub margin: Margin,
    /// X axis styling
    pub xaxis: AxisStyle,
    /// Y axis styling
    pub yaxis: AxisStyle,
}

impl Default for FigureLayout {
    fn default() -> Self {
        let hidden_axis = || AxisStyle {
            showgrid: false,
            zeroline: false,
            showticklabels: false,
        };
        Self {
            showlegend: false,
            hovermode: "closest".to_string(),
            margin: Margin { b: 0, l: 0, r: 0, t: 0 },
            xaxis: hidden_axis(),
            yaxis: hidden_axis(),
        }
    }
}

/// Renderable network figure: an edge trace and a node trace.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkFigure {
    /// The two traces, edge trace first
    pub data: (EdgeTrace, NodeTrace),
    /// Figure-level layout options
    pub layout: FigureLayout,
}

impl NetworkFigure {
    /// Assemble a figure from a graph and its node positions.
    ///
    /// `positions` must be in node-index order with one entry per node,
    /// as produced by [`spring_layout`] over the same graph.
    pub fn from_network(network: &InteractionGraph, positions: &[[f64; 2]]) -> Self {
        let graph = network.as_graph();

        let mut edge_x = Vec::with_capacity(graph.edge_count() * 3);
        let mut edge_y = Vec::with_capacity(graph.edge_count() * 3);
        for edge in graph.edge_references() {
            let from = positions[edge.source().index()];
            let to = positions[edge.target().index()];
            edge_x.extend([Some(from[0]), Some(to[0]), None]);
            edge_y.extend([Some(from[1]), Some(to[1]), None]);
        }

        let mut node_x = Vec::with_capacity(graph.node_count());
        let mut node_y = Vec::with_capacity(graph.node_count());
        let mut text = Vec::with_capacity(graph.node_count());
        let mut size = Vec::with_capacity(graph.node_count());
        let mut color = Vec::with_capacity(graph.node_count());
        for idx in graph.node_indices() {
            let node = &graph[idx];
            let p = positions[idx.index()];
            node_x.push(p[0]);
            node_y.push(p[1]);
            text.push(node.label.clone());
            match node.kind {
                NodeKind::Subgroup => {
                    size.push(SUBGROUP_MARKER_SIZE);
                    color.push(0);
                },
                NodeKind::Agent => {
                    size.push(AGENT_MARKER_SIZE);
                    color.push(1);
                },
            }
        }

        Self {
            data: (
                EdgeTrace {
                    x: edge_x,
                    y: edge_y,
                    line: LineStyle {
                        width: 0.5,
                        color: "#888".to_string(),
                    },
                    hoverinfo: "none".to_string(),
                    mode: "lines".to_string(),
                },
                NodeTrace {
                    x: node_x,
                    y: node_y,
                    text,
                    mode: "markers+text".to_string(),
                    hoverinfo: "text".to_string(),
                    marker: MarkerStyle {
                        showscale: true,
                        colorscale: "YlGnBu".to_string(),
                        size,
                        color,
                        line: MarkerLine { width: 2.0 },
                    },
                },
            ),
            layout: FigureLayout::default(),
        }
    }

    /// The edge trace
    pub fn edge_trace(&self) -> &EdgeTrace {
        &self.data.0
    }

    /// The node trace
    pub fn node_trace(&self) -> &NodeTrace {
        &self.data.1
    }
}
