//! Sugiyama layout engine
//!
//! Layered drawing of directed graphs on top of the `rust-sugiyama` crate.
//! The crate decides which layer each node belongs to and the order of nodes
//! inside a layer. Actual coordinates are computed here from the measured node
//! sizes, so wide labels never overlap their neighbors.
//!
//! Every weakly connected component is laid out on its own and components are
//! placed side by side. Nodes without edges (self-loops aside) go on an extra
//! row below everything else.

use std::{
    cell::Cell,
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    panic::{self, UnwindSafe},
    sync::Once,
    thread,
};

use indexmap::IndexSet;
use log::{debug, trace, warn};
use rust_sugiyama::configure::Config;

use astrolabe_core::geometry::Point;

use crate::{
    error::AstrolabeError,
    layout::{self, LayoutGraph},
};

thread_local! {
    static PANIC_REPORTS_MUTED: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Runs `f`, catching a panic without letting the panic hook report it.
///
/// The first call wraps the current hook so that it skips panics raised on a
/// thread while that thread is inside this function. Panics elsewhere are
/// reported as before.
fn catch_unwind_quietly<R>(f: impl FnOnce() -> R + UnwindSafe) -> thread::Result<R> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !PANIC_REPORTS_MUTED.with(Cell::get) {
                previous(info);
            }
        }));
    });

    PANIC_REPORTS_MUTED.with(|muted| muted.set(true));
    let result = panic::catch_unwind(f);
    PANIC_REPORTS_MUTED.with(|muted| muted.set(false));
    result
}

/// Coordinates for one connected component as returned by `rust-sugiyama`.
type RawComponent = Vec<(usize, (f64, f64))>;

pub struct Engine {
    /// Horizontal gap between neighbors in a layer and between components.
    horizontal_spacing: f32,

    /// Vertical gap between layers.
    vertical_spacing: f32,
}

/// A component after layer assignment: node indices per layer, top to bottom,
/// each layer ordered left to right.
#[derive(Debug, PartialEq)]
struct Layers(Vec<Vec<usize>>);

impl Engine {
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 50.0,
            vertical_spacing: 80.0,
        }
    }

    pub fn with_spacing(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_spacing = horizontal;
        self.vertical_spacing = vertical;
        self
    }

    /// Runs `rust-sugiyama`, turning a panic inside the library into an error.
    fn run_sugiyama(edges: Vec<(u32, u32)>) -> Result<Vec<RawComponent>, AstrolabeError> {
        let result = catch_unwind_quietly(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: 1.0,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&edges, &config)
        });

        match result {
            Ok(layouts) => Ok(layouts
                .into_iter()
                .map(|(coords, _, _)| {
                    coords
                        .into_iter()
                        .map(|(id, (x, y))| (id, (x as f64, y as f64)))
                        .collect()
                })
                .collect()),
            Err(err) => {
                let message = err
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| err.downcast_ref::<&str>().copied())
                    .unwrap_or("unknown panic");
                Err(AstrolabeError::Layout(format!(
                    "rust-sugiyama layout engine panicked: {message}"
                )))
            }
        }
    }

    /// Groups a component's raw coordinates into layers.
    ///
    /// Layers are the distinct `y` values; inside a layer nodes are sorted by
    /// `x`. The layer order is flipped if that makes more edges point
    /// downwards, so sources end up at the top.
    fn assign_layers(raw: &RawComponent, edges: &[(usize, usize)]) -> Layers {
        let mut ys: Vec<f64> = raw.iter().map(|(_, (_, y))| *y).collect();
        ys.sort_by(f64::total_cmp);
        ys.dedup_by(|a, b| (*a - *b).abs() < 1e-6);

        let layer_of = |y: f64| {
            ys.iter()
                .position(|candidate| (candidate - y).abs() < 1e-6)
                .unwrap_or_default()
        };

        let node_layers: HashMap<usize, usize> =
            raw.iter().map(|(id, (_, y))| (*id, layer_of(*y))).collect();

        let (mut down, mut up) = (0, 0);
        for (source, target) in edges {
            if let (Some(s), Some(t)) = (node_layers.get(source), node_layers.get(target)) {
                match s.cmp(t) {
                    Ordering::Less => down += 1,
                    Ordering::Greater => up += 1,
                    Ordering::Equal => {}
                }
            }
        }
        let flip = up > down;

        let last = ys.len().saturating_sub(1);
        let mut layers: BTreeMap<usize, Vec<(f64, usize)>> = BTreeMap::new();
        for (id, (x, _)) in raw {
            let layer = node_layers[id];
            let layer = if flip { last - layer } else { layer };
            layers.entry(layer).or_default().push((*x, *id));
        }

        Layers(
            layers
                .into_values()
                .map(|mut nodes| {
                    nodes.sort_by(|(ax, a), (bx, b)| ax.total_cmp(bx).then(a.cmp(b)));
                    nodes.into_iter().map(|(_, id)| id).collect()
                })
                .collect(),
        )
    }

    /// Places `rows` of nodes starting at `origin`, each row horizontally
    /// centered within the widest row. Returns the width and height used.
    fn place_rows(
        &self,
        graph: &LayoutGraph,
        rows: &[Vec<usize>],
        origin: Point,
        positions: &mut [Point],
    ) -> (f32, f32) {
        let row_width = |row: &Vec<usize>| {
            let widths: f32 = row.iter().map(|&index| graph.size(index).width()).sum();
            widths + self.horizontal_spacing * row.len().saturating_sub(1) as f32
        };
        let total_width = rows.iter().map(row_width).fold(0.0, f32::max);

        let mut y = origin.y();
        for (row_index, row) in rows.iter().enumerate() {
            let height = row
                .iter()
                .map(|&index| graph.size(index).height())
                .fold(0.0, f32::max);

            let mut x = origin.x() + (total_width - row_width(row)) / 2.0;
            for &index in row {
                let width = graph.size(index).width();
                positions[index] = Point::new(x + width / 2.0, y + height / 2.0);
                x += width + self.horizontal_spacing;
            }

            y += height;
            if row_index + 1 < rows.len() {
                y += self.vertical_spacing;
            }
        }

        (total_width, y - origin.y())
    }
}

impl layout::Engine for Engine {
    fn positions(&self, graph: &LayoutGraph) -> Result<Vec<Point>, AstrolabeError> {
        let count = graph.node_count();
        let mut positions = vec![Point::default(); count];

        // Parallel edges add nothing to layering and self-loops are drawn separately.
        let edges: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .copied()
            .filter(|(source, target)| source != target)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        let mut connected = vec![false; count];
        for &(source, target) in &edges {
            connected[source] = true;
            connected[target] = true;
        }

        let mut components = Vec::new();
        if !edges.is_empty() {
            debug!(
                nodes = count,
                edges = edges.len();
                "Applying Sugiyama algorithm"
            );

            let sugiyama_edges = edges
                .iter()
                .map(|&(source, target)| {
                    let source = u32::try_from(source);
                    let target = u32::try_from(target);
                    match (source, target) {
                        (Ok(source), Ok(target)) => Ok((source, target)),
                        _ => Err(AstrolabeError::Layout(
                            "too many nodes for the Sugiyama layout".to_string(),
                        )),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            for raw in Self::run_sugiyama(sugiyama_edges)? {
                let raw: RawComponent = raw
                    .into_iter()
                    .filter(|(id, _)| {
                        let known = *id < count;
                        if !known {
                            warn!(id = *id; "Ignoring unknown node from rust-sugiyama");
                        }
                        known
                    })
                    .collect();
                if raw.is_empty() {
                    continue;
                }
                trace!(coords:? = raw; "Raw Sugiyama component");
                components.push(Self::assign_layers(&raw, &edges));
            }
        }

        let placed: usize = components
            .iter()
            .map(|Layers(layers)| layers.iter().map(Vec::len).sum::<usize>())
            .sum();
        let expected = connected.iter().filter(|c| **c).count();
        if placed != expected {
            return Err(AstrolabeError::Layout(format!(
                "rust-sugiyama placed {placed} of {expected} connected nodes"
            )));
        }

        // Components in order of their first declared node.
        components.sort_by_key(|Layers(layers)| layers.iter().flatten().min().copied());

        let mut cursor_x = 0.0_f32;
        let mut max_height = 0.0_f32;
        for Layers(layers) in &components {
            let (width, height) =
                self.place_rows(graph, layers, Point::new(cursor_x, 0.0), &mut positions);
            cursor_x += width + self.horizontal_spacing;
            max_height = max_height.max(height);
        }

        let isolated: Vec<usize> = (0..count).filter(|&index| !connected[index]).collect();
        if !isolated.is_empty() {
            let top = if components.is_empty() {
                0.0
            } else {
                max_height + self.vertical_spacing
            };
            debug!(count = isolated.len(); "Placing unconnected nodes on their own row");
            self.place_rows(graph, &[isolated], Point::new(0.0, top), &mut positions);
        }

        Ok(positions)
    }
}
