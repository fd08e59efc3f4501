//! Drawable building blocks for diagram rendering.
//!
//! - [`LayeredOutput`] / [`RenderLayer`] - z-ordered SVG output
//! - [`StrokeDefinition`] - line styling
//! - [`Text`] / [`TextDefinition`] - measured, multi-line labels
//! - [`NodeBox`] / [`NodeBoxDefinition`] - the rectangle drawn for a node
//! - [`Arrow`] / [`ArrowDrawer`] - directed edge paths and their markers

mod arrow;
mod layer;
mod node_box;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDefinition, ArrowDrawer, ArrowStyle};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use node_box::{NodeBox, NodeBoxDefinition};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{Text, TextDefinition};

use crate::geometry::{Point, Size};

/// Something that knows its size and can draw itself centered on a point.
pub trait Drawable {
    /// Renders the drawable centered at `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Total size, including any padding.
    fn size(&self) -> Size;
}
