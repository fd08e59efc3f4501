//! Directed edge paths and SVG arrowhead markers.
//!
//! Every [`Arrow`] points from its source to its destination. Markers are
//! shared per stroke color: the [`ArrowDrawer`] records which colors were
//! drawn and emits one `<marker>` definition for each.

use std::{collections::BTreeMap, str::FromStr};

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{StrokeDefinition, SvgNode},
    geometry::{Bounds, Point},
};

/// Shape of the path between two points.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArrowStyle {
    #[default]
    Straight,
    Curved,
    Orthogonal,
}

impl FromStr for ArrowStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Self::Straight),
            "curved" => Ok(Self::Curved),
            "orthogonal" => Ok(Self::Orthogonal),
            _ => Err(format!(
                "invalid arrow style `{s}`, valid values: straight, curved, orthogonal"
            )),
        }
    }
}

/// Stroke and path style of an arrow.
#[derive(Debug, Clone, Default)]
pub struct ArrowDefinition {
    stroke: StrokeDefinition,
    style: ArrowStyle,
}

impl ArrowDefinition {
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self {
            stroke,
            style: ArrowStyle::default(),
        }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn style(&self) -> ArrowStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ArrowStyle) {
        self.style = style;
    }
}

/// A single directed edge path.
#[derive(Debug, Clone)]
pub struct Arrow<'a> {
    definition: &'a ArrowDefinition,
}

impl<'a> Arrow<'a> {
    pub fn new(definition: &'a ArrowDefinition) -> Self {
        Self { definition }
    }

    fn marker_id(color: Color) -> String {
        format!("arrowhead-{}", color.to_id_safe_string())
    }

    fn render_path(&self, path_data: String) -> SvgNode {
        let color = self.definition.stroke().color();
        let path = svg_element::Path::new()
            .set("d", path_data)
            .set("fill", "none")
            .set("marker-end", format!("url(#{})", Self::marker_id(color)));

        Box::new(crate::apply_stroke!(path, self.definition.stroke()))
    }

    /// Path data for a segment in this arrow's style.
    pub fn path_data(&self, start: Point, end: Point) -> String {
        match self.definition.style() {
            ArrowStyle::Straight => format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()),
            ArrowStyle::Curved => {
                // Control points pull the curve sideways, perpendicular to the segment.
                let delta = end.sub_point(start);
                let normal = Point::new(-delta.y(), delta.x()).scale(0.15);
                let c1 = start.add_point(delta.scale(0.25)).add_point(normal);
                let c2 = start.add_point(delta.scale(0.75)).add_point(normal);
                format!(
                    "M {} {} C {} {}, {} {}, {} {}",
                    start.x(),
                    start.y(),
                    c1.x(),
                    c1.y(),
                    c2.x(),
                    c2.y(),
                    end.x(),
                    end.y()
                )
            }
            ArrowStyle::Orthogonal => {
                let mid = start.midpoint(end);
                let delta = end.sub_point(start);
                if delta.x().abs() > delta.y().abs() {
                    format!(
                        "M {} {} L {} {} L {} {} L {} {}",
                        start.x(),
                        start.y(),
                        mid.x(),
                        start.y(),
                        mid.x(),
                        end.y(),
                        end.x(),
                        end.y()
                    )
                } else {
                    format!(
                        "M {} {} L {} {} L {} {} L {} {}",
                        start.x(),
                        start.y(),
                        start.x(),
                        mid.y(),
                        end.x(),
                        mid.y(),
                        end.x(),
                        end.y()
                    )
                }
            }
        }
    }

    /// Path data for an edge that starts and ends on the same node: a loop
    /// leaving and re-entering the right side of `bounds`.
    pub fn self_loop_path_data(bounds: Bounds) -> String {
        let reach = (bounds.height() * 0.6).max(20.0);
        let start = Point::new(bounds.max_x(), bounds.center().y() - bounds.height() / 4.0);
        let end = Point::new(bounds.max_x(), bounds.center().y() + bounds.height() / 4.0);
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            start.x(),
            start.y(),
            start.x() + reach,
            start.y() - reach / 2.0,
            end.x() + reach,
            end.y() + reach / 2.0,
            end.x(),
            end.y()
        )
    }

    /// Outermost point reached by [`Self::self_loop_path_data`], for label placement.
    pub fn self_loop_apex(bounds: Bounds) -> Point {
        let reach = (bounds.height() * 0.6).max(20.0);
        Point::new(bounds.max_x() + reach * 0.75, bounds.center().y())
    }
}

/// Draws arrows and collects the marker definitions they reference.
#[derive(Debug, Default)]
pub struct ArrowDrawer {
    heads: BTreeMap<String, Color>,
}

impl ArrowDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws an arrow from `source` to `destination`.
    pub fn draw_arrow(&mut self, arrow: &Arrow, source: Point, destination: Point) -> SvgNode {
        self.register(arrow);
        arrow.render_path(arrow.path_data(source, destination))
    }

    /// Draws a self-loop on the node occupying `bounds`.
    pub fn draw_self_loop(&mut self, arrow: &Arrow, bounds: Bounds) -> SvgNode {
        self.register(arrow);
        arrow.render_path(Arrow::self_loop_path_data(bounds))
    }

    fn register(&mut self, arrow: &Arrow) {
        let color = arrow.definition.stroke().color();
        self.heads.insert(Arrow::marker_id(color), color);
    }

    /// `<defs>` with one arrowhead marker per color drawn so far.
    pub fn draw_marker_definitions(&self) -> SvgNode {
        let mut defs = svg_element::Definitions::new();
        for (id, color) in &self.heads {
            let head = svg_element::Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", color.to_hex())
                .set("fill-opacity", color.alpha());
            let marker = svg_element::Marker::new()
                .set("id", id.as_str())
                .set("viewBox", "0 0 10 10")
                .set("refX", 9)
                .set("refY", 5)
                .set("markerWidth", 8)
                .set("markerHeight", 8)
                .set("orient", "auto")
                .add(head);
            defs = defs.add(marker);
        }
        Box::new(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[test]
    fn test_style_from_str() {
        assert_eq!("curved".parse::<ArrowStyle>(), Ok(ArrowStyle::Curved));
        assert!("zigzag".parse::<ArrowStyle>().is_err());
    }

    #[test]
    fn test_straight_path_data() {
        let definition = ArrowDefinition::default();
        let arrow = Arrow::new(&definition);
        assert_eq!(
            arrow.path_data(Point::new(0.0, 0.0), Point::new(10.0, 20.0)),
            "M 0 0 L 10 20"
        );
    }

    #[test]
    fn test_orthogonal_path_has_three_segments() {
        let mut definition = ArrowDefinition::default();
        definition.set_style(ArrowStyle::Orthogonal);
        let arrow = Arrow::new(&definition);

        let data = arrow.path_data(Point::new(0.0, 0.0), Point::new(100.0, 10.0));
        assert_eq!(data.matches('L').count(), 3);
    }

    #[test]
    fn test_drawer_registers_one_marker_per_color() {
        let black = ArrowDefinition::default();
        let red = ArrowDefinition::new(StrokeDefinition::new(Color::new("red").unwrap(), 1.0));

        let mut drawer = ArrowDrawer::new();
        drawer.draw_arrow(&Arrow::new(&black), Point::default(), Point::new(1.0, 1.0));
        drawer.draw_arrow(&Arrow::new(&black), Point::default(), Point::new(2.0, 2.0));
        drawer.draw_arrow(&Arrow::new(&red), Point::default(), Point::new(3.0, 3.0));

        let defs = drawer.draw_marker_definitions().to_string();
        assert_eq!(defs.matches("<marker").count(), 2);
    }

    #[test]
    fn test_arrow_references_its_marker() {
        let definition = ArrowDefinition::default();
        let mut drawer = ArrowDrawer::new();
        let path = drawer
            .draw_arrow(&Arrow::new(&definition), Point::default(), Point::new(5.0, 5.0))
            .to_string();
        let defs = drawer.draw_marker_definitions().to_string();

        let id = Arrow::marker_id(Color::default());
        assert!(path.contains(&format!("url(#{id})")));
        assert!(defs.contains(&format!("id=\"{id}\"")));
    }

    #[test]
    fn test_self_loop_stays_right_of_node() {
        let bounds = Bounds::new_from_center(Point::new(50.0, 50.0), Size::new(40.0, 20.0));
        let apex = Arrow::self_loop_apex(bounds);
        assert!(apex.x() > bounds.max_x());

        let data = Arrow::self_loop_path_data(bounds);
        assert!(data.starts_with("M 70 "));
    }
}
