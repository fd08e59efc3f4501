//! Astrolabe Core Types and Definitions
//!
//! Foundational types shared by the Astrolabe crates:
//!
//! - **Identifiers**: interned node identifiers ([`identifier::Id`])
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Geometry**: points, sizes, bounds and insets ([`geometry`])
//! - **Draw**: drawable primitives that emit SVG ([`draw`])
//! - **Diagram**: the node/edge model and its validation ([`diagram`])

pub mod color;
pub mod diagram;
pub mod draw;
pub mod geometry;
pub mod identifier;
