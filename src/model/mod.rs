//! Document model types for positioned page content.
//!
//! This module defines the representation that bridges the external
//! recognition engines and the layout, rendering and validation stages.
//! Engines deliver [`RawElement`]s; ingestion turns them into typed
//! [`Element`]s whose geometry and text never change afterwards.

mod document;
mod element;
mod geometry;
mod page;
mod table;

pub use document::{Document, DocumentInfo, ImageInfo, Metadata};
pub use element::{Element, ElementKind, NoiseType, RawElement, SemanticRole};
pub use geometry::BBox;
pub use page::Page;
pub use table::{Table, TableRow};
