//! # Packmatch Core - Artwork Export Planning Library
//!
//! Packmatch turns a tagged packaging-artwork document into an export plan.
//! Die-line documents name their panel groups with tags (`F`, `B`, `S1`,
//! `S2`, `IN`, plus legacy spellings) and carry printed asset identifiers
//! like `ABCDEFG-12` near each panel. This library canonicalizes the tag
//! names, recognizes the identifier labels, pairs each tagged panel with
//! the identifier printed next to it purely by geometry, renames matched
//! panels to their final asset names, and reports every decision so an
//! operator can audit the run from the log alone.
//!
//! ## Quick Start
//!
//! ```rust
//! use packmatch_core::{
//!     ArtGroup, ArtworkDocument, BoundingBox, DryRunSink, ExportPipeline, PipelineConfig,
//!     Point, TextLabel,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut document = ArtworkDocument {
//!         groups: vec![
//!             ArtGroup::new("Box A", BoundingBox::new(0.0, 0.0, 200.0, 200.0)).with_child(
//!                 ArtGroup::new("FRONT", BoundingBox::new(50.0, 50.0, 150.0, 150.0)),
//!             ),
//!         ],
//!         labels: vec![TextLabel::new("ABCDEFG-12", Point::new(150.0, 50.0))],
//!     };
//!
//!     let pipeline = ExportPipeline::new(PipelineConfig::default())?;
//!     let mut sink = DryRunSink::new("exports");
//!     let report = pipeline.run(&mut document, &mut sink)?;
//!
//!     assert_eq!(report.summary.matched, 1);
//!     assert_eq!(document.groups[0].children[0].name, "ABCDEFG-12-F");
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline passes
//!
//! 1. **Normalize**: walk the group tree depth-first, rewrite recognized
//!    tag names to canonical short forms, freeze matched subtrees.
//! 2. **Scan**: keep the page labels whose whole text is an asset
//!    identifier and which sit near a tagged group.
//! 3. **Associate**: each panel claims the closest unclaimed identifier in
//!    its lower-right quadrant, globally closest pair first.
//! 4. **Rename**: matched groups become `<identifier>-<tag>`.
//! 5. **Export and report**: matched assets go through the
//!    [`ExportSink`], and every tagged group gets one audit record.
//!
//! ## Coordinate convention
//!
//! All geometry is y-up: x grows rightward, y grows upward, so the
//! "lower-right quadrant" of a panel origin is `x >= origin.x` and
//! `y <= origin.y`.

pub mod artwork;
pub mod assoc;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ident;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod sink;
pub mod source;
pub mod tags;

// Re-exports for convenience
pub use artwork::*;
pub use assoc::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
pub use ident::*;
pub use normalize::*;
pub use pipeline::*;
pub use report::*;
pub use sink::*;
pub use source::*;
pub use tags::*;
