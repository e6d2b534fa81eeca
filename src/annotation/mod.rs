//! Annotation model: point markers and progress regions.
//!
//! Markers live in normalized image coordinates and carry operator-entered
//! metadata; regions are plain rectangles without metadata. The model owns
//! both for the lifetime of one editing session.

pub mod marker;
pub mod model;
pub mod region;

pub use marker::{Marker, MarkerId, MarkerKind, MarkerSeed, MarkerUpdate};
pub use model::{AnnotationBatch, AnnotationError, AnnotationModel, AnnotationSnapshot};
pub use region::Region;
