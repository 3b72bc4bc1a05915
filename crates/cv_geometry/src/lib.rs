pub mod handle;
pub mod mapper;
pub mod types;

pub use handle::{HandlePosition, resolve_opposite_handle};
pub use mapper::{MappingError, ScalingState, recompute};
pub use types::{Extent, Point, Rect, normalize};
