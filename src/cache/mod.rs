mod incremental;
mod structs;

pub use incremental::merge_by_id;
pub use structs::{Cache, Snapshot};
