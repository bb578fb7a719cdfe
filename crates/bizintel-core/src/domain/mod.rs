//! BizIntel data model: raw board payloads, typed cells, snapshots.

pub mod cell;
pub mod raw;
pub mod snapshot;

pub use cell::CellValue;
pub use raw::{RawBoard, RawCell, RawColumn, RawItem};
pub use snapshot::{BoardSnapshot, DataQuality, Record, ITEM_COLUMN};
