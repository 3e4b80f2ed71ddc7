pub mod clip_record_row;

pub use clip_record_row::{ClipRecordRow, NewClipRecordRow};
