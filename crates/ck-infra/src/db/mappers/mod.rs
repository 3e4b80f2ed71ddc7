pub mod clip_record_mapper;

pub use clip_record_mapper::ClipRecordRowMapper;
