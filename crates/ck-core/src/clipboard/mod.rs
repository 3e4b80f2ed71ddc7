//! Clipboard domain: records, hashing, adjacent dedup and dump parsing.

pub mod dedup;
pub mod hash;
pub mod record;
pub mod shell_output;
pub mod transfer;

pub use dedup::DedupGate;
pub use hash::{ContentHash, HashAlgorithm};
pub use record::{char_length, ClipRecord, ClipRecordError};
pub use shell_output::{parse_dump, parse_shell_output, DumpFormat, ShellClipOutput};
pub use transfer::ExportedClip;
