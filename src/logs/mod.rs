//! Log reading utilities.

mod tail;

pub use tail::{
    CHUNK_SIZE_MAX, CHUNK_SIZE_START, LogReadError, is_error_entry, read_last_entries,
    read_last_error_entry,
};
