//! Standard exit codes for the dmxpatch binary
//!
//! These exit codes keep scripted use of the tool predictable: a wrapper
//! can distinguish an unaddressable plan from a broken state file.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Addressing error (a footprint no universe can hold)
pub const EXIT_ADDRESSING_ERROR: i32 = 102;

/// Export error (CSV file could not be written)
pub const EXIT_EXPORT_ERROR: i32 = 103;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (file not found, permission denied, disk error)
pub const EXIT_IO_ERROR: i32 = 106;

/// State error (unreadable or unwritable state document)
pub const EXIT_STATE_ERROR: i32 = 109;
