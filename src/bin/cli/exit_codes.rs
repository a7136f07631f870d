//! Exit codes for the CLI tool.

use canonzip::{Error, ErrorKind};

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Candidates differ after stabilization
pub const NOT_REPRODUCIBLE: i32 = 1;
/// Archive or manifest format error
pub const BAD_ARCHIVE: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)] // UserInterrupt is raised from the signal handler
pub enum ExitCode {
    Success,
    NotReproducible,
    BadArchive,
    IoError,
    UserInterrupt,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::NotReproducible => NOT_REPRODUCIBLE,
            Self::BadArchive => BAD_ARCHIVE,
            Self::IoError => IO_ERROR,
            Self::UserInterrupt => USER_INTERRUPT,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a canonzip error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        _ => match error.kind() {
            ErrorKind::Parse => ExitCode::BadArchive,
            ErrorKind::Io => ExitCode::BadArchive,
            ErrorKind::Usage => ExitCode::BadArgs,
        },
    }
}
