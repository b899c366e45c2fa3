use std::process::ExitCode;

/// Process exit status.
///
/// - `Success` (0): no error diagnostics were recorded
/// - `Failure` (1): at least one error diagnostic; generated files may be partial
/// - `Error` (2): the run could not start (config, manifest, source root)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    /// Outcome of a completed run: failed iff anything was an error.
    pub fn from_error_count(error_count: usize) -> Self {
        if error_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
