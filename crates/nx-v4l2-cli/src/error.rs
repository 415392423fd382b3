// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::fmt;
use std::process::ExitCode;

/// CLI-specific error type with exit code mapping
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// Requested role/instance is absent or its node could not be opened
    DeviceNotFound(String),
    /// Media-controller device missing or rejecting requests
    MediaUnavailable(String),
    /// General error from the discovery library
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            CliError::MediaUnavailable(msg) => write!(f, "Media device unavailable: {}", msg),
            CliError::General(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InvalidArgs(_) => ExitCode::from(2),
            CliError::DeviceNotFound(_) => ExitCode::from(3),
            CliError::MediaUnavailable(_) => ExitCode::from(4),
            CliError::General(_) => ExitCode::from(1),
        }
    }
}

/// Map nx_v4l2::Error to CliError with appropriate exit codes
impl From<nx_v4l2::Error> for CliError {
    fn from(err: nx_v4l2::Error) -> Self {
        use nx_v4l2::Error;

        match err {
            Error::InvalidInstance { .. } | Error::InvalidPad { .. } => {
                CliError::InvalidArgs(err.to_string())
            }
            Error::NoSuchDevice { .. } | Error::OpenFailed { .. } => {
                CliError::DeviceNotFound(err.to_string())
            }
            Error::Io(_) | Error::NotReady => CliError::MediaUnavailable(err.to_string()),
        }
    }
}

/// Helper function to convert result to exit code
pub fn result_to_exit_code<T>(result: Result<T, CliError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))?;
    println!("{}", json_str);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nx_v4l2::role::Role;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::InvalidArgs("test".into()).exit_code(),
            ExitCode::from(2)
        );
        assert_eq!(
            CliError::DeviceNotFound("test".into()).exit_code(),
            ExitCode::from(3)
        );
        assert_eq!(
            CliError::MediaUnavailable("test".into()).exit_code(),
            ExitCode::from(4)
        );
        assert_eq!(
            CliError::General("test".into()).exit_code(),
            ExitCode::from(1)
        );
    }

    #[test]
    fn test_library_error_mapping() {
        let err = CliError::from(nx_v4l2::Error::NoSuchDevice {
            role: Role::ClipperVideo,
            instance: 2,
        });
        assert!(matches!(err, CliError::DeviceNotFound(_)));

        let err = CliError::from(nx_v4l2::Error::InvalidPad {
            role: Role::Csi,
            pad: 4,
            pads: 2,
        });
        assert!(matches!(err, CliError::InvalidArgs(_)));

        let err = CliError::from(nx_v4l2::Error::Io(std::io::Error::from_raw_os_error(1)));
        assert!(matches!(err, CliError::MediaUnavailable(_)));
    }

    #[test]
    fn test_error_display() {
        let err = CliError::DeviceNotFound("clipper-video 0".to_string());
        assert_eq!(format!("{}", err), "Device not found: clipper-video 0");
    }
}
