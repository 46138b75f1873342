//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::ErrorKind;
use crate::exitcode;
use crate::infrastructure::traits::SourceError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Already shown to the user by the service's notifier.
    #[error("{0}")]
    Reported(ApplicationError),

    #[error("cannot render output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Application(e) | CliError::Reported(e) => application_exit_code(e),
            CliError::Output(_) => exitcode::SOFTWARE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Source(e) => source_exit_code(e),
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }

    /// Whether the message still has to be printed.
    pub fn needs_report(&self) -> bool {
        !matches!(self, CliError::Reported(_))
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match (e.kind(), e) {
        (Some(ErrorKind::NotFound), _) => exitcode::NOINPUT,
        (Some(ErrorKind::Validation), _) => exitcode::DATAERR,
        (None, ApplicationError::Config { .. }) => exitcode::CONFIG,
        (None, ApplicationError::Source(e)) => source_exit_code(e),
        (None, ApplicationError::Domain(_)) => exitcode::SOFTWARE,
    }
}

fn source_exit_code(e: &SourceError) -> i32 {
    match e {
        SourceError::CategoryNotFound(_) | SourceError::SubCategoryNotFound(_) => {
            exitcode::NOINPUT
        }
        SourceError::ReadOnly(_) => exitcode::USAGE,
        SourceError::Decode { .. } => exitcode::DATAERR,
        SourceError::Io { .. } => exitcode::IOERR,
        SourceError::InvalidBaseUrl(_) => exitcode::CONFIG,
        SourceError::Http { .. } | SourceError::Transport(_) => exitcode::UNAVAILABLE,
        SourceError::HierarchyUnsupported => exitcode::SOFTWARE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn maps_error_kinds_to_exit_codes() {
        let not_found: ApplicationError = DomainError::category_not_found("c9").into();
        let orphan: ApplicationError = DomainError::OrphanParent {
            id: "b".into(),
            parent_id: "x".into(),
        }
        .into();
        let http: ApplicationError = SourceError::Http {
            status: 500,
            body: String::new(),
        }
        .into();

        assert_eq!(CliError::Reported(not_found).exit_code(), exitcode::NOINPUT);
        assert_eq!(CliError::Application(orphan).exit_code(), exitcode::DATAERR);
        assert_eq!(CliError::Application(http).exit_code(), exitcode::UNAVAILABLE);
        assert_eq!(CliError::Usage("x".into()).exit_code(), exitcode::USAGE);
    }

    #[test]
    fn maps_update_failures_to_exit_codes() {
        let cycle: ApplicationError = DomainError::InvalidParent {
            id: "a".into(),
            parent_id: "c".into(),
        }
        .into();
        let missing: ApplicationError = DomainError::sub_category_not_found("z").into();
        let read_only: ApplicationError = SourceError::ReadOnly("dump.json".into()).into();

        assert_eq!(CliError::Reported(cycle).exit_code(), exitcode::DATAERR);
        assert_eq!(CliError::Reported(missing).exit_code(), exitcode::NOINPUT);
        assert_eq!(CliError::Reported(read_only).exit_code(), exitcode::USAGE);
    }
}
