use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SetupError>;

/// Fatal precondition failures. Anything in here aborts the run with
/// exit code 1; per-migration errors are accumulated instead and never
/// surface as a SetupError.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("env file not found: {0}")]
    EnvFileMissing(PathBuf),

    #[error("could not read env file {path}")]
    EnvFileUnreadable {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("could not parse Supabase URL {url:?} (expected https://yourproject.supabase.co)")]
    BadUrl { url: String },

    #[error(
        "could not connect to database: {source}. \
         Make sure you're using the SERVICE_ROLE_KEY, not the ANON_KEY"
    )]
    Probe {
        #[source]
        source: sqlx::Error,
    },

    #[error("migration directory not found: {0}")]
    MigrationDirMissing(PathBuf),

    #[error("could not read migration directory {path}")]
    MigrationDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no SQL migration files found in {0}")]
    NoMigrations(PathBuf),
}
