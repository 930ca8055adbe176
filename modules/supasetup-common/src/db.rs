use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};

use crate::config::SetupConfig;
use crate::error::{Result, SetupError};

/// Supabase session pooler endpoint. Connections go through the pooler,
/// not the project database host, so the username carries the project ref.
pub const POOLER_HOST: &str = "aws-0-us-west-1.pooler.supabase.com";
pub const POOLER_PORT: u16 = 6543;
pub const DATABASE_NAME: &str = "postgres";

/// Derived Postgres connection parameters. Read-only after construction;
/// every operation opens its own short-lived connection from these.
#[derive(Debug, Clone)]
pub struct ConnectTarget {
    options: PgConnectOptions,
}

impl ConnectTarget {
    pub fn from_config(config: &SetupConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(POOLER_HOST)
            .port(POOLER_PORT)
            .database(DATABASE_NAME)
            .username(&format!("postgres.{}", config.project_ref))
            .password(&config.service_role_key)
            .ssl_mode(PgSslMode::Require);

        Self { options }
    }

    /// Wrap pre-built options. Lets tests point at a local database.
    pub fn from_options(options: PgConnectOptions) -> Self {
        Self { options }
    }

    /// Open a fresh single connection.
    pub async fn connect(&self) -> sqlx::Result<PgConnection> {
        PgConnection::connect_with(&self.options).await
    }

    /// Open one connection and immediately close it. Failure here almost
    /// always means bad credentials, so the error carries that hint.
    pub async fn probe(&self) -> Result<()> {
        let conn = self.connect().await.map_err(|source| SetupError::Probe { source })?;
        conn.close().await.map_err(|source| SetupError::Probe { source })?;
        Ok(())
    }
}
