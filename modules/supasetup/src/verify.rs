use sqlx::Connection;
use tracing::warn;

use supasetup_common::ConnectTarget;

use crate::report::Reporter;

/// Tables the default migration set is expected to create.
pub const DEFAULT_EXPECTED_TABLES: [&str; 3] = ["users", "articles", "workers"];

const TABLE_EXISTS_SQL: &str = "\
    SELECT EXISTS (
        SELECT FROM information_schema.tables
        WHERE table_schema = 'public'
        AND table_name = $1
    )";

/// Check each expected table against the catalog on one connection and
/// return the missing names. Errors here are reported but never change
/// control flow; remaining checks are skipped once a query fails.
pub async fn check_tables(
    target: &ConnectTarget,
    expected: &[String],
    reporter: &Reporter,
) -> Vec<String> {
    let mut missing = Vec::new();

    let mut conn = match target.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("table verification skipped: {e}");
            reporter.error(&format!("Error checking tables: {e}"));
            return missing;
        }
    };

    for table in expected {
        let exists = sqlx::query_scalar::<_, bool>(TABLE_EXISTS_SQL)
            .bind(table.as_str())
            .fetch_one(&mut conn)
            .await;

        match exists {
            Ok(true) => reporter.success(&format!("Table '{table}' exists")),
            Ok(false) => {
                reporter.error(&format!("Table '{table}' not found"));
                missing.push(table.clone());
            }
            Err(e) => {
                warn!(table = table.as_str(), "existence check failed: {e}");
                reporter.error(&format!("Error checking tables: {e}"));
                break;
            }
        }
    }

    conn.close().await.ok();
    missing
}
