use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sqlx::Connection;
use tracing::{error, info};

use supasetup_common::error::{Result, SetupError};
use supasetup_common::ConnectTarget;

use crate::report::Reporter;

/// One SQL file to apply, ordered by filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    pub name: String,
    pub path: PathBuf,
}

/// Outcome of one full migration pass.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub applied: Vec<String>,
    pub failed: Vec<String>,
}

/// List `*.sql` files in `dir`, sorted by filename. Fatal if the
/// directory is missing or holds no SQL files.
pub fn discover(dir: &Path) -> Result<Vec<MigrationScript>> {
    if !dir.is_dir() {
        return Err(SetupError::MigrationDirMissing(dir.to_path_buf()));
    }

    let unreadable = |source| SetupError::MigrationDirUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut scripts = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            scripts.push(MigrationScript {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
            });
        }
    }

    scripts.sort_by(|a, b| a.name.cmp(&b.name));

    if scripts.is_empty() {
        return Err(SetupError::NoMigrations(dir.to_path_buf()));
    }
    Ok(scripts)
}

/// Apply each script on its own fresh connection, one transaction per
/// file. A failure marks that file and moves on; earlier files stay
/// committed and later files still run.
pub async fn run_all(
    target: &ConnectTarget,
    scripts: &[MigrationScript],
    reporter: &Reporter,
) -> RunOutcome {
    let mut outcome = RunOutcome::default();

    for script in scripts {
        reporter.info(&format!("Running migration: {}", script.name));

        match apply_one(target, script).await {
            Ok(()) => {
                info!(script = script.name.as_str(), "migration applied");
                reporter.success(&format!("{} completed successfully", script.name));
                reporter.blank();
                outcome.applied.push(script.name.clone());
            }
            Err(e) => {
                error!(script = script.name.as_str(), "migration failed: {e:#}");
                reporter.error(&format!("{} failed: {e:#}", script.name));
                reporter.blank();
                outcome.failed.push(script.name.clone());
            }
        }
    }

    outcome
}

async fn apply_one(target: &ConnectTarget, script: &MigrationScript) -> anyhow::Result<()> {
    let sql = fs::read_to_string(&script.path)
        .with_context(|| format!("could not read {}", script.path.display()))?;

    let mut conn = target.connect().await?;
    let mut tx = conn.begin().await?;
    sqlx::raw_sql(&sql).execute(&mut *tx).await?;
    tx.commit().await?;
    conn.close().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn discovers_sql_files_in_lexicographic_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "002_b.sql", "SELECT 2;");
        write(dir.path(), "001_a.sql", "SELECT 1;");
        write(dir.path(), "010_later.sql", "SELECT 10;");
        write(dir.path(), "notes.txt", "not a migration");

        let scripts = discover(dir.path()).unwrap();
        let names: Vec<_> = scripts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["001_a.sql", "002_b.sql", "010_later.sql"]);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let err = discover(Path::new("/nonexistent/supabase/migrations")).unwrap_err();
        assert!(matches!(err, SetupError::MigrationDirMissing(_)));
    }

    #[test]
    fn directory_without_sql_files_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "readme.md", "nothing to run");

        let err = discover(dir.path()).unwrap_err();
        assert!(matches!(err, SetupError::NoMigrations(_)));
    }
}
