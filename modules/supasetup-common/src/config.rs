use std::collections::HashMap;
use std::path::Path;

use url::Url;

use crate::error::{Result, SetupError};

pub const SUPABASE_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const SERVICE_ROLE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Credentials for one Supabase project, loaded from a local env file.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub supabase_url: String,
    pub service_role_key: String,
    /// First DNS label of the Supabase URL hostname; forms the pooler
    /// username `postgres.<project_ref>`.
    pub project_ref: String,
}

impl SetupConfig {
    /// Load from a key=value env file. Reads the file directly rather
    /// than through process env, so nothing leaks between loads.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SetupError::EnvFileMissing(path.to_path_buf()));
        }

        let mut vars = HashMap::new();
        let iter = dotenvy::from_path_iter(path).map_err(|source| {
            SetupError::EnvFileUnreadable { path: path.to_path_buf(), source }
        })?;
        for item in iter {
            let (key, value) = item.map_err(|source| SetupError::EnvFileUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
            vars.insert(key, value);
        }

        let supabase_url = required(&vars, SUPABASE_URL_VAR)?;
        let service_role_key = required(&vars, SERVICE_ROLE_KEY_VAR)?;
        let project_ref = project_ref_from_url(&supabase_url)?;

        Ok(Self { supabase_url, service_role_key, project_ref })
    }

    pub fn log_redacted(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  {}: {}", SUPABASE_URL_VAR, self.supabase_url);
        tracing::info!("  {}: {}", SERVICE_ROLE_KEY_VAR, preview(&self.service_role_key));
        tracing::info!("  project_ref: {}", self.project_ref);
    }
}

/// Short redacted form of a secret. Takes whole chars, not bytes, so a
/// multibyte key near the front cannot split a char boundary.
fn preview(val: &str) -> String {
    let head: String = val.chars().take(5).collect();
    format!("{head}...({} chars)", val.chars().count())
}

fn required(vars: &HashMap<String, String>, key: &'static str) -> Result<String> {
    match vars.get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(SetupError::MissingVar(key)),
    }
}

/// Extract the project ref: `https://abcxyz.supabase.co` -> `abcxyz`.
pub fn project_ref_from_url(raw: &str) -> Result<String> {
    let bad_url = || SetupError::BadUrl { url: raw.to_string() };

    let parsed = Url::parse(raw).map_err(|_| bad_url())?;
    let host = parsed.host_str().ok_or_else(bad_url)?;
    let label = host.split('.').next().filter(|l| !l.is_empty()).ok_or_else(bad_url)?;

    Ok(label.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn env_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_both_vars_and_derives_project_ref() {
        let file = env_file(
            "NEXT_PUBLIC_SUPABASE_URL=https://abcxyz.supabase.co\n\
             SUPABASE_SERVICE_ROLE_KEY=super-secret-key\n",
        );

        let config = SetupConfig::from_env_file(file.path()).unwrap();
        assert_eq!(config.supabase_url, "https://abcxyz.supabase.co");
        assert_eq!(config.service_role_key, "super-secret-key");
        assert_eq!(config.project_ref, "abcxyz");
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = SetupConfig::from_env_file(Path::new("/nonexistent/.env.local")).unwrap_err();
        assert!(matches!(err, SetupError::EnvFileMissing(_)));
    }

    #[test]
    fn missing_url_names_the_variable() {
        let file = env_file("SUPABASE_SERVICE_ROLE_KEY=super-secret-key\n");
        let err = SetupConfig::from_env_file(file.path()).unwrap_err();
        assert!(matches!(err, SetupError::MissingVar(SUPABASE_URL_VAR)));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let file = env_file(
            "NEXT_PUBLIC_SUPABASE_URL=https://abcxyz.supabase.co\n\
             SUPABASE_SERVICE_ROLE_KEY=\n",
        );
        let err = SetupConfig::from_env_file(file.path()).unwrap_err();
        assert!(matches!(err, SetupError::MissingVar(SERVICE_ROLE_KEY_VAR)));
    }

    #[test]
    fn unparseable_url_is_fatal() {
        // No scheme, so this does not parse as an absolute URL.
        let file = env_file(
            "NEXT_PUBLIC_SUPABASE_URL=abcxyz.supabase.co\n\
             SUPABASE_SERVICE_ROLE_KEY=super-secret-key\n",
        );
        let err = SetupConfig::from_env_file(file.path()).unwrap_err();
        assert!(matches!(err, SetupError::BadUrl { .. }));
    }

    #[test]
    fn preview_handles_multibyte_secrets() {
        assert_eq!(preview("super-secret-key"), "super...(16 chars)");
        // Byte 5 lands inside the third 'é'; must not split it.
        assert_eq!(preview("ééééé"), "ééééé...(5 chars)");
        assert_eq!(preview("éé"), "éé...(2 chars)");
    }

    #[test]
    fn log_redacted_evaluates_with_a_multibyte_key() {
        let file = env_file(
            "NEXT_PUBLIC_SUPABASE_URL=https://abcxyz.supabase.co\n\
             SUPABASE_SERVICE_ROLE_KEY=ééééé-clé-secrète\n",
        );
        let config = SetupConfig::from_env_file(file.path()).unwrap();

        // Without a subscriber the tracing args are never evaluated, so
        // install one for the duration of the call.
        let subscriber = tracing_subscriber::fmt().with_writer(std::io::sink).finish();
        tracing::subscriber::with_default(subscriber, || config.log_redacted());
    }

    #[test]
    fn project_ref_is_first_hostname_label() {
        assert_eq!(project_ref_from_url("https://abcxyz.supabase.co").unwrap(), "abcxyz");
        assert_eq!(project_ref_from_url("https://db.example.com/path").unwrap(), "db");
        assert!(project_ref_from_url("mailto:nobody").is_err());
    }
}
