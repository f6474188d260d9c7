//! Runtime configuration resolved from command line and environment

use std::path::PathBuf;

use crate::error::{InventoryError, Result};
use crate::language::Language;
use crate::store::validate_table_name;

/// Where inventory rows live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Hosted Supabase project (PostgREST)
    Supabase { url: String, anon_key: String },
    /// Local SQLite file
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
    pub table: String,
    pub port: u16,
    pub language: Language,
}

/// Raw, unvalidated settings as they come from the CLI
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub database: Option<PathBuf>,
    pub table: String,
    pub port: u16,
    pub language: String,
}

/// Returns the default database path: ~/.local/share/beverage_inventory/inventory.db
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("beverage_inventory")
        .join("inventory.db")
}

/// Treat blank strings (e.g. `SUPABASE_URL=`) as unset
fn normalize_text_option(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Validate raw settings.
    ///
    /// An explicit `database` always selects SQLite. Otherwise Supabase is used
    /// when both URL and key are present, and the default SQLite file when
    /// neither is. Only one of the two is a configuration error.
    pub fn resolve(raw: RawConfig) -> Result<Self> {
        validate_table_name(&raw.table)?;

        let language = Language::from_code(&raw.language).ok_or_else(|| {
            InventoryError::Config(format!("unsupported language: {:?}", raw.language))
        })?;

        let url = normalize_text_option(raw.supabase_url);
        let anon_key = normalize_text_option(raw.supabase_anon_key);

        let backend = match (raw.database, url, anon_key) {
            (Some(path), _, _) => Backend::Sqlite { path },
            (None, Some(url), Some(anon_key)) => Backend::Supabase { url, anon_key },
            (None, None, None) => Backend::Sqlite {
                path: default_db_path(),
            },
            (None, Some(_), None) => {
                return Err(InventoryError::Config(
                    "Supabase URL given without an anon key".to_string(),
                ))
            }
            (None, None, Some(_)) => {
                return Err(InventoryError::Config(
                    "Supabase anon key given without a URL".to_string(),
                ))
            }
        };

        Ok(Self {
            backend,
            table: raw.table,
            port: raw.port,
            language,
        })
    }
}
