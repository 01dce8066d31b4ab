use std::{
    fs,
    path::{Path, PathBuf},
};

use keysmith_key::{Algorithm, PrivateKeyFormat};
use serde::Deserialize;

use crate::error::{CliError, CliResult};

/// 未指定 `--config` 时从当前目录读取的配置文件
pub const DEFAULT_CONFIG_FILE: &str = "keysmith.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub defaults: DefaultsCfg,
    pub log: LogCfg,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsCfg {
    pub algorithm: Algorithm,
    pub output_dir: String,
    pub filename: String,
    pub format: PrivateKeyFormat,
}

impl Default for DefaultsCfg {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Ed25519,
            output_dir: "~/.ssh".to_string(),
            filename: "id_ssh".to_string(),
            format: PrivateKeyFormat::OpenSsh,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogCfg {
    pub level: String,
}

impl Default for LogCfg {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// 加载 `config_path`; 未指定时读取 [`DEFAULT_CONFIG_FILE`], 都不存在则使用默认配置
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let path = match config_path {
            Some(path) if !path.exists() => return Err(CliError::FileNotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let text = fs::read_to_string(&path)?;
        Self::parse(&text).map_err(|source| CliError::Config { path, source })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// 使用 `HOME` (Windows 上为 `USERPROFILE`) 展开路径开头的 `~`
pub fn expand_home(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with(['/', '\\']) => {
            PathBuf::from(home).join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.defaults.algorithm, Algorithm::Ed25519);
        assert_eq!(settings.defaults.filename, "id_ssh");
        assert_eq!(settings.defaults.format, PrivateKeyFormat::OpenSsh);
        assert_eq!(settings.log.level, "warn");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::parse(
            r#"
            [defaults]
            algorithm = "ecdsa"
            format = "pkcs8"
            "#,
        )
        .unwrap();

        assert_eq!(settings.defaults.algorithm, Algorithm::Ecdsa);
        assert_eq!(settings.defaults.format, PrivateKeyFormat::Pkcs8);
        assert_eq!(settings.defaults.output_dir, "~/.ssh");
        assert_eq!(settings.log.level, "warn");
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!(Settings::parse("[defaults]\nalgorithm = \"dsa\"\n").is_err());
        assert!(Settings::parse("[defaults]\nsize = 4096\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keysmith.toml");
        fs::write(&path, "[log]\nlevel = \"debug\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.log.level, "debug");

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(CliError::FileNotFound(_))
        ));

        fs::write(&path, "[log\n").unwrap();
        assert!(matches!(Settings::load(Some(&path)), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/tmp/keys"), PathBuf::from("/tmp/keys"));
        assert_eq!(expand_home("keys"), PathBuf::from("keys"));
        assert_eq!(expand_home("~other/keys"), PathBuf::from("~other/keys"));
    }
}
