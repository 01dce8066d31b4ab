use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Key(#[from] keysmith_key::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Refusing to overwrite {0} (pass --force to replace it)")]
    FileExists(PathBuf),
}

impl From<keysmith_key::ParameterError> for CliError {
    fn from(e: keysmith_key::ParameterError) -> Self {
        CliError::Key(e.into())
    }
}

impl CliError {
    /// 展示给用户的错误信息
    ///
    /// 参数错误直接显示; 后端错误只给出概要, 详情写入日志
    pub fn user_message(&self) -> String {
        match self {
            CliError::Key(keysmith_key::Error::InvalidParameter(e)) => e.to_string(),
            CliError::Key(keysmith_key::Error::CryptoBackend(_))
            | CliError::Key(keysmith_key::Error::Encoding(_)) => {
                "key generation failed, see the log for details".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
