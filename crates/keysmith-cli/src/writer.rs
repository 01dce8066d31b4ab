//! 将生成结果写入 `<name>` 和 `<name>.pub`

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use keysmith_key::GenerationResult;
use tracing::{info, warn};

use crate::error::{CliError, CliResult};

pub const FALLBACK_FILENAME: &str = "id_ssh";

const INVALID_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// 将路径和 shell 中的特殊字符替换为 `_`
///
/// 处理后为空或只剩下划线的文件名改用 `id_ssh`
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let sanitized = replaced.trim().trim_matches('.');

    if sanitized.trim_matches('_').is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized.to_string()
    }
}

#[derive(Debug)]
pub struct WrittenFiles {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

/// 将私钥和公钥写入 `dir`, 目录不存在时自动创建
///
/// 未设置 `overwrite` 时不覆盖已有文件; 设置后先删除旧文件再重新创建。
/// Unix 上私钥权限为 0600, 公钥为 0644。公钥写入失败时删除已写入的私钥。
pub fn write_key_files(
    result: &GenerationResult,
    dir: &Path,
    name: &str,
    overwrite: bool,
) -> CliResult<WrittenFiles> {
    fs::create_dir_all(dir)?;

    let name = sanitize_filename(name);
    let private_key = dir.join(&name);
    let public_key = dir.join(format!("{}.pub", name));

    for path in [&private_key, &public_key] {
        if !path.exists() {
            continue;
        }
        if !overwrite {
            return Err(CliError::FileExists(path.clone()));
        }
        if path.is_file() {
            fs::remove_file(path)?;
        }
    }

    write_file(&private_key, result.private_key().as_bytes(), 0o600)?;
    if let Err(e) = write_file(&public_key, result.public_key().as_bytes(), 0o644) {
        if let Err(cleanup) = fs::remove_file(&private_key) {
            warn!(path = %private_key.display(), error = %cleanup, "could not remove private key");
        }
        return Err(e);
    }

    info!(
        private_key = %private_key.display(),
        public_key = %public_key.display(),
        "key files written"
    );
    Ok(WrittenFiles {
        private_key,
        public_key,
    })
}

/// 新建 `path` 并写入内容, 文件必须不存在, 保证写入前权限已生效
fn write_file(path: &Path, contents: &[u8], mode: u32) -> CliResult<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => CliError::FileExists(path.to_path_buf()),
        _ => CliError::from(e),
    })?;
    file.write_all(contents)?;
    file.sync_all()?;

    // umask 可能收窄创建时的权限
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}
