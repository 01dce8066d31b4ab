use std::{fs, path::Path};

use colored::Colorize;
use keysmith_key::fingerprint_of_line;

use crate::error::{CliError, CliResult};

pub fn handle(file: &Path) -> CliResult<()> {
    let (fingerprint, key_type) = fingerprint_file(file)?;
    println!("{} {}", fingerprint.bold(), format!("({})", key_type).dimmed());
    Ok(())
}

/// 读取 `.pub` 文件中第一行公钥的指纹和密钥类型
fn fingerprint_file(file: &Path) -> CliResult<(String, String)> {
    if !file.exists() {
        return Err(CliError::FileNotFound(file.to_path_buf()));
    }
    let text = fs::read_to_string(file)?;
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .ok_or_else(|| CliError::InvalidInput(format!("{} contains no public key", file.display())))?;

    let fingerprint = fingerprint_of_line(line)?;
    let key_type = line.split_whitespace().next().unwrap_or_default().to_string();
    Ok((fingerprint, key_type))
}
