use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use clap::Args;
use colored::Colorize;
use keysmith_key::{Algorithm, GenerationRequest, GenerationResult, KeyGenerator, PrivateKeyFormat};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::{
    error::{CliError, CliResult},
    settings::{expand_home, Settings},
    writer::{write_key_files, WrittenFiles},
};

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// 密钥算法: ed25519、rsa 或 ecdsa
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// 密钥长度 (RSA: 2048, 3072, 4096; ECDSA: 256, 384, 521)
    #[arg(short, long)]
    pub bits: Option<u32>,

    /// 公钥注释, 例如 user@host
    #[arg(short = 'C', long)]
    pub comment: Option<String>,

    /// 从该环境变量读取私钥口令
    #[arg(long, value_name = "VAR", conflicts_with = "ask_passphrase_stdin")]
    pub passphrase_env: Option<String>,

    /// 从标准输入的第一行读取私钥口令
    #[arg(long)]
    pub ask_passphrase_stdin: bool,

    /// 私钥格式: openssh 或 pkcs8
    #[arg(long)]
    pub format: Option<PrivateKeyFormat>,

    /// 输出目录
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 文件名, 公钥文件追加 `.pub` 后缀
    #[arg(short, long)]
    pub name: Option<String>,

    /// 覆盖已存在的密钥文件
    #[arg(long)]
    pub force: bool,

    /// 以 JSON 格式输出摘要
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    #[serde(flatten)]
    summary: keysmith_key::PublicKeySummary,
    private_key_path: &'a Path,
    public_key_path: &'a Path,
}

pub fn handle(args: GenerateArgs, settings: &Settings) -> CliResult<()> {
    let passphrase = read_passphrase(&args)?;
    if !args.json {
        let algorithm = args.algorithm.unwrap_or(settings.defaults.algorithm);
        println!("{}", format!("生成 {} 密钥对...", algorithm).cyan());
    }

    let (result, written) = run(&args, settings, passphrase, &KeyGenerator::new())?;

    if args.json {
        let output = GenerateOutput {
            summary: result.summary(),
            private_key_path: &written.private_key,
            public_key_path: &written.public_key,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} 私钥已保存到: {}", "✓".green(), written.private_key.display());
    println!("{} 公钥已保存到: {}", "✓".green(), written.public_key.display());
    println!();
    println!("{}", "密钥信息:".cyan());
    println!("  算法: {}", result.algorithm());
    if let Some(size) = result.size() {
        println!("  密钥长度: {} 位", size);
    }
    println!("  私钥格式: {}", result.format());
    println!(
        "  已加密: {}",
        if result.is_encrypted() { "是".green() } else { "否".yellow() }
    );
    println!("  公钥指纹: {}", result.fingerprint().bold());
    println!();
    print!("{}", result.public_key());

    Ok(())
}

fn run<E: keysmith_key::EntropySource>(
    args: &GenerateArgs,
    settings: &Settings,
    passphrase: Option<Zeroizing<String>>,
    generator: &KeyGenerator<E>,
) -> CliResult<(GenerationResult, WrittenFiles)> {
    let mut request = GenerationRequest::new(args.algorithm.unwrap_or(settings.defaults.algorithm))
        .format(args.format.unwrap_or(settings.defaults.format));
    request.size = args.bits;
    request.comment = args.comment.clone();
    request.passphrase = passphrase;

    let result = generator.generate_key(&request)?;

    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| expand_home(&settings.defaults.output_dir));
    let name = args.name.as_deref().unwrap_or(&settings.defaults.filename);
    let written = write_key_files(&result, &dir, name, args.force)?;

    Ok((result, written))
}

/// 空口令表示不加密私钥。
fn read_passphrase(args: &GenerateArgs) -> CliResult<Option<Zeroizing<String>>> {
    let passphrase = if let Some(var) = &args.passphrase_env {
        let value = std::env::var(var).map_err(|_| {
            CliError::InvalidInput(format!("environment variable {} is not set or not UTF-8", var))
        })?;
        Zeroizing::new(value)
    } else if args.ask_passphrase_stdin {
        read_line(io::stdin().lock())?
    } else {
        return Ok(None);
    };

    Ok(if passphrase.is_empty() { None } else { Some(passphrase) })
}

fn read_line(mut input: impl BufRead) -> CliResult<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    input.read_line(&mut line)?;
    let len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(len);
    Ok(line)
}
