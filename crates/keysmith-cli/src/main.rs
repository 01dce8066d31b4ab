//! keysmith SSH 密钥生成命令行工具

mod commands;
mod error;
mod logging;
mod settings;
mod writer;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::generate::GenerateArgs;
use error::CliResult;
use settings::Settings;
use tracing::error;

#[derive(Parser)]
#[command(name = "keysmith")]
#[command(about = "keysmith SSH 密钥生成工具 - 生成 Ed25519、RSA 和 ECDSA 密钥对")]
#[command(version)]
struct Cli {
    /// 配置文件 (默认读取当前目录下的 keysmith.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成新的密钥对
    Generate(GenerateArgs),

    /// 列出支持的算法和密钥长度
    Algorithms {
        /// 以 JSON 格式输出
        #[arg(long)]
        json: bool,
    },

    /// 显示公钥文件的 SHA256 指纹
    Fingerprint {
        /// 公钥文件路径 (`.pub`)
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn run(cli: Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    logging::init(&settings.log.level);

    match cli.command {
        Commands::Generate(args) => commands::generate::handle(args, &settings)?,
        Commands::Algorithms { json } => commands::algorithms::handle(json)?,
        Commands::Fingerprint { file } => commands::fingerprint::handle(&file)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{} {}", "错误:".red().bold(), e.user_message());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "keysmith", "generate", "-a", "rsa", "-b", "4096", "-C", "alice@laptop", "--format",
            "pkcs8", "--force",
        ])
        .unwrap();

        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.algorithm, Some(keysmith_key::Algorithm::Rsa));
        assert_eq!(args.bits, Some(4096));
        assert_eq!(args.comment.as_deref(), Some("alice@laptop"));
        assert_eq!(args.format, Some(keysmith_key::PrivateKeyFormat::Pkcs8));
        assert!(args.force);
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        assert!(Cli::try_parse_from(["keysmith", "generate", "-a", "dsa"]).is_err());
    }

    #[test]
    fn test_passphrase_sources_conflict() {
        assert!(Cli::try_parse_from([
            "keysmith",
            "generate",
            "--passphrase-env",
            "PASS",
            "--ask-passphrase-stdin",
        ])
        .is_err());
    }
}
