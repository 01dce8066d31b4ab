use colored::Colorize;
use keysmith_key::Algorithm;
use serde::Serialize;

use crate::error::CliResult;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct AlgorithmEntry {
    algorithm: Algorithm,
    sizes: &'static [u32],
    default_size: Option<u32>,
}

fn entries() -> Vec<AlgorithmEntry> {
    Algorithm::ALL
        .iter()
        .map(|&algorithm| AlgorithmEntry {
            algorithm,
            sizes: algorithm.allowed_sizes(),
            default_size: algorithm.default_size(),
        })
        .collect()
}

pub fn handle(json: bool) -> CliResult<()> {
    let entries = entries();
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "支持的算法:".cyan());
    for entry in entries {
        let sizes = if entry.sizes.is_empty() {
            "固定长度".to_string()
        } else {
            entry
                .sizes
                .iter()
                .map(|size| match entry.default_size {
                    Some(default) if default == *size => format!("{} (默认)", size).bold().to_string(),
                    _ => size.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("  {:<8} {}", entry.algorithm.to_string().green(), sizes);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_follow_catalog() {
        let entries = entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[1],
            AlgorithmEntry {
                algorithm: Algorithm::Rsa,
                sizes: &[2048, 3072, 4096],
                default_size: Some(3072),
            }
        );
        assert!(entries[0].sizes.is_empty());
        assert_eq!(entries[0].default_size, None);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(entries()).unwrap();
        assert_eq!(json[2]["algorithm"], "ecdsa");
        assert_eq!(json[2]["sizes"], serde_json::json!([256, 384, 521]));
        assert_eq!(json[2]["default_size"], 256);
    }
}
