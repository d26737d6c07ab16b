//! The `veil tables` command: print the permutation tables for a size.

use clap::Args;
use serde::Serialize;
use veil_core::codec::PasswordKey;
use veil_core::{Config, KeyDerivation};

/// Arguments for the `tables` command.
#[derive(Args, Debug)]
pub struct TablesArgs {
    /// Image width in pixels
    #[arg(long)]
    pub width: usize,

    /// Image height in pixels
    #[arg(long)]
    pub height: usize,

    /// Password keying the permutation
    #[arg(short = 'P', long, env = "VEIL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Key with the SHA-256 hex digest of the password
    #[arg(long)]
    pub prehash: bool,
}

#[derive(Debug, Serialize)]
struct TablesReport {
    width: usize,
    height: usize,
    column_digest: String,
    row_digest: String,
    columns: Vec<usize>,
    rows: Vec<usize>,
}

/// Reject sizes no image within `limits.max_image_dimension` could have.
fn check_size(args: &TablesArgs, config: &Config) -> anyhow::Result<()> {
    let max = config.limits.max_image_dimension as usize;
    if args.width > max || args.height > max {
        anyhow::bail!(
            "{}x{} exceeds the maximum image dimension of {}.\n\n  \
             Hint: Raise limits.max_image_dimension in the config file.",
            args.width,
            args.height,
            max
        );
    }
    Ok(())
}

fn build_report(args: &TablesArgs, password: &str) -> TablesReport {
    let derivation = if args.prehash {
        KeyDerivation::Sha256
    } else {
        KeyDerivation::Raw
    };
    let key = PasswordKey::derive(password, derivation);
    let tables = key.axis_tables(args.width, args.height);
    TablesReport {
        width: args.width,
        height: args.height,
        column_digest: key.column_digest(),
        row_digest: key.row_digest(),
        columns: tables.columns.into_vec(),
        rows: tables.rows.into_vec(),
    }
}

/// Execute the tables command.
pub async fn execute(args: TablesArgs, config: &Config) -> anyhow::Result<()> {
    let Some(password) = args.password.as_deref() else {
        anyhow::bail!("No password given. Pass --password or set VEIL_PASSWORD.");
    };
    check_size(&args, config)?;
    let report = build_report(&args, password);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(width: usize, height: usize, prehash: bool) -> TablesArgs {
        TablesArgs {
            width,
            height,
            password: None,
            prehash,
        }
    }

    #[test]
    fn test_tables_for_known_key() {
        let report = build_report(&args(5, 4, false), "test");
        assert_eq!(report.columns, vec![4, 2, 0, 1, 3]);
        assert_eq!(report.rows, vec![3, 2, 0, 1]);
        assert_eq!(
            report.column_digest,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_prehash_changes_tables_input() {
        let plain = build_report(&args(10, 3, false), "test");
        let hashed = build_report(&args(10, 3, true), "test");
        // Prehashing keys the columns with what the raw key feeds the rows
        assert_eq!(hashed.column_digest, plain.row_digest);
        assert_ne!(hashed.columns, plain.columns);
    }

    #[test]
    fn test_size_capped_by_limits() {
        let mut config = Config::default();
        config.limits.max_image_dimension = 64;
        assert!(check_size(&args(64, 64, false), &config).is_ok());
        assert!(check_size(&args(65, 8, false), &config).is_err());
        assert!(check_size(&args(8, usize::MAX, false), &config).is_err());
    }

    #[tokio::test]
    async fn test_execute_refuses_huge_size() {
        let huge = TablesArgs {
            password: Some("pw".to_string()),
            ..args(usize::MAX / 2, 4, false)
        };
        let err = execute(huge, &Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("maximum image dimension"));
    }

    #[test]
    fn test_zero_size_gives_empty_tables() {
        let report = build_report(&args(0, 0, false), "test");
        assert!(report.columns.is_empty());
        assert!(report.rows.is_empty());
    }
}
