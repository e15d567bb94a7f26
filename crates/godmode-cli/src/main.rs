//! # godmode CLI entry point
//!
//! Parses command-line arguments, installs logging, loads the optional
//! configuration file and dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use godmode_cli::cipher::{run_cipher, CipherArgs};
use godmode_cli::color::{run_color, ColorArgs};
use godmode_cli::config::Config;
use godmode_cli::cron::{run_cron, CronArgs};
use godmode_cli::datauri::{run_datauri, DataUriArgs};
use godmode_cli::diff::{run_diff, DiffArgs};
use godmode_cli::encode::{run_encode, EncodeArgs};
use godmode_cli::hash::{run_hash, HashArgs};
use godmode_cli::json::{run_json, JsonArgs};
use godmode_cli::radix::{run_radix, RadixArgs};
use godmode_cli::regex::{run_regex, RegexArgs};
use godmode_cli::time::{run_time, TimeArgs};
use godmode_cli::token::{run_token, TokenArgs};
use godmode_cli::uuid::{run_uuid, UuidArgs};

/// godmode: offline developer utilities
///
/// Encoders, digests, JSON formatting, regex testing, timestamps, radix
/// conversion, line diffs, cron previews, passphrase encryption, token
/// inspection and UUIDs, one subcommand each.
#[derive(Parser, Debug)]
#[command(name = "godmode", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode or decode Base64, Base64url, Base32, Base58, hex, URL or HTML.
    Encode(EncodeArgs),

    /// MD5, SHA-1, SHA-2 and CRC32 digests, or HMACs with --hmac-key.
    Hash(HashArgs),

    /// Pretty-print, minify or summarize JSON.
    Json(JsonArgs),

    /// Find or replace pattern matches.
    Regex(RegexArgs),

    /// Convert between Unix epoch values and ISO 8601.
    Time(TimeArgs),

    /// Convert integers between bases 2 through 36.
    Radix(RadixArgs),

    /// Line diff of two files.
    Diff(DiffArgs),

    /// Describe a cron expression and list its next runs.
    Cron(CronArgs),

    /// Passphrase encryption (encrypt, decrypt).
    Cipher(CipherArgs),

    /// Compact token inspection (decode, verify, sign).
    Token(TokenArgs),

    /// Generate version 4 UUIDs.
    Uuid(UuidArgs),

    /// Convert between hex, rgb() and hsl() colours.
    Color(ColorArgs),

    /// Wrap bytes in a data: URI or unpack one.
    #[command(name = "datauri")]
    DataUri(DataUriArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("godmode CLI starting");

    let result = Config::load(cli.config.as_deref()).and_then(|config| dispatch(cli.command, &config));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn dispatch(command: Commands, config: &Config) -> anyhow::Result<u8> {
    match command {
        Commands::Encode(args) => run_encode(&args),
        Commands::Hash(args) => run_hash(&args, config),
        Commands::Json(args) => run_json(&args),
        Commands::Regex(args) => run_regex(&args),
        Commands::Time(args) => run_time(&args),
        Commands::Radix(args) => run_radix(&args),
        Commands::Diff(args) => run_diff(&args),
        Commands::Cron(args) => run_cron(&args, config),
        Commands::Cipher(args) => run_cipher(&args, config),
        Commands::Token(args) => run_token(&args),
        Commands::Uuid(args) => run_uuid(&args),
        Commands::Color(args) => run_color(&args),
        Commands::DataUri(args) => run_datauri(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["godmode", "hash", "abc", "-vv", "--config", "g.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("g.yaml")));
        assert!(matches!(cli.command, Commands::Hash(_)));
    }

    #[test]
    fn encode_format_parses() {
        let cli = Cli::try_parse_from(["godmode", "encode", "-F", "base58", "Hello"]).unwrap();
        let Commands::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.format, godmode_core::Format::Base58);
        assert_eq!(args.input.text.as_deref(), Some("Hello"));
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(Cli::try_parse_from(["godmode", "encode", "-F", "rot13", "x"]).is_err());
    }

    #[test]
    fn token_verify_requires_a_key() {
        assert!(Cli::try_parse_from(["godmode", "token", "verify", "a.b.c"]).is_err());
        assert!(Cli::try_parse_from(["godmode", "token", "verify", "a.b.c", "--secret", "s"]).is_ok());
    }

    #[test]
    fn cipher_requires_passphrase_source() {
        assert!(Cli::try_parse_from(["godmode", "cipher", "encrypt", "hi"]).is_err());
        assert!(Cli::try_parse_from(["godmode", "cipher", "encrypt", "hi", "--passphrase", "pw"]).is_ok());
    }

    #[test]
    fn time_unit_and_negative_radix() {
        let cli = Cli::try_parse_from(["godmode", "time", "1700000000000", "--unit", "ms"]).unwrap();
        let Commands::Time(args) = cli.command else {
            panic!("expected time");
        };
        assert_eq!(args.unit, godmode_core::EpochUnit::Milliseconds);

        let cli = Cli::try_parse_from(["godmode", "radix", "--from", "16", "--", "-ff"]).unwrap();
        let Commands::Radix(args) = cli.command else {
            panic!("expected radix");
        };
        assert_eq!(args.number, "-ff");
    }

    #[test]
    fn datauri_output_requires_decode() {
        assert!(Cli::try_parse_from(["godmode", "datauri", "--output", "x.bin", "abc"]).is_err());
    }
}
