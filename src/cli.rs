use anyhow::{anyhow, Context, Result};
use byteme::datetime::{self, PackedFields};
use byteme::{varint, BigInt, NaiveDateTime};
use clap::{Parser, Subcommand};
use num_traits::Signed;
use tracing::debug;

use crate::config::{CliConfig, DEFAULT_CONFIG_FILE};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(name = "byteme")]
#[command(about = "Inspect LEB128 varints and packed DATETIME values")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Config file path")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// LEB128 variable-length integers
    Varint {
        #[command(subcommand)]
        varint_cmd: VarintCommands,
    },
    /// 5-byte packed DATETIME values
    Datetime {
        #[command(subcommand)]
        datetime_cmd: DatetimeCommands,
    },
    /// Write a config file with default settings
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

#[derive(Subcommand)]
pub enum VarintCommands {
    /// Encode a decimal (or 0x-prefixed hex) integer
    Encode {
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(long)]
        signed: bool,
    },
    /// Decode the first varint from hex bytes
    Decode {
        hex: String,
        #[arg(long)]
        signed: bool,
        #[arg(long, help = "Fail if the value runs longer than this many bytes")]
        max_bytes: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum DatetimeCommands {
    /// Encode "YYYY-MM-DD HH:MM:SS"
    Encode {
        value: String,
        #[arg(long, help = "Skip calendar validation (allows zero dates)")]
        raw: bool,
    },
    /// Decode 5 hex bytes
    Decode {
        hex: String,
        #[arg(long, help = "Print raw fields instead of a calendar value")]
        raw: bool,
    },
}

pub fn run(cli: Cli, config: &CliConfig) -> Result<()> {
    let output = match cli.command {
        Commands::Varint { varint_cmd } => run_varint(varint_cmd, config, cli.json)?,
        Commands::Datetime { datetime_cmd } => run_datetime(datetime_cmd, config, cli.json)?,
        Commands::GenerateConfig { output } => {
            CliConfig::default().save(&output)?;
            if cli.json {
                serde_json::json!({"config": output}).to_string()
            } else {
                format!("✅ Config written to {}", output)
            }
        }
    };
    println!("{}", output);
    Ok(())
}

/// Output text of a `varint` subcommand.
fn run_varint(cmd: VarintCommands, config: &CliConfig, json: bool) -> Result<String> {
    match cmd {
        VarintCommands::Encode { value, signed } => {
            let value = parse_integer(&value)?;
            let bytes = varint::encode(value.clone(), signed)?;
            let hex = config.format_hex(&bytes);

            if json {
                Ok(serde_json::json!({
                    "value": value.to_string(),
                    "signed": signed,
                    "bytes": hex,
                    "size": bytes.len(),
                })
                .to_string())
            } else {
                Ok(hex)
            }
        }
        VarintCommands::Decode { hex, signed, max_bytes } => {
            let bytes = parse_hex(&hex)?;
            let max_bytes = max_bytes.or(config.default_max_bytes);
            debug!("Decoding {} bytes with max_bytes={:?}", bytes.len(), max_bytes);

            let (value, size) = varint::decode(&bytes, signed, max_bytes)?;
            let trailing = config.format_hex(&bytes[size..]);

            if json {
                return Ok(serde_json::json!({
                    "value": value.to_string(),
                    "signed": signed,
                    "size": size,
                    "trailing": trailing,
                })
                .to_string());
            }

            let mut text = format!("{}\n   Bytes consumed: {}", value, size);
            if !trailing.is_empty() {
                text.push_str(&format!("\n   Trailing bytes: {}", trailing));
            }
            Ok(text)
        }
    }
}

/// Output text of a `datetime` subcommand.
fn run_datetime(cmd: DatetimeCommands, config: &CliConfig, json: bool) -> Result<String> {
    match cmd {
        DatetimeCommands::Encode { value, raw } => {
            let bytes = if raw {
                datetime::encode_fields(&parse_fields(&value)?)
            } else {
                let dt = NaiveDateTime::parse_from_str(&value, DATETIME_FORMAT)
                    .with_context(|| format!("invalid datetime '{}'", value))?;
                datetime::encode(&dt)
            };
            let hex = config.format_hex(&bytes);

            if json {
                Ok(serde_json::json!({"value": value, "bytes": hex}).to_string())
            } else {
                Ok(hex)
            }
        }
        DatetimeCommands::Decode { hex, raw } => {
            let bytes = parse_hex(&hex)?;
            if raw {
                let fields = datetime::decode_fields(&bytes)?;
                if json {
                    Ok(serde_json::to_string(&fields)?)
                } else {
                    Ok(format_fields(&fields))
                }
            } else {
                let text = datetime::decode(&bytes)?.format(DATETIME_FORMAT).to_string();
                if json {
                    Ok(serde_json::json!({"value": text}).to_string())
                } else {
                    Ok(text)
                }
            }
        }
    }
}

/// Decimal, or hex with a `0x` prefix; either may carry a leading `-`.
pub fn parse_integer(s: &str) -> Result<BigInt> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => BigInt::parse_bytes(hex.as_bytes(), 16),
        None => BigInt::parse_bytes(digits.as_bytes(), 10),
    }
    .filter(|v| !v.is_negative())
    .ok_or_else(|| anyhow!("invalid integer '{}'", s))?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Hex bytes; spaces are ignored so "8e 32" works.
pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).with_context(|| format!("invalid hex '{}'", s))
}

/// "YYYY-MM-DD HH:MM:SS" split into raw fields with no calendar checks.
pub fn parse_fields(s: &str) -> Result<PackedFields> {
    let parts = s
        .split(|c: char| c == '-' || c == ':' || c == ' ' || c == 'T')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid datetime fields '{}'", s))?;

    match parts.as_slice() {
        [year, month, day, hour, minute, second] => Ok(PackedFields {
            year: *year,
            month: *month,
            day: *day,
            hour: *hour,
            minute: *minute,
            second: *second,
        }),
        _ => Err(anyhow!("expected 6 datetime fields in '{}', got {}", s, parts.len())),
    }
}

fn format_fields(f: &PackedFields) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        f.year, f.month, f.day, f.hour, f.minute, f.second
    )
}
