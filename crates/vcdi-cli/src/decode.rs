//! # Decode Subcommand
//!
//! Decodes a base58-btc multibase value and, when it carries a multicodec
//! prefix, reports the codec and the remaining key bytes. Useful for
//! checking a `publicKeyMultibase` or `proofValue` by hand.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use vcdi_core::multibase;
use vcdi_core::KeyMaterial;

/// Arguments for the decode subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Multibase value (must start with `z`).
    pub value: String,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Decoded {
    length: usize,
    hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    codec: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    codec_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_length: Option<usize>,
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn inspect(value: &str) -> Result<Decoded> {
    let bytes = multibase::decode(value).with_context(|| format!("cannot decode {value:?}"))?;
    let key = KeyMaterial::from_prefixed(&bytes).ok();
    Ok(Decoded {
        length: bytes.len(),
        hex: to_hex(&bytes),
        codec: key.as_ref().map(|k| k.codec),
        codec_name: key.as_ref().and_then(KeyMaterial::codec_name),
        key_length: key.as_ref().map(KeyMaterial::len),
    })
}

/// Execute the decode subcommand.
pub fn run_decode(args: &DecodeArgs) -> Result<u8> {
    let decoded = inspect(&args.value)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(0);
    }

    println!("  bytes:      {}", decoded.length);
    println!("  hex:        {}", decoded.hex);
    if let Some(codec) = decoded.codec {
        println!(
            "  multicodec: 0x{codec:x} ({})",
            decoded.codec_name.unwrap_or("unknown")
        );
    }
    if let Some(key_length) = decoded.key_length {
        println!("  remainder:  {key_length} bytes");
    }
    Ok(0)
}
