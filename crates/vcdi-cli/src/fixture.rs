//! # Fixture Subcommand
//!
//! Prints the credential a run would send to an issuer.

use anyhow::Result;
use clap::Args;

use vcdi_vc::Fixtures;

/// Arguments for the fixture subcommand.
#[derive(Args, Debug)]
pub struct FixtureArgs {
    /// Fixture name.
    #[arg(default_value = "validVc")]
    pub name: String,

    /// Inject a fresh `urn:uuid` id and this issuer, as a run does.
    #[arg(long)]
    pub issuer: Option<String>,

    /// List fixture names and exit.
    #[arg(long)]
    pub list: bool,
}

/// Execute the fixture subcommand.
pub fn run_fixture(args: &FixtureArgs) -> Result<u8> {
    let fixtures = Fixtures::generate();

    if args.list {
        for name in fixtures.names() {
            println!("{name}");
        }
        return Ok(0);
    }

    let mut credential = fixtures.clone(&args.name)?;
    if let Some(issuer) = &args.issuer {
        credential = credential.with_fresh_identity(issuer);
    }
    println!("{}", serde_json::to_string_pretty(&credential.to_value()?)?);
    Ok(0)
}
