//! # vcdi-cli: Command-Line Front End
//!
//! Argument types and handlers for the `vcdi` binary. Handlers return the
//! process exit code; conformance logic lives in the library crates.
//!
//! ## Subcommands
//!
//! - `vcdi run`: run rule sets against the configured implementations.
//! - `vcdi decode`: inspect a multibase / multicodec value.
//! - `vcdi fixture`: print a generated credential fixture.
//!
//! ```bash
//! vcdi run --suite create --cryptosuite eddsa-rdfc-2022
//! vcdi -v run --suite all --format json --output report.json
//! vcdi decode z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK
//! ```

pub mod decode;
pub mod fixture;
pub mod run;
