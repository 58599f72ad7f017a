//! Main entry point for CysicCli

#![deny(warnings, missing_docs, trivial_casts, unused_qualifications)]
#![forbid(unsafe_code)]

use cysic_cli::application::APP;

/// Boot CysicCli
fn main() {
    abscissa_core::boot(&APP);
}
