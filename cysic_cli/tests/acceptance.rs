//! Acceptance test: runs the application as a subprocess and asserts its
//! output for given argument combinations matches what is expected.
//!
//! Only offline commands are covered; everything else needs a node.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, trivial_casts, unused_lifetimes, unused_qualifications)]

use abscissa_core::testing::prelude::*;
use cysic_cli::config::CysicCliConfig;
use once_cell::sync::Lazy;
use std::io::BufRead;

/// Executes the application binary via `cargo run`, one invocation at a time.
pub static RUNNER: Lazy<CmdRunner> = Lazy::new(|| CmdRunner::default());

const PRIVATE_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
const ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

#[test]
fn convert_hex_address() {
    let mut runner = RUNNER.clone();
    let mut cmd = runner
        .args(&["convert", &ADDRESS.to_lowercase()])
        .capture_stdout()
        .run();

    cmd.stdout().expect_line(ADDRESS);
    cmd.stdout().expect_regex(r"\Acysic1[02-9ac-hj-np-z]{38}\z");
    cmd.wait().unwrap().expect_success();
}

#[test]
fn convert_rejects_garbage() {
    let mut runner = RUNNER.clone();
    let cmd = runner.args(&["convert", "nonsense"]).run();

    cmd.wait().unwrap().expect_code(1);
}

#[test]
fn sign_then_verify_message() {
    let mut runner = RUNNER.clone();
    let mut cmd = runner
        .args(&["sign-message", "hello cysic", "--private-key", PRIVATE_KEY])
        .capture_stdout()
        .run();
    let mut signature = String::new();
    cmd.stdout().read_line(&mut signature).unwrap();
    cmd.wait().unwrap().expect_success();

    let signature = signature.trim().to_string();
    assert_eq!(signature.len(), 2 + 130);

    let mut runner = RUNNER.clone();
    let mut cmd = runner
        .args(&["verify-message", ADDRESS, "hello cysic", &signature])
        .capture_stdout()
        .run();
    cmd.stdout().expect_line("valid");
    cmd.wait().unwrap().expect_success();
}

#[test]
fn config_file_is_optional() {
    let mut runner = RUNNER.clone();
    let mut cmd = runner
        .config(&CysicCliConfig::default())
        .args(&["convert", ADDRESS])
        .capture_stdout()
        .run();

    cmd.stdout().expect_line(ADDRESS);
    cmd.wait().unwrap().expect_success();
}

#[test]
fn convert_uses_configured_prefixes() {
    let mut config = CysicCliConfig::default();
    config.chain.account_prefix = "evmos".to_string();
    config.chain.validator_prefix = "evmosvaloper".to_string();

    let mut runner = RUNNER.clone();
    let mut cmd = runner
        .config(&config)
        .args(&["convert", ADDRESS, "--validator"])
        .capture_stdout()
        .run();

    cmd.stdout().expect_line(ADDRESS);
    cmd.stdout().expect_regex(r"\Aevmos1[02-9ac-hj-np-z]{38}\z");
    cmd.stdout().expect_regex(r"\Aevmosvaloper1[02-9ac-hj-np-z]{38}\z");
    cmd.wait().unwrap().expect_success();
}
