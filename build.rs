// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=OPTICHECK_VERSION");

    // Packaged builds pin the version explicitly
    let version = std::env::var("OPTICHECK_VERSION").unwrap_or_else(|_| kiosk_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Crate version tagged with the commit it was built from.
///
/// - "0.1.0" outside a git checkout
/// - "0.1.0-abcdef1" on a clean tree
/// - "0.1.0-dirty-abcdef1" when the working tree has local changes
fn kiosk_version() -> String {
    let base = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());

    let Some(hash) = git(&["rev-parse", "--short", "HEAD"]) else {
        return base;
    };

    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());

    if dirty {
        format!("{}-dirty-{}", base, hash)
    } else {
        format!("{}-{}", base, hash)
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
