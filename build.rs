//! Build script that stamps the binary with its provenance.
//!
//! Exposed to the crate at compile time and shown by `tm --version`:
//! - `TM_BUILD_TIMESTAMP`: UTC time of the build, ISO 8601
//! - `TM_GIT_COMMIT`: `git describe` of the checkout, or "unknown" outside a repository

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let built = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=TM_BUILD_TIMESTAMP={}", built);

    let commit = describe_checkout().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=TM_GIT_COMMIT={}", commit);
}

fn describe_checkout() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    (!described.is_empty()).then(|| described.to_string())
}
