use std::env;
use std::process::Command;
use time::OffsetDateTime;

fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

    println!("cargo:rustc-env=APP_BUILD_YEAR={}", build_year());

    let package_version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    println!(
        "cargo:rustc-env=APP_VERSION_DISPLAY={}",
        display_version(&package_version)
    );
}

// Reproducible builds pin the year through SOURCE_DATE_EPOCH
fn build_year() -> i32 {
    env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|epoch| OffsetDateTime::from_unix_timestamp(epoch).ok())
        .map(|dt| dt.year())
        .unwrap_or_else(|| OffsetDateTime::now_utc().year())
}

/// Release builds show the plain version; others get `-dev` unless HEAD carries the matching tag
fn display_version(package_version: &str) -> String {
    if env::var("PROFILE").as_deref() == Ok("release") {
        return package_version.to_string();
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    let tagged = Command::new("git")
        .args(["describe", "--tags", "--exact-match"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .is_some_and(|tag| tag.trim() == format!("v{package_version}"));

    if tagged {
        package_version.to_string()
    } else {
        format!("{package_version}-dev")
    }
}
