use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rustc-env=NEWSRPM_VERSION={}", version());
}

/// Tag-derived version; untagged or dirty trees get a build timestamp.
fn version() -> String {
    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|text| text.trim().trim_start_matches('v').to_string());

    let built_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    match described {
        Some(tag) if !tag.is_empty() && !tag.ends_with("-dirty") => tag,
        Some(tag) if !tag.is_empty() => format!("{}-{}", tag, built_at),
        _ => format!("0.0.0-unknown-{}", built_at),
    }
}
