use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    // Short commit hash for `--version`. Builds outside a repository
    // (source tarballs) report "release" instead.
    let hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|h| h.trim().to_string())
        .unwrap_or_else(|| "release".to_string());

    println!("cargo:rustc-env=BUILD_GIT_HASH={hash}");
}
