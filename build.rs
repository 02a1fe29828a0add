fn main() {
    println!("cargo:rerun-if-env-changed=TMUX_TUI_VERSION");

    // Release builds set TMUX_TUI_VERSION (e.g. "v0.1.0"); otherwise append the git hash.
    if let Ok(version) = std::env::var("TMUX_TUI_VERSION") {
        println!("cargo:rustc-env=TMUX_TUI_VERSION={version}");
        return;
    }

    let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .unwrap_or_default()
        .trim()
        .to_string();

    if hash.is_empty() {
        println!("cargo:rustc-env=TMUX_TUI_VERSION=v{pkg}");
    } else {
        println!("cargo:rustc-env=TMUX_TUI_VERSION=v{pkg}-{hash}");
    }
}
