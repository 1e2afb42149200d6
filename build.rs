fn main() {
    // Release builds set TICKLIST_VERSION; otherwise stamp the git hash.
    if let Ok(version) = std::env::var("TICKLIST_VERSION") {
        println!("cargo:rustc-env=TICKLIST_VERSION={version}");
    } else {
        let hash = std::process::Command::new("git")
            .args(["rev-parse", "--short=7", "HEAD"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .unwrap_or_default()
            .trim()
            .to_string();

        let version = if hash.is_empty() {
            env!("CARGO_PKG_VERSION").to_string()
        } else {
            format!("{}+{hash}", env!("CARGO_PKG_VERSION"))
        };
        println!("cargo:rustc-env=TICKLIST_VERSION={version}");
    }
    println!("cargo:rerun-if-env-changed=TICKLIST_VERSION");
}
