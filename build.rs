fn main() {
    // Re-run if git HEAD changes (new commits, checkouts, etc.)
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    println!("cargo:rustc-env=GIT_HASH={}", git_short_hash());
    println!("cargo:rustc-env=ON_RELEASE_TAG={}", on_release_tag());
}

/// Short hash of HEAD, or empty when not building from a git checkout.
fn git_short_hash() -> String {
    git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default()
}

/// Whether HEAD sits exactly on a release tag.
fn on_release_tag() -> bool {
    git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some()
}

fn git(args: &[&str]) -> Option<String> {
    let output = std::process::Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
