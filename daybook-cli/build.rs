use std::path::Path;
use std::process::Command;

const VAR: &str = "DAYBOOK_BUILD_SHA";

/// `git describe` of the workspace checkout, e.g. `3f2a91c` or `3f2a91c-dirty`.
fn describe(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!rev.is_empty()).then_some(rev)
}

fn main() {
    println!("cargo:rerun-if-env-changed={VAR}");

    // Packaged sources carry no .git; let the packager pass the revision in.
    let rev = match std::env::var(VAR) {
        Ok(preset) if !preset.trim().is_empty() => preset.trim().to_owned(),
        _ => {
            let manifest = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into());
            let workspace = Path::new(&manifest).join("..");
            println!("cargo:rerun-if-changed={}", workspace.join(".git/HEAD").display());
            describe(&workspace).unwrap_or_else(|| "unknown".to_owned())
        }
    };

    println!("cargo:rustc-env={VAR}={rev}");
}
