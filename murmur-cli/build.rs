use std::path::Path;
use std::process::Command;

fn git(repo_root: &str, args: &[&str]) -> Option<String> {
    Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = format!("{}/..", manifest_dir);

    let sha = git(&repo_root, &["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=MURMUR_BUILD_SHA={}", sha);

    // HEAD only changes on checkout; new commits move the branch ref it points to.
    if let Some(git_dir) = git(&repo_root, &["rev-parse", "--absolute-git-dir"]) {
        let git_dir = Path::new(&git_dir);
        let head_ref = git(&repo_root, &["symbolic-ref", "-q", "HEAD"]);
        let watched = ["HEAD", "packed-refs"]
            .into_iter()
            .map(|f| git_dir.join(f))
            .chain(head_ref.map(|r| git_dir.join(r)));
        // A missing path would force a rerun on every build.
        for path in watched.filter(|p| p.exists()) {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}
