use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::Command;

fn binary_output(args: &[&OsStr]) -> std::process::Output {
    let path = env!("CARGO_BIN_EXE_symwalk");
    Command::new(path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|error| panic!("failed to run {}: {}", path, error))
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .expect("stdout is UTF-8")
        .lines()
        .map(str::to_owned)
        .collect()
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn symwalk_help_lists_usage() {
    let output = binary_output(&[OsStr::new("--help")]);
    assert!(output.status.success(), "--help should succeed");
    assert!(
        output.stderr.is_empty(),
        "help output should not write to stderr"
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("symwalk"));
    assert!(stdout.contains("--follow-symlinks"));
}

#[test]
fn symwalk_without_root_shows_usage() {
    let output = binary_output(&[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("Usage:"));
}

#[test]
fn symwalk_prints_tree_depth_first() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("r");
    fs::create_dir_all(root.join("a")).expect("create tree");
    fs::write(root.join("a").join("x"), b"").expect("write x");
    fs::write(root.join("b"), b"").expect("write b");

    let output = binary_output(&[root.as_os_str()]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![
            display(&root),
            display(&root.join("a")),
            display(&root.join("a").join("x")),
            display(&root.join("b")),
        ]
    );
}

#[cfg(unix)]
#[test]
fn symwalk_follows_symlinks_only_when_asked() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let base = fs::canonicalize(temp.path()).expect("canonical tempdir");
    let root = base.join("root");
    let target = base.join("target");
    fs::create_dir(&root).expect("root");
    fs::create_dir(&target).expect("target");
    fs::write(target.join("inner"), b"").expect("inner");
    symlink(&target, root.join("link")).expect("symlink");

    let plain = binary_output(&[OsStr::new("-F"), root.as_os_str()]);
    assert!(plain.status.success());
    assert_eq!(
        stdout_lines(&plain),
        vec![
            format!("{}/", display(&root)),
            format!("{}@", display(&root.join("link"))),
        ]
    );

    let followed = binary_output(&[OsStr::new("-L"), root.as_os_str()]);
    assert!(followed.status.success());
    assert_eq!(
        stdout_lines(&followed),
        vec![
            display(&root),
            display(&root.join("link")),
            display(&root.join("link").join("inner")),
        ]
    );
}

#[cfg(unix)]
#[test]
fn symwalk_reports_cycles_and_exits_partial() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = fs::canonicalize(temp.path()).expect("canonical").join("root");
    fs::create_dir(&root).expect("root");
    symlink(&root, root.join("loop")).expect("symlink");

    let output = binary_output(&[OsStr::new("--follow-symlinks"), root.as_os_str()]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_lines(&output), vec![display(&root)]);
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("symlink cycle"));
}
