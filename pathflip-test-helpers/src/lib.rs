// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

/// Compare arbitrary text against a golden file on disk, with an opt-in
/// update mechanism controlled by the PATHFLIP_UPDATE_GOLDEN environment
/// variable. Uses full-string equality (no trimming) for exactness.
pub fn compare_golden_text(got: &str, relpath: &str) {
    let golden_path = Path::new(relpath);
    if std::env::var("PATHFLIP_UPDATE_GOLDEN").is_ok()
        || !golden_path.exists()
        || golden_path.metadata().map(|m| m.len()).unwrap_or(0) == 0
    {
        log::info!(
            "compare_golden_text; writing golden file to {}",
            golden_path.display()
        );
        std::fs::write(golden_path, got).expect("write golden");
    } else {
        log::info!(
            "compare_golden_text; reading golden file from {}",
            golden_path.display()
        );
        let want = std::fs::read_to_string(golden_path).expect("read golden");
        assert_eq!(
            got, want,
            "Golden mismatch; run with PATHFLIP_UPDATE_GOLDEN=1 to update."
        );
    }
}

/// Creates a unique temporary directory for tests under the system temp dir,
/// using the provided base prefix combined with the process id and a nanosecond
/// timestamp.
///
/// The directory is cleaned up automatically when the returned `TempDir` is
/// dropped.
pub fn make_test_tmpdir(base_prefix: &str) -> tempfile::TempDir {
    let _ = env_logger::builder().is_test(true).try_init();
    let pid = std::process::id();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let prefix = format!("{}_{}_{}", base_prefix, pid, nanos);
    tempfile::Builder::new()
        .prefix(&prefix)
        .tempdir_in(std::env::temp_dir())
        .expect("tempdir create")
}

/// Writes an executable `/bin/sh` script named `name` into `dir` whose body is
/// `body`, standing in for a decision procedure binary.
#[cfg(unix)]
pub fn write_fake_solver(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write fake solver");
    let mut perms = std::fs::metadata(&path)
        .expect("fake solver metadata")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake solver");
    path
}

/// Writes a fake solver that answers its `n`th invocation with
/// `responses[n]` and saves the request it was fed, readable afterwards via
/// [`scripted_requests`]. Invocations past the end of the script exit with
/// status 2.
#[cfg(unix)]
pub fn write_scripted_solver(dir: &Path, name: &str, responses: &[&str]) -> PathBuf {
    for (i, response) in responses.iter().enumerate() {
        std::fs::write(dir.join(format!("{}.response.{}", name, i)), response)
            .expect("write scripted response");
    }
    let base = dir.join(name);
    let base = base.display();
    let body = format!(
        "n=$(cat '{base}.count' 2>/dev/null || echo 0)\n\
         echo $((n + 1)) > '{base}.count'\n\
         cat > '{base}.request.'$n\n\
         if [ -f '{base}.response.'$n ]; then\n\
         \x20 cat '{base}.response.'$n\n\
         else\n\
         \x20 echo \"no scripted response $n\" >&2\n\
         \x20 exit 2\n\
         fi",
        base = base
    );
    write_fake_solver(dir, name, &body)
}

/// Requests seen so far by a solver written with [`write_scripted_solver`],
/// in invocation order.
pub fn scripted_requests(dir: &Path, name: &str) -> Vec<String> {
    let mut requests = Vec::new();
    for i in 0.. {
        let path = dir.join(format!("{}.request.{}", name, i));
        if !path.exists() {
            break;
        }
        requests.push(std::fs::read_to_string(&path).expect("read scripted request"));
    }
    requests
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::process::{Command, Stdio};

    fn run(script: &Path, stdin: &str) -> (i32, String) {
        let mut child = Command::new(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        child
            .stdin
            .take()
            .unwrap()
            .write_all(stdin.as_bytes())
            .unwrap();
        let output = child.wait_with_output().unwrap();
        (
            output.status.code().unwrap(),
            String::from_utf8(output.stdout).unwrap(),
        )
    }

    #[test]
    fn test_scripted_solver_replays_in_order() {
        let tmp = make_test_tmpdir("pathflip_scripted");
        let script = write_scripted_solver(tmp.path(), "solver", &["first\n", "second\n"]);
        assert_eq!(run(&script, "a"), (0, "first\n".to_string()));
        assert_eq!(run(&script, "b"), (0, "second\n".to_string()));
        assert_eq!(run(&script, "c").0, 2);
        assert_eq!(
            scripted_requests(tmp.path(), "solver"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
