// SPDX-License-Identifier: Apache-2.0

//! Runs the external decision procedure as a subprocess.
//!
//! Each solve call opens a [`SolverSession`]: a uniquely named directory
//! holding one request/response/stderr file triple per [`Mode`]. The solver
//! binary is spawned with an explicit argument list, reads the request file
//! on stdin and writes its verdict to the response file.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use log::{debug, info};
use tempfile::TempDir;
use wait_timeout::ChildExt;

use crate::encoder::SolverRequest;
use crate::formula::Mode;
use crate::pathflip_error::PathflipError;

const MAX_STDERR_MESSAGE: usize = 512;

/// Something that can answer solver requests.
///
/// `Session` carries whatever per-call state the implementation needs; the
/// driver opens exactly one per top-level solve call.
pub trait DecisionProcedure {
    type Session;

    fn open_session(&self) -> Result<Self::Session, PathflipError>;

    /// Returns the raw response text for `request`.
    fn check(
        &self,
        session: &mut Self::Session,
        request: &SolverRequest,
    ) -> Result<String, PathflipError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub solver_path: PathBuf,
    pub solver_args: Vec<String>,
    /// Wall-clock budget per invocation; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Parent directory for session directories; the system temp dir when
    /// unset.
    pub work_dir: Option<PathBuf>,
    /// Leave request/response files behind for inspection.
    pub keep_session_files: bool,
}

impl SolverConfig {
    /// CVC3 reading the presentation language from stdin.
    pub fn cvc3() -> Self {
        Self {
            solver_path: PathBuf::from("cvc3"),
            solver_args: Vec::new(),
            timeout: Some(Duration::from_secs(60)),
            work_dir: None,
            keep_session_files: false,
        }
    }

    pub fn with_solver_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.solver_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::cvc3()
    }
}

/// Request, response and stderr paths for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeFiles {
    pub request: PathBuf,
    pub response: PathBuf,
    pub stderr: PathBuf,
}

impl ModeFiles {
    fn new(dir: &Path, mode: Mode) -> Self {
        Self {
            request: dir.join(format!("formula_{}", mode)),
            response: dir.join(format!("solution_{}", mode)),
            stderr: dir.join(format!("stderr_{}", mode)),
        }
    }
}

enum SessionDir {
    Temp(TempDir),
    Kept(PathBuf),
}

/// Files owned by one solve call.
///
/// [`DecisionProcedure::check`] borrows the session mutably, so at most one
/// request is in flight per session, and no two sessions share a directory.
pub struct SolverSession {
    dir: SessionDir,
    integer: ModeFiles,
    string: ModeFiles,
}

impl SolverSession {
    pub fn create(work_dir: Option<&Path>, keep_files: bool) -> Result<Self, PathflipError> {
        let parent = match work_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::temp_dir(),
        };
        std::fs::create_dir_all(&parent).map_err(|e| {
            PathflipError::io(
                format!("creating solver work dir {}", parent.display()),
                e,
            )
        })?;
        let tmp = tempfile::Builder::new()
            .prefix("pathflip_session_")
            .tempdir_in(&parent)
            .map_err(|e| PathflipError::io("creating session dir", e))?;
        let dir = if keep_files {
            let path = tmp.keep();
            info!("Keeping solver session files in {}", path.display());
            SessionDir::Kept(path)
        } else {
            SessionDir::Temp(tmp)
        };
        let path = match &dir {
            SessionDir::Temp(tmp) => tmp.path().to_path_buf(),
            SessionDir::Kept(path) => path.clone(),
        };
        Ok(Self {
            integer: ModeFiles::new(&path, Mode::Integer),
            string: ModeFiles::new(&path, Mode::String),
            dir,
        })
    }

    pub fn dir(&self) -> &Path {
        match &self.dir {
            SessionDir::Temp(tmp) => tmp.path(),
            SessionDir::Kept(path) => path,
        }
    }

    pub fn files(&self, mode: Mode) -> &ModeFiles {
        match mode {
            Mode::Integer => &self.integer,
            Mode::String => &self.string,
        }
    }

}

/// Decision procedure backed by an executable.
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    config: SolverConfig,
    exe: PathBuf,
}

impl ProcessSolver {
    /// Resolves the solver binary up front so a missing solver is reported
    /// before any search starts.
    pub fn new(config: SolverConfig) -> Result<Self, PathflipError> {
        let exe = which::which(&config.solver_path).map_err(|e| {
            PathflipError::BackendUnavailable(format!(
                "solver {} not found: {}",
                config.solver_path.display(),
                e
            ))
        })?;
        Ok(Self { config, exe })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }
}

impl DecisionProcedure for ProcessSolver {
    type Session = SolverSession;

    fn open_session(&self) -> Result<SolverSession, PathflipError> {
        SolverSession::create(
            self.config.work_dir.as_deref(),
            self.config.keep_session_files,
        )
    }

    fn check(
        &self,
        session: &mut SolverSession,
        request: &SolverRequest,
    ) -> Result<String, PathflipError> {
        let mode = request.mode;
        let files = session.files(mode);
        std::fs::write(&files.request, &request.text).map_err(|e| {
            PathflipError::io(format!("writing {}", files.request.display()), e)
        })?;
        debug!("solver request ({} mode):\n{}", mode, request.text);

        let open = |path: &Path, create: bool| {
            let file = if create {
                File::create(path)
            } else {
                File::open(path)
            };
            file.map_err(|e| PathflipError::io(format!("opening {}", path.display()), e))
        };
        let stdin = open(&files.request, false)?;
        let stdout = open(&files.response, true)?;
        let stderr = open(&files.stderr, true)?;

        let mut command = Command::new(&self.exe);
        command
            .args(&self.config.solver_args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        info!("Running solver ({} mode): {:?}", mode, command);

        let mut child = command.spawn().map_err(|e| {
            PathflipError::BackendUnavailable(format!(
                "failed to spawn {}: {}",
                self.exe.display(),
                e
            ))
        })?;
        let status = match self.config.timeout {
            Some(timeout) => match child
                .wait_timeout(timeout)
                .map_err(|e| PathflipError::io("waiting for solver", e))?
            {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(PathflipError::SolverTimeout(timeout));
                }
            },
            None => child
                .wait()
                .map_err(|e| PathflipError::io("waiting for solver", e))?,
        };

        if !status.success() {
            let mut msg = format!("solver exited with status {}", status);
            let stderr = std::fs::read_to_string(&files.stderr).unwrap_or_default();
            if !stderr.trim().is_empty() {
                let snippet: String = stderr.trim().chars().take(MAX_STDERR_MESSAGE).collect();
                msg.push_str(": ");
                msg.push_str(&snippet);
            }
            return Err(PathflipError::BackendUnavailable(msg));
        }

        let response = std::fs::read_to_string(&files.response).map_err(|e| {
            PathflipError::io(format!("reading {}", files.response.display()), e)
        })?;
        debug!("solver response ({} mode):\n{}", mode, response);
        Ok(response)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::formula::Var;
    use std::collections::BTreeSet;

    fn request(mode: Mode, text: &str) -> SolverRequest {
        SolverRequest {
            mode,
            text: text.to_string(),
            free_vars: BTreeSet::from([Var::plain("x")]),
        }
    }

    fn solver_for(script: &Path, timeout: Option<Duration>) -> ProcessSolver {
        ProcessSolver::new(
            SolverConfig::cvc3()
                .with_solver_path(script)
                .with_timeout(timeout),
        )
        .unwrap()
    }

    #[test]
    fn test_request_is_fed_on_stdin() {
        let tmp = pathflip_test_helpers::make_test_tmpdir("pathflip_echo_solver");
        let script = pathflip_test_helpers::write_fake_solver(tmp.path(), "echo_solver", "cat");
        let solver = solver_for(&script, Some(Duration::from_secs(10)));
        let mut session = solver.open_session().unwrap();
        let text = "x : INT;\nCHECKSAT (x > 0);\nCOUNTERMODEL;\n";
        let got = solver
            .check(&mut session, &request(Mode::Integer, text))
            .unwrap();
        assert_eq!(got, text);
        assert_eq!(
            std::fs::read_to_string(&session.files(Mode::Integer).request).unwrap(),
            text
        );
    }

    #[test]
    fn test_modes_use_separate_files() {
        let tmp = pathflip_test_helpers::make_test_tmpdir("pathflip_mode_files");
        let script = pathflip_test_helpers::write_fake_solver(tmp.path(), "echo_solver", "cat");
        let solver = solver_for(&script, None);
        let mut session = solver.open_session().unwrap();
        solver
            .check(&mut session, &request(Mode::Integer, "integer request\n"))
            .unwrap();
        solver
            .check(&mut session, &request(Mode::String, "string request\n"))
            .unwrap();
        let integer = session.files(Mode::Integer).clone();
        let string = session.files(Mode::String).clone();
        assert_ne!(integer.request, string.request);
        assert_eq!(
            std::fs::read_to_string(&integer.response).unwrap(),
            "integer request\n"
        );
        assert_eq!(
            std::fs::read_to_string(&string.response).unwrap(),
            "string request\n"
        );
    }

    #[test]
    fn test_session_files_are_removed_on_drop() {
        let tmp = pathflip_test_helpers::make_test_tmpdir("pathflip_session_drop");
        let session = SolverSession::create(Some(tmp.path()), false).unwrap();
        let dir = session.dir().to_path_buf();
        assert!(dir.exists());
        drop(session);
        assert!(!dir.exists());

        let kept = SolverSession::create(Some(tmp.path()), true).unwrap();
        let dir = kept.dir().to_path_buf();
        drop(kept);
        assert!(dir.exists());
    }

    #[test]
    fn test_back_to_back_kept_sessions_get_distinct_dirs() {
        let tmp = pathflip_test_helpers::make_test_tmpdir("pathflip_session_kept");
        let sessions: Vec<SolverSession> = (0..16)
            .map(|_| SolverSession::create(Some(tmp.path()), true).unwrap())
            .collect();
        let dirs: BTreeSet<PathBuf> = sessions.iter().map(|s| s.dir().to_path_buf()).collect();
        assert_eq!(dirs.len(), sessions.len());
        for dir in &dirs {
            assert!(dir.starts_with(tmp.path()));
            assert!(dir
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with("pathflip_session_")));
        }
    }

    #[test]
    fn test_abnormal_exit_is_backend_failure() {
        let tmp = pathflip_test_helpers::make_test_tmpdir("pathflip_crashing_solver");
        let script = pathflip_test_helpers::write_fake_solver(
            tmp.path(),
            "crashing_solver",
            "echo 'parse error near CHECKSAT' >&2\nexit 3",
        );
        let solver = solver_for(&script, Some(Duration::from_secs(10)));
        let mut session = solver.open_session().unwrap();
        let err = solver
            .check(&mut session, &request(Mode::Integer, "CHECKSAT TRUE;\n"))
            .unwrap_err();
        match err {
            PathflipError::BackendUnavailable(msg) => {
                assert!(msg.contains("parse error near CHECKSAT"), "msg: {}", msg)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_hung_solver_times_out() {
        let tmp = pathflip_test_helpers::make_test_tmpdir("pathflip_hung_solver");
        let script =
            pathflip_test_helpers::write_fake_solver(tmp.path(), "hung_solver", "exec sleep 30");
        let solver = solver_for(&script, Some(Duration::from_millis(200)));
        let mut session = solver.open_session().unwrap();
        let start = std::time::Instant::now();
        let err = solver
            .check(&mut session, &request(Mode::Integer, "CHECKSAT TRUE;\n"))
            .unwrap_err();
        assert!(matches!(err, PathflipError::SolverTimeout(_)));
        assert!(start.elapsed() < Duration::from_secs(20));
    }

    #[test]
    fn test_missing_solver_is_reported_up_front() {
        let err = ProcessSolver::new(
            SolverConfig::cvc3().with_solver_path("/nonexistent/pathflip/cvc3"),
        )
        .unwrap_err();
        assert!(matches!(err, PathflipError::BackendUnavailable(_)));
    }
}
