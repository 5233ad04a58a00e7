use crate::config::Config;
use crate::error::ExecError;
use crate::security::CommandValidator;
use crate::shell::workdir;
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::sync::Mutex;

/// Result of a successful command execution
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub stdout: String,
    pub stderr: String,
    pub working_directory: PathBuf,
    pub timestamp: DateTime<Utc>,
}

/// Executes commands through the host shell against a tracked working directory
///
/// The working directory outlives every spawned subprocess: a `cd` changes
/// the directory of the child shell only, so the executor re-resolves the
/// target itself and carries it over to the next command.
pub struct ShellExecutor {
    shell: PathBuf,
    login_shell: bool,
    path_prefix: Vec<PathBuf>,
    max_output_bytes: usize,
    home: PathBuf,
    /// Serializes executions: held from directory read to directory commit
    exec_lock: Mutex<()>,
    /// Tracked working directory; locked only briefly so reads stay
    /// responsive while a command runs
    workdir: Mutex<PathBuf>,
    validator: CommandValidator,
}

impl ShellExecutor {
    /// Create an executor rooted at the user's home directory
    pub fn new(config: &Config) -> io::Result<Self> {
        let home = workdir::home_dir()?;
        Self::with_workdir(config, &home)
    }

    /// Create an executor rooted at a specific directory
    pub fn with_workdir<P: AsRef<Path>>(config: &Config, dir: P) -> io::Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("working directory does not exist: {}", dir.display()),
            ));
        }

        let home = workdir::home_dir()?;

        let shell = config.shell.resolve_program();
        if !shell.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("shell not found: {}", shell.display()),
            ));
        }

        let path_prefix = config
            .shell
            .path_prefix
            .iter()
            .map(|entry| expand_home(entry, &home))
            .collect();

        Ok(Self {
            shell,
            login_shell: config.shell.login_shell,
            path_prefix,
            max_output_bytes: config.shell.max_output_bytes,
            home,
            exec_lock: Mutex::new(()),
            workdir: Mutex::new(dir.to_path_buf()),
            validator: CommandValidator::new(),
        })
    }

    /// Execute a command string and return its captured output
    ///
    /// The command text is handed to the shell verbatim; pipes, redirects
    /// and chaining all work. There is no execution timeout: long-running
    /// scripts run to completion.
    pub async fn execute(&self, command: &str) -> Result<ExecutionRecord, ExecError> {
        self.validator.validate(command)?;

        let cd_request = workdir::cd_target(command);

        // One execution at a time: the guard spans directory read to
        // directory commit, so two concurrent requests can never run in a
        // directory neither asked for.
        let _serial = self.exec_lock.lock().await;

        let current = self.workdir.lock().await.clone();

        let output = self
            .shell_command(command, &current)
            .output()
            .await
            .map_err(ExecError::Spawn)?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if stdout.len() > self.max_output_bytes || stderr.len() > self.max_output_bytes {
            return Err(ExecError::OutputOverflow(self.max_output_bytes));
        }

        // Exit status is the sole failure signal; stderr alone is not.
        if !output.status.success() {
            return Err(ExecError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        let mut final_dir = current;
        if let Some(target) = cd_request {
            let requested = workdir::resolve_cd_target(target, &final_dir, &self.home);
            // Only commit a target that exists and is a directory right now.
            // Anything else leaves the tracked directory untouched without
            // failing the execution.
            if let Ok(resolved) = requested.canonicalize() {
                if resolved.is_dir() {
                    *self.workdir.lock().await = resolved.clone();
                    final_dir = resolved;
                }
            }
        }

        Ok(ExecutionRecord {
            stdout,
            stderr,
            working_directory: final_dir,
            timestamp: Utc::now(),
        })
    }

    /// Current tracked working directory
    pub async fn current_dir(&self) -> PathBuf {
        self.workdir.lock().await.clone()
    }

    fn shell_command(&self, command: &str, cwd: &Path) -> Command {
        let mut cmd = Command::new(&self.shell);
        if self.login_shell {
            cmd.arg("-l");
        }
        cmd.arg("-c").arg(command).current_dir(cwd);

        if let Some(path) = self.prefixed_path() {
            cmd.env("PATH", path);
        }

        cmd
    }

    /// Host PATH with the configured toolchain directories prepended
    fn prefixed_path(&self) -> Option<OsString> {
        if self.path_prefix.is_empty() {
            return None;
        }

        let existing = std::env::var_os("PATH").unwrap_or_default();
        let entries = self
            .path_prefix
            .iter()
            .cloned()
            .chain(std::env::split_paths(&existing));

        std::env::join_paths(entries).ok()
    }
}

fn expand_home(entry: &str, home: &Path) -> PathBuf {
    match entry.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::ValidationError;
    use tempfile::TempDir;

    fn test_config() -> Config {
        let mut config = Config::default_config();
        config.shell.program = Some("/bin/sh".to_string());
        config.shell.login_shell = false;
        config.shell.path_prefix = Vec::new();
        config
    }

    fn test_executor(dir: &Path) -> ShellExecutor {
        ShellExecutor::with_workdir(&test_config(), dir).unwrap()
    }

    #[tokio::test]
    async fn test_execute_echo() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        let record = executor.execute("echo hello").await.unwrap();
        assert_eq!(record.stdout, "hello\n");
        assert_eq!(record.stderr, "");
    }

    #[tokio::test]
    async fn test_stderr_is_not_failure() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        let record = executor.execute("echo warning 1>&2").await.unwrap();
        assert_eq!(record.stdout, "");
        assert_eq!(record.stderr, "warning\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        let result = executor.execute("exit 3").await;
        assert!(matches!(
            result.unwrap_err(),
            ExecError::NonZeroExit { code: 3, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_command_rejected() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        let result = executor.execute("   ").await;
        assert!(matches!(
            result.unwrap_err(),
            ExecError::Rejected(ValidationError::EmptyCommand)
        ));
    }

    #[tokio::test]
    async fn test_blocked_command_rejected() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        let result = executor.execute("shutdown -h now").await;
        assert!(matches!(
            result.unwrap_err(),
            ExecError::Rejected(ValidationError::BlockedCommand(_))
        ));
    }

    #[tokio::test]
    async fn test_pipes_are_delegated_to_shell() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        let record = executor.execute("echo hi | tr i o").await.unwrap();
        assert_eq!(record.stdout, "ho\n");
    }

    #[tokio::test]
    async fn test_commands_run_in_tracked_directory() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        let record = executor.execute("pwd").await.unwrap();
        let reported = PathBuf::from(record.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_cd_updates_working_directory() {
        let temp = TempDir::new().unwrap();
        let sub = temp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();

        let executor = test_executor(temp.path());

        executor.execute("cd sub").await.unwrap();
        assert_eq!(
            executor.current_dir().await,
            sub.canonicalize().unwrap()
        );

        // The next command observes the new directory
        let record = executor.execute("pwd").await.unwrap();
        assert_eq!(
            PathBuf::from(record.stdout.trim()).canonicalize().unwrap(),
            sub.canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_cd_to_missing_directory_leaves_state_unchanged() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());
        let before = executor.current_dir().await;

        // The shell itself reports failure for the missing target
        let result = executor.execute("cd /no/such/path").await;
        assert!(matches!(result.unwrap_err(), ExecError::NonZeroExit { .. }));

        assert_eq!(executor.current_dir().await, before);
    }

    #[tokio::test]
    async fn test_back_to_back_cd_sequencing() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = a.join("b");
        std::fs::create_dir_all(&b).unwrap();

        let executor = test_executor(temp.path());

        // Each cd resolves against the directory left by the previous one
        executor.execute("cd a").await.unwrap();
        executor.execute("cd b").await.unwrap();
        assert_eq!(
            executor.current_dir().await,
            b.canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_cd_parent_directory() {
        let temp = TempDir::new().unwrap();
        let sub = temp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();

        let executor = test_executor(&sub);

        executor.execute("cd ..").await.unwrap();
        assert_eq!(
            executor.current_dir().await,
            temp.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_cd_absolute_path() {
        let temp = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();

        let executor = test_executor(temp.path());

        let command = format!("cd {}", other.path().display());
        executor.execute(&command).await.unwrap();
        assert_eq!(
            executor.current_dir().await,
            other.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_bare_cd_goes_home() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        executor.execute("cd").await.unwrap();
        assert_eq!(
            executor.current_dir().await,
            workdir::home_dir().unwrap().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_output_overflow() {
        let temp = TempDir::new().unwrap();
        let mut config = test_config();
        config.shell.max_output_bytes = 4;
        let executor = ShellExecutor::with_workdir(&config, temp.path()).unwrap();

        let result = executor.execute("echo hello").await;
        assert!(matches!(result.unwrap_err(), ExecError::OutputOverflow(4)));
    }

    #[tokio::test]
    async fn test_missing_executable_is_nonzero_exit() {
        let temp = TempDir::new().unwrap();
        let executor = test_executor(temp.path());

        // The shell spawns fine and reports the missing executable itself
        let result = executor.execute("definitely-not-a-real-command-xyz").await;
        assert!(matches!(result.unwrap_err(), ExecError::NonZeroExit { .. }));
    }

    #[tokio::test]
    async fn test_missing_shell_rejected_at_construction() {
        let temp = TempDir::new().unwrap();
        let mut config = test_config();
        config.shell.program = Some("/no/such/shell".to_string());

        let result = ShellExecutor::with_workdir(&config, temp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/u");
        assert_eq!(
            expand_home("~/.cargo/bin", home),
            PathBuf::from("/home/u/.cargo/bin")
        );
        assert_eq!(
            expand_home("/usr/local/bin", home),
            PathBuf::from("/usr/local/bin")
        );
    }
}
