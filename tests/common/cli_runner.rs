use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

/// Result of one converter invocation.
pub struct RunResult {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    fn from_output(output: Output) -> Self {
        Self {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn stderr_lines(&self) -> Vec<&str> {
        self.stderr.lines().collect()
    }
}

pub fn unique_temp_dir(tag: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("f256conv-it-{tag}-{now}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn write_text(path: &Path, text: &str) {
    fs::write(path, text).expect("write file");
}

pub fn read_text(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

/// Run the converter in `dir` with a clean `F256CONV_*` environment.
pub fn run_in(dir: &Path, args: &[&str]) -> RunResult {
    let mut command = Command::new(converter_binary_path());
    command.current_dir(dir).args(args);
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("F256CONV_") {
            command.env_remove(key);
        }
    }
    RunResult::from_output(command.output().expect("spawn f256conv"))
}

pub fn converter_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_f256conv"))
}
