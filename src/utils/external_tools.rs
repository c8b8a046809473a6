use crate::config::Config;
use crate::error::{ReportError, ReportResult};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// The external assembly-statistics executable, run once per sample.
#[derive(Debug, Clone)]
pub struct ReadStatsTool {
    exe: String,
    interval: u32,
}

impl ReadStatsTool {
    pub fn new(exe: impl Into<String>, interval: u32) -> Self {
        ReadStatsTool {
            exe: exe.into(),
            interval,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.read_stats_exe.clone(), config.read_stats_interval)
    }

    fn command(&self, fasta: &Path) -> Command {
        let mut command = Command::new(&self.exe);
        command
            .arg("-f")
            .arg(fasta)
            .arg("-i")
            .arg(self.interval.to_string());
        command
    }

    pub fn command_line(&self, fasta: &Path) -> String {
        format!("{} -f {} -i {}", self.exe, fasta.display(), self.interval)
    }

    /// Run the tool on `fasta`. Stdout is returned and also kept in
    /// `<out_dir>/<sample>/read-stats.txt`; stderr goes to `stderr.txt` beside it.
    pub fn run(&self, fasta: &Path, out_dir: &Path, sample: &str) -> ReportResult<String> {
        let path = out_dir.join(sample);
        fs::create_dir_all(&path).map_err(|e| ReportError::io(&path, e))?;

        let stderr_path = path.join("stderr.txt");
        let stderr = File::create(&stderr_path).map_err(|e| ReportError::io(&stderr_path, e))?;

        let failure = |reason: String| ReportError::ExternalTool {
            sample: sample.to_string(),
            command: self.command_line(fasta),
            reason,
        };

        let output = self
            .command(fasta)
            .stdout(Stdio::piped())
            .stderr(Stdio::from(stderr))
            .output()
            .map_err(|e| failure(e.to_string()))?;

        if !output.status.success() {
            return Err(failure(format!("exited with {}", output.status)));
        }

        let stats = String::from_utf8_lossy(&output.stdout).into_owned();
        let stats_path = path.join("read-stats.txt");
        fs::write(&stats_path, &stats).map_err(|e| ReportError::io(&stats_path, e))?;
        Ok(stats)
    }
}

/// Run the tool for every sample. A failing sample is reported and left
/// out; the others are unaffected.
pub fn collect_read_stats(
    tool: &ReadStatsTool,
    samples: &[(String, PathBuf)],
    out_dir: &Path,
) -> BTreeMap<String, String> {
    let mut stats = BTreeMap::new();
    for (sample, fasta) in samples {
        match tool.run(fasta, out_dir, sample) {
            Ok(text) => {
                info!("read stats collected for {}", sample);
                stats.insert(sample.clone(), text);
            }
            Err(e) => warn!("skipping read stats: {}", e),
        }
    }
    stats
}
