use std::{
    ffi::OsString,
    io::Read,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread::JoinHandle,
};

use crate::{
    foundation::core::Fps,
    foundation::error::{GlyphReelError, GlyphReelResult},
    graph::model::OperationGraph,
};

/// Encoder settings for the rendered clip.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Video codec (`-c:v`).
    pub codec: String,
    /// Encoder preset (`-preset`).
    pub preset: String,
    /// Constant rate factor (`-crf`), 0..=51.
    pub crf: u8,
    /// Output pixel format (`-pix_fmt`).
    pub pix_fmt: String,
    /// Overwrite the destination if it exists.
    pub overwrite: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            preset: "medium".to_string(),
            crf: 18,
            pix_fmt: "yuv420p".to_string(),
            overwrite: true,
        }
    }
}

impl EncodeConfig {
    pub fn validate(&self) -> GlyphReelResult<()> {
        if self.codec.is_empty() || self.preset.is_empty() || self.pix_fmt.is_empty() {
            return Err(GlyphReelError::validation(
                "encode codec/preset/pix_fmt must be non-empty",
            ));
        }
        if self.crf > 51 {
            return Err(GlyphReelError::validation(format!(
                "encode crf must be within 0..=51, got {}",
                self.crf
            )));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    program_responds(Path::new("ffmpeg"))
}

fn program_responds(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> GlyphReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// A fully resolved `ffmpeg` invocation for one [`OperationGraph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegCommand {
    /// Executable to run; `ffmpeg` resolved through `PATH` unless overridden.
    pub program: PathBuf,
    /// Arguments after the program name.
    pub args: Vec<OsString>,
    /// Destination file.
    pub out_path: PathBuf,
    /// Whether `-y` was passed, i.e. an existing destination may be replaced.
    pub overwrite: bool,
}

impl FfmpegCommand {
    /// Build the command line.
    ///
    /// `input_paths[n]` is the clip for `graph.inputs[n]`; the graph's output label is mapped to
    /// the destination.
    pub fn new(
        graph: &OperationGraph,
        input_paths: &[PathBuf],
        fps: Fps,
        duration_secs: f64,
        out_path: impl Into<PathBuf>,
        cfg: &EncodeConfig,
    ) -> GlyphReelResult<Self> {
        cfg.validate()?;
        graph.validate()?;
        if input_paths.len() != graph.inputs.len() {
            return Err(GlyphReelError::validation(format!(
                "graph declares {} inputs but {} clip paths were given",
                graph.inputs.len(),
                input_paths.len()
            )));
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(GlyphReelError::validation(format!(
                "duration must be finite and > 0, got {duration_secs}"
            )));
        }
        let out_path = out_path.into();

        let mut args = Vec::<OsString>::new();
        args.push(if cfg.overwrite { "-y" } else { "-n" }.into());
        args.extend(["-loglevel", "error"].map(OsString::from));
        for path in input_paths {
            args.push("-i".into());
            args.push(path.as_os_str().to_owned());
        }
        args.push("-filter_complex".into());
        args.push(graph.to_filter_complex().into());
        args.push("-map".into());
        args.push(graph.output.to_string().into());
        for (flag, value) in [
            ("-c:v", cfg.codec.clone()),
            ("-preset", cfg.preset.clone()),
            ("-crf", cfg.crf.to_string()),
            ("-r", fps.to_ffmpeg_rate()),
            ("-t", duration_secs.to_string()),
            ("-pix_fmt", cfg.pix_fmt.clone()),
        ] {
            args.push(flag.into());
            args.push(value.into());
        }
        args.push(out_path.as_os_str().to_owned());

        Ok(Self {
            program: PathBuf::from("ffmpeg"),
            args,
            out_path,
            overwrite: cfg.overwrite,
        })
    }

    /// Run `program` instead of the `ffmpeg` found on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Space-joined command line, for logs.
    pub fn display_line(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Start `ffmpeg` in the background.
    pub fn spawn(self) -> GlyphReelResult<FfmpegJob> {
        ensure_parent_dir(&self.out_path)?;
        if !program_responds(&self.program) {
            return Err(GlyphReelError::validation(format!(
                "ffmpeg is required for rendering, but '{}' could not be run",
                self.program.display()
            )));
        }

        // A destination that predates this job is only ours to delete if ffmpeg may replace it.
        let owns_output = self.overwrite || !self.out_path.exists();

        tracing::debug!(command = %self.display_line(), owns_output, "spawning ffmpeg");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                GlyphReelError::validation(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let mut stderr = child.stderr.take().ok_or_else(|| {
            GlyphReelError::validation("failed to open ffmpeg stderr (unexpected)")
        })?;
        let stderr_drain = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(FfmpegJob {
            child,
            stderr_drain: Some(stderr_drain),
            out_path: self.out_path,
            owns_output,
        })
    }

    /// Spawn and wait for completion.
    pub fn run(self) -> GlyphReelResult<PathBuf> {
        self.spawn()?.wait()
    }
}

/// A running `ffmpeg` process.
///
/// Dropping the job without calling [`FfmpegJob::wait`] or [`FfmpegJob::cancel`] leaves the
/// process running.
#[derive(Debug)]
pub struct FfmpegJob {
    child: Child,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    out_path: PathBuf,
    owns_output: bool,
}

impl FfmpegJob {
    /// OS process id of the running `ffmpeg`.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Wait for `ffmpeg` to exit.
    ///
    /// A non-zero exit returns [`GlyphReelError::BackendExecution`] carrying the captured stderr
    /// verbatim. The destination is removed if this job created it or ran with `-y`; a file that
    /// existed before a `-n` run is left alone.
    pub fn wait(mut self) -> GlyphReelResult<PathBuf> {
        let status = self.child.wait().map_err(|e| {
            GlyphReelError::validation(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr = self.collect_stderr()?;

        if !status.success() {
            self.discard_output();
            tracing::error!(%status, "ffmpeg failed");
            return Err(GlyphReelError::backend(status.to_string(), stderr));
        }

        tracing::info!(out = %self.out_path.display(), "ffmpeg finished");
        Ok(self.out_path)
    }

    /// Kill `ffmpeg` and remove the partial output, under the same rule as [`FfmpegJob::wait`].
    pub fn cancel(mut self) -> GlyphReelResult<()> {
        // Already exited is fine.
        let _ = self.child.kill();
        self.child.wait().map_err(|e| {
            GlyphReelError::validation(format!("failed to reap cancelled ffmpeg: {e}"))
        })?;
        let _ = self.collect_stderr()?;
        self.discard_output();
        tracing::info!(out = %self.out_path.display(), "ffmpeg cancelled");
        Ok(())
    }

    fn discard_output(&self) {
        if self.owns_output {
            remove_partial(&self.out_path);
        } else {
            tracing::debug!(out = %self.out_path.display(), "keeping pre-existing destination");
        }
    }

    fn collect_stderr(&mut self) -> GlyphReelResult<String> {
        let bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| GlyphReelError::validation("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| GlyphReelError::validation(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn remove_partial(path: &Path) {
    if path.exists()
        && let Err(e) = std::fs::remove_file(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
