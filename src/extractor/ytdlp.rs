use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use super::{DownloadReport, ExtractError, ExtractOptions, RawVideoInfo, VideoExtractor};

const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Interface for the [yt-dlp](https://github.com/yt-dlp/yt-dlp) program
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn common_args(options: &ExtractOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--no-warnings".into(),
            "--no-playlist".into(),
            "--user-agent".into(),
            options.user_agent.clone().into(),
        ];
        if options.no_check_certificate {
            args.push("--no-check-certificates".into());
        }
        args
    }

    fn info_args(url: &str, options: &ExtractOptions) -> Vec<OsString> {
        let mut args = Self::common_args(options);
        // Multi-entry results (carousels, playlists) still come back as one document
        args.extend(
            ["--quiet", "--skip-download", "--dump-single-json", "--"].map(OsString::from),
        );
        args.push(url.into());
        args
    }

    fn download_args(url: &str, options: &ExtractOptions) -> Vec<OsString> {
        let mut args = Self::common_args(options);
        if let Some(format) = &options.format {
            args.push("-f".into());
            args.push(format.into());
        }
        if let Some(dir) = &options.output_dir {
            args.push("-o".into());
            args.push(dir.join(OUTPUT_TEMPLATE).into_os_string());
        }
        // `--print` implies `--simulate`; the after_move stage only fires once
        // the file is in place, so the download still has to happen
        args.extend(["--no-simulate", "--print", "after_move:filepath", "--"].map(OsString::from));
        args.push(url.into());
        args
    }

    /// Run the program, mapping a non-zero exit to [`ExtractError::Failed`].
    async fn run(&self, args: Vec<OsString>) -> Result<Output, ExtractError> {
        debug!(program = %self.program, ?args, "Executing extractor");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExtractError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        debug!(
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Extractor finished"
        );
        trace!(stderr = %String::from_utf8_lossy(&output.stderr), "Extractor stderr");

        if output.status.success() {
            Ok(output)
        } else {
            Err(ExtractError::Failed(failure_message(
                &String::from_utf8_lossy(&output.stderr),
                output.status.code(),
            )))
        }
    }
}

#[async_trait]
impl VideoExtractor for YtDlp {
    async fn extract_info(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<RawVideoInfo, ExtractError> {
        let output = self.run(Self::info_args(url, options)).await?;
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn download(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<DownloadReport, ExtractError> {
        let output = self.run(Self::download_args(url, options)).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        Ok(DownloadReport {
            filepath: reported_filepath(&stdout),
        })
    }
}

/// Collect the `ERROR:` lines yt-dlp writes to stderr.
fn failure_message(stderr: &str, code: Option<i32>) -> String {
    let errors: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("ERROR:"))
        .collect();

    if !errors.is_empty() {
        return errors.join("\n");
    }

    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    match code {
        Some(code) => format!("extractor exited with status {code}"),
        None => "extractor terminated by signal".to_string(),
    }
}

fn reported_filepath(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(PathBuf::from)
}
