//! Thumbnail downloads through yt-dlp.

use std::path::Path;

use tracing::{debug, warn};
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    process::{CommandRunner, Invocation},
    tool::Tool,
};

/// Watch page that yt-dlp resolves video identifiers against.
const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Build the watch URL for a video identifier.
pub fn video_url(video_id: &str) -> Result<Url> {
    Url::parse_with_params(WATCH_URL, &[("v", video_id)]).map_err(|error| Error::VideoUrl {
        video_id: video_id.to_string(),
        source: error,
    })
}

/// Result of asking yt-dlp for a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// yt-dlp exited successfully.
    Completed,
    /// yt-dlp failed with the given stderr.
    Failed(String),
}

/// Thin wrapper over the yt-dlp command line.
pub struct YtDlp<'a, R> {
    /// Runner used to execute yt-dlp.
    runner: &'a R,
    /// Base yt-dlp invocation from config.
    base: Invocation,
}

impl<'a, R: CommandRunner> YtDlp<'a, R> {
    /// Build a wrapper from config.
    pub(crate) fn new(runner: &'a R, config: &Config) -> Self {
        Self {
            runner,
            base: Tool::YtDlp.invocation(config),
        }
    }

    /// Check that yt-dlp can be run.
    pub(crate) async fn ensure_available(&self) -> Result<()> {
        let invocation = self.base.clone().arg("--version");
        match self.runner.run(&invocation).await {
            Ok(output) if output.success => {
                debug!(version = output.stdout.trim(), "found yt-dlp");
                Ok(())
            }
            Ok(output) => {
                debug!(stderr = output.stderr.trim(), "yt-dlp --version failed");
                Err(Tool::YtDlp.unavailable())
            }
            Err(error) => {
                debug!(%error, "yt-dlp could not be run");
                Err(Tool::YtDlp.unavailable())
            }
        }
    }

    /// Write the best thumbnail for `url` to the `output` prefix as a JPEG, skipping the video.
    pub(crate) async fn fetch_thumbnail(&self, url: &Url, output: &Path) -> Result<FetchOutcome> {
        let invocation = self
            .base
            .clone()
            .args([
                "--write-thumbnail",
                "--skip-download",
                "--convert-thumbnails",
                "jpg",
                "-o",
            ])
            .arg(output.to_string_lossy())
            .arg(url.as_str());

        let result = self.runner.run(&invocation).await?;
        if result.success {
            return Ok(FetchOutcome::Completed);
        }
        let stderr = result.stderr.trim().to_string();
        warn!(%url, stderr = %stderr, "yt-dlp failed");
        Ok(FetchOutcome::Failed(stderr))
    }
}
