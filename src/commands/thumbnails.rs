//! Implementation of the `dirkit thumbnails` command.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use crate::{
    commands::{ColorChoice, emit},
    config::Config,
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_fail_mark, fmt_heading, fmt_ok_mark},
    paths::resolve_directory,
    process::{CommandRunner, SystemRunner},
    thumbnail::{
        self, VideoFile, find_downloaded, find_existing, final_path, move_into_place, temp_output,
    },
    ytdlp::{FetchOutcome, YtDlp, video_url},
};

/// Width of the header rule.
const HEADER_RULE_WIDTH: usize = 60;
/// Width of the rule between files in execute mode.
const ITEM_RULE_WIDTH: usize = 50;

/// Options for the thumbnails command.
#[derive(Debug, Clone)]
pub struct ThumbnailOptions {
    /// Directory to scan.
    pub(crate) directory: PathBuf,
    /// Download for real instead of printing a plan.
    pub(crate) execute: bool,
    /// Descend into subdirectories.
    pub(crate) recursive: bool,
}

/// Counts reported in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThumbnailSummary {
    /// Files with a video identifier that were handled.
    pub(crate) processed: usize,
    /// Files whose thumbnail exists, was downloaded, or would be downloaded.
    pub(crate) succeeded: usize,
}

/// Execute the thumbnails command.
pub async fn run(
    color: ColorChoice,
    config_path: Option<PathBuf>,
    options: ThumbnailOptions,
) -> Result<ExitCode> {
    let config = Config::load(config_path.as_deref())?;
    process(
        &SystemRunner,
        &config,
        color.enabled(),
        &options,
        &mut io::stdout().lock(),
    )
    .await?;
    Ok(ExitCode::SUCCESS)
}

/// Scan for video files and fetch or plan their thumbnails.
pub(crate) async fn process<R: CommandRunner>(
    runner: &R,
    config: &Config,
    use_color: bool,
    options: &ThumbnailOptions,
    out: &mut dyn Write,
) -> Result<ThumbnailSummary> {
    let directory = resolve_directory(&options.directory)?;
    let dry_run = !options.execute;

    emit(out, format_args!("Processing files in: {}", directory.display()))?;
    if options.recursive {
        emit(out, "🔁 RECURSIVE MODE - Processing subdirectories")?;
    }
    if dry_run {
        emit(out, "🔍 DRY RUN MODE - No files will be downloaded")?;
        emit(out, "   Use -x or --execute to actually download thumbnails")?;
    } else {
        emit(out, "🚀 EXECUTE MODE - Downloading thumbnails")?;
    }
    emit(out, "-".repeat(HEADER_RULE_WIDTH))?;

    let ytdlp = YtDlp::new(runner, config);
    if !dry_run {
        ytdlp.ensure_available().await?;
    }

    let scan = thumbnail::scan(&directory, options.recursive)?;
    let mut diagnostics = Diagnostics::new(use_color);
    for (path, reason) in &scan.skipped {
        diagnostics.warn(out, format!("Skipping {}: {reason}", path.display()))?;
    }

    let files = scan.files;
    let total = files.len();
    let mut summary = ThumbnailSummary::default();

    for (index, file) in files.iter().enumerate() {
        emit(out, format_args!("Processing: {}", file.path.display()))?;
        emit(out, format_args!("Video ID: {}", file.video_id))?;

        if fetch_one(&ytdlp, file, dry_run, use_color, &mut diagnostics, out).await? {
            summary.succeeded += 1;
        }
        summary.processed += 1;

        if !dry_run {
            emit(
                out,
                format_args!("{} of {} remaining", total - (index + 1), total),
            )?;
            emit(out, "-".repeat(ITEM_RULE_WIDTH))?;
        }
    }

    emit(out, "")?;
    emit(out, fmt_heading("Summary:", use_color))?;
    emit(out, format_args!("Files processed: {}", summary.processed))?;
    if dry_run {
        emit(
            out,
            format_args!("Would download: {} thumbnails", summary.succeeded),
        )?;
        emit(out, "")?;
        emit(out, "💡 Run with -x to actually download the thumbnails")?;
    } else {
        emit(
            out,
            format_args!("Thumbnails downloaded: {}", summary.succeeded),
        )?;
        emit(
            out,
            format_args!("Failed: {}", summary.processed - summary.succeeded),
        )?;
    }

    diagnostics.print_warning_summary();
    Ok(summary)
}

/// Handle one file, returning whether its thumbnail is in place (or would be).
async fn fetch_one<R: CommandRunner>(
    ytdlp: &YtDlp<'_, R>,
    file: &VideoFile,
    dry_run: bool,
    use_color: bool,
    diagnostics: &mut Diagnostics,
    out: &mut dyn Write,
) -> Result<bool> {
    let fail = fmt_fail_mark(use_color);
    let dir = file.dir();
    let id = &file.video_id;

    if let Some(existing) = find_existing(dir, &file.base_name) {
        emit(
            out,
            format_args!("Thumbnail already exists: {} (skipping)", existing.display()),
        )?;
        return Ok(true);
    }

    let url = match video_url(id) {
        Ok(url) => url,
        Err(error) => {
            emit(out, format_args!("{fail} Error processing {id}: {error}"))?;
            diagnostics.record(error.to_string());
            return Ok(false);
        }
    };

    if dry_run {
        emit(out, format_args!("[DRY RUN] Would download: {url}"))?;
        emit(
            out,
            format_args!(
                "[DRY RUN] Would save as: {}",
                dir.join(format!("{}.jpg", file.base_name)).display()
            ),
        )?;
        return Ok(true);
    }

    let temp = temp_output(dir, id);
    match ytdlp.fetch_thumbnail(&url, &temp).await {
        Ok(FetchOutcome::Completed) => {}
        Ok(FetchOutcome::Failed(stderr)) => {
            emit(
                out,
                format_args!("{fail} Failed to download thumbnail for {id}: {stderr}"),
            )?;
            diagnostics.record(format!("Failed to download thumbnail for {id}"));
            return Ok(false);
        }
        Err(error) => {
            emit(out, format_args!("{fail} Error processing {id}: {error}"))?;
            diagnostics.record(error.to_string());
            return Ok(false);
        }
    }

    let Some(downloaded) = find_downloaded(&temp) else {
        emit(out, format_args!("{fail} Thumbnail file not found for {id}"))?;
        return Ok(false);
    };

    let destination = final_path(dir, &file.base_name, &downloaded);
    if let Err(error) = move_into_place(&downloaded, &destination) {
        emit(out, format_args!("{fail} Error processing {id}: {error}"))?;
        diagnostics.record(error.to_string());
        return Ok(false);
    }

    emit(
        out,
        format_args!(
            "{} Downloaded thumbnail for {}",
            fmt_ok_mark(use_color),
            file.base_name
        ),
    )?;
    Ok(true)
}
