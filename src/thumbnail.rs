//! Video file discovery and thumbnail file bookkeeping.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extensions a thumbnail may have, in lookup order.
pub const THUMBNAIL_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Prefix for the scratch file yt-dlp writes before it is renamed.
pub const TEMP_PREFIX: &str = "temp_";

/// Bracketed video identifier, e.g. `Title [dQw4w9WgXcQ].mp4`.
static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid video id pattern"));

/// A file whose name carries a video identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Full path to the file.
    pub(crate) path: PathBuf,
    /// Identifier extracted from the file name.
    pub(crate) video_id: String,
    /// File name without its final extension.
    pub(crate) base_name: String,
}

impl VideoFile {
    /// Directory holding the file, where its thumbnail belongs.
    pub(crate) fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Extract the first bracketed identifier from a file name.
pub fn extract_video_id(file_name: &str) -> Option<&str> {
    VIDEO_ID
        .captures(file_name)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Return true when a path has one of the thumbnail extensions.
fn is_thumbnail(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            THUMBNAIL_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Return true for yt-dlp scratch and partial files.
fn is_download_leftover(path: &Path, file_name: &str) -> bool {
    file_name.starts_with(TEMP_PREFIX)
        || path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("part"))
}

/// Build a video file record when the path names a video with an identifier.
fn video_file(path: &Path) -> Option<VideoFile> {
    let file_name = path.file_name()?.to_str()?;
    if is_thumbnail(path) || is_download_leftover(path, file_name) {
        return None;
    }
    let video_id = extract_video_id(file_name)?;
    let base_name = path.file_stem()?.to_str()?;
    Some(VideoFile {
        path: path.to_path_buf(),
        video_id: video_id.to_string(),
        base_name: base_name.to_string(),
    })
}

/// Result of scanning a directory tree for video files.
#[derive(Debug, Default)]
pub struct Scan {
    /// Files carrying a video identifier, in sorted order.
    pub(crate) files: Vec<VideoFile>,
    /// Entries below the root that could not be read, with the reason.
    pub(crate) skipped: Vec<(PathBuf, String)>,
}

/// Find files carrying a video identifier, in sorted order.
///
/// Failing to read the root is an error. Unreadable entries below it are
/// skipped and reported in [`Scan::skipped`].
pub fn scan(directory: &Path, recursive: bool) -> Result<Scan> {
    let mut walker = WalkDir::new(directory).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut scan = Scan::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => {
                let path = error.path().unwrap_or(directory).to_path_buf();
                return Err(Error::DirectoryRead {
                    path,
                    source: error
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop")),
                });
            }
            Err(error) => {
                let path = error.path().unwrap_or(directory).to_path_buf();
                debug!(path = %path.display(), %error, "skipping unreadable entry");
                scan.skipped.push((path, error.to_string()));
                continue;
            }
        };
        if entry.depth() == 0 || !entry.path().is_file() {
            continue;
        }
        if let Some(file) = video_file(entry.path()) {
            scan.files.push(file);
        }
    }
    Ok(scan)
}

/// Return an existing thumbnail for `base_name` in `dir`, if any.
pub fn find_existing(dir: &Path, base_name: &str) -> Option<PathBuf> {
    THUMBNAIL_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{base_name}.{ext}")))
        .find(|candidate| candidate.exists())
}

/// Path yt-dlp is told to write to for a video.
pub fn temp_output(dir: &Path, video_id: &str) -> PathBuf {
    dir.join(format!("{TEMP_PREFIX}{video_id}"))
}

/// Locate the thumbnail yt-dlp produced for a scratch output prefix.
pub fn find_downloaded(temp_output: &Path) -> Option<PathBuf> {
    let dir = temp_output.parent()?;
    let prefix = temp_output.file_name()?.to_str()?;

    let known = THUMBNAIL_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{prefix}.{ext}")))
        .find(|candidate| candidate.is_file());
    if known.is_some() {
        return known;
    }

    let stem = format!("{prefix}.");
    let mut others: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&stem))
        })
        .filter(|path| {
            !path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("part"))
        })
        .collect();
    others.sort();
    others.into_iter().next()
}

/// Final location for a downloaded thumbnail, keeping its lowercased extension.
pub fn final_path(dir: &Path, base_name: &str, downloaded: &Path) -> PathBuf {
    match downloaded.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => dir.join(format!("{base_name}.{}", ext.to_lowercase())),
        None => dir.join(base_name),
    }
}

/// Move a downloaded thumbnail into its final location.
pub fn move_into_place(downloaded: &Path, destination: &Path) -> Result<()> {
    fs::rename(downloaded, destination).map_err(|error| Error::ThumbnailMove {
        from: downloaded.to_path_buf(),
        to: destination.to_path_buf(),
        source: error,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{
        extract_video_id, final_path, find_downloaded, find_existing, scan, temp_output,
    };
    use crate::testutil::TestFixture;

    #[test]
    fn extracts_first_bracketed_id() {
        assert_eq!(extract_video_id("Talk [abc123].mp4"), Some("abc123"));
        assert_eq!(extract_video_id("[one] and [two].mkv"), Some("one"));
        assert_eq!(extract_video_id("no id here.mp4"), None);
        assert_eq!(extract_video_id("empty [].mp4"), None);
    }

    #[test]
    fn scans_top_level_files_only_by_default() {
        let fixture = TestFixture::new()
            .with_file("b [id2].mp4", "")
            .with_file("a [id1].mkv", "")
            .with_file("plain.mp4", "")
            .with_file("nested/c [id3].mp4", "");

        let files = scan(fixture.root(), false).expect("scan").files;
        let ids: Vec<_> = files.iter().map(|file| file.video_id.as_str()).collect();
        assert_eq!(ids, ["id1", "id2"]);
        assert_eq!(files[0].base_name, "a [id1]");
        assert_eq!(files[0].dir(), fixture.root());
    }

    #[test]
    fn scans_nested_files_when_recursive() {
        let fixture = TestFixture::new()
            .with_file("a [id1].mp4", "")
            .with_file("nested/deeper/c [id3].mp4", "");

        let files = scan(fixture.root(), true).expect("scan").files;
        let ids: Vec<_> = files.iter().map(|file| file.video_id.as_str()).collect();
        assert_eq!(ids, ["id1", "id3"]);
        assert_eq!(files[1].dir(), fixture.root().join("nested/deeper"));
    }

    #[test]
    fn skips_thumbnails_and_download_leftovers() {
        let fixture = TestFixture::new()
            .with_file("a [id1].mp4", "")
            .with_file("a [id1].JPG", "")
            .with_file("temp_id1.webp", "")
            .with_file("b [id2].mp4.part", "");

        let files = scan(fixture.root(), false).expect("scan").files;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].video_id, "id1");
    }

    #[cfg(unix)]
    #[test]
    fn skips_unreadable_subdirectories() {
        use std::{
            fs::{self, Permissions},
            os::unix::fs::PermissionsExt,
        };

        let fixture = TestFixture::new()
            .with_file("a [id1].mp4", "")
            .with_file("locked/b [id2].mp4", "")
            .with_file("z [id3].mp4", "");
        let locked = fixture.root().join("locked");
        fs::set_permissions(&locked, Permissions::from_mode(0o000)).expect("lock dir");
        let readable_anyway = fs::read_dir(&locked).is_ok();

        let result = scan(fixture.root(), true);
        fs::set_permissions(&locked, Permissions::from_mode(0o755)).expect("unlock dir");
        let result = result.expect("scan");

        if readable_anyway {
            // Permission bits are not enforced for this user.
            assert_eq!(result.files.len(), 3);
            return;
        }
        let ids: Vec<_> = result.files.iter().map(|file| file.video_id.as_str()).collect();
        assert_eq!(ids, ["id1", "id3"]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].0, locked);
    }

    #[test]
    fn fails_when_root_is_unreadable() {
        let fixture = TestFixture::new();
        let error = scan(&fixture.root().join("missing"), true).expect_err("missing root");
        assert!(matches!(error, crate::error::Error::DirectoryRead { .. }));
    }

    #[test]
    fn keeps_dots_in_base_name() {
        let fixture = TestFixture::new().with_file("v1.2 demo [x.y].mp4", "");
        let files = scan(fixture.root(), false).expect("scan").files;
        assert_eq!(files[0].base_name, "v1.2 demo [x.y]");
        assert_eq!(files[0].video_id, "x.y");
    }

    #[test]
    fn finds_existing_thumbnail_in_extension_order() {
        let fixture = TestFixture::new()
            .with_file("a [id1].webp", "")
            .with_file("a [id1].png", "");

        let found = find_existing(fixture.root(), "a [id1]").expect("found");
        assert_eq!(found, fixture.root().join("a [id1].png"));
        assert!(find_existing(fixture.root(), "b [id2]").is_none());
    }

    #[test]
    fn finds_downloaded_thumbnail() {
        let fixture = TestFixture::new().with_file("temp_id1.webp", "");
        let temp = temp_output(fixture.root(), "id1");
        assert_eq!(
            find_downloaded(&temp),
            Some(fixture.root().join("temp_id1.webp"))
        );
    }

    #[test]
    fn falls_back_to_other_extensions_but_not_partials() {
        let fixture = TestFixture::new()
            .with_file("temp_id1.gif.part", "")
            .with_file("temp_id1.GIF", "");
        let temp = temp_output(fixture.root(), "id1");
        assert_eq!(
            find_downloaded(&temp),
            Some(fixture.root().join("temp_id1.GIF"))
        );

        let fixture = TestFixture::new().with_file("temp_id2.part", "");
        assert!(find_downloaded(&temp_output(fixture.root(), "id2")).is_none());
    }

    #[test]
    fn final_path_lowercases_extension() {
        let dir = Path::new("/videos");
        let path = final_path(dir, "a [id1]", Path::new("/videos/temp_id1.JPG"));
        assert_eq!(path, Path::new("/videos/a [id1].jpg"));
    }
}
