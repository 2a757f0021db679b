//! Playback URL derivation.

/// Returns the final `/`-delimited segment of a service `video_path`.
///
/// A path without `/` is returned unchanged. A trailing `/` yields an empty
/// filename, which callers treat as a malformed response.
pub fn filename_from_video_path(video_path: &str) -> &str {
    video_path.rsplit('/').next().unwrap_or(video_path)
}

/// Builds the streaming URL for `filename` under `base_url`.
pub fn playback_url(base_url: &str, filename: &str) -> String {
    format!("{}/video/{}", base_url.trim_end_matches('/'), filename)
}
