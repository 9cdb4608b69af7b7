use crate::error::{Error, Result};
use url::Url;

const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com"];
const SHORT_LINK_HOST: &str = "youtu.be";
const WATCH_PATH: &str = "/watch";

/// Identifier of a single video, as understood by the transcript service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video identifier from a watch page URL or a short link.
pub fn extract_video_id(input: &str) -> Result<VideoId> {
    let url = Url::parse(input.trim()).map_err(|_| Error::InvalidUrl(input.to_string()))?;

    let raw_id = match url.host_str() {
        Some(host) if WATCH_HOSTS.contains(&host) => {
            if url.path() != WATCH_PATH {
                return Err(Error::InvalidUrl(input.to_string()));
            }
            url.query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
        }
        Some(SHORT_LINK_HOST) => url.path().strip_prefix('/').map(str::to_string),
        _ => None,
    };

    match raw_id {
        Some(id) if !id.is_empty() => Ok(VideoId(id)),
        _ => Err(Error::InvalidUrl(input.to_string())),
    }
}
