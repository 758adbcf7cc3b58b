use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use jobguard_engine::{decode_snapshot, Fetcher, SnapshotFetcher};
use jobguard_logging::guard_info;
use url::Url;

/// A page as the host sees it: decoded markup plus the URL it lives at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

pub fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Load `source` (saved file or http(s) URL). `url_override` replaces the
/// page URL, which matters for saved pages since classification keys on it.
pub fn load_snapshot(source: &str, url_override: Option<&str>) -> anyhow::Result<PageSnapshot> {
    if is_remote(source) {
        fetch_snapshot(source, url_override)
    } else {
        read_snapshot(Path::new(source), url_override)
    }
}

fn fetch_snapshot(source: &str, url_override: Option<&str>) -> anyhow::Result<PageSnapshot> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start fetch runtime")?;
    let output = runtime
        .block_on(SnapshotFetcher::default().fetch(source))
        .with_context(|| format!("failed to fetch {source}"))?;
    let decoded = decode_snapshot(&output.bytes, output.metadata.content_type.as_deref());
    guard_info!(
        "Fetched {} bytes from {} ({})",
        output.metadata.byte_len,
        output.metadata.final_url,
        decoded.encoding_label
    );

    Ok(PageSnapshot {
        url: url_override
            .map(str::to_string)
            .unwrap_or(output.metadata.final_url),
        html: decoded.html,
    })
}

fn read_snapshot(path: &Path, url_override: Option<&str>) -> anyhow::Result<PageSnapshot> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {path:?}"))?;
    let decoded = decode_snapshot(&bytes, None);

    let url = match url_override {
        Some(url) => url.to_string(),
        None => file_url(path)?,
    };
    guard_info!("Loaded {:?} as {} ({})", path, url, decoded.encoding_label);
    Ok(PageSnapshot {
        url,
        html: decoded.html,
    })
}

fn file_url(path: &Path) -> anyhow::Result<String> {
    let absolute = fs::canonicalize(path).with_context(|| format!("failed to resolve {path:?}"))?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| anyhow!("cannot express {absolute:?} as a URL"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn saved_page_uses_override_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posting.html");
        fs::write(&path, b"<html><body><h1>Clerk</h1></body></html>").unwrap();

        let snapshot = load_snapshot(
            path.to_str().unwrap(),
            Some("https://www.indeed.com/viewjob?jk=1"),
        )
        .unwrap();
        assert_eq!(snapshot.url, "https://www.indeed.com/viewjob?jk=1");
        assert!(snapshot.html.contains("<h1>Clerk</h1>"));
    }

    #[test]
    fn saved_page_defaults_to_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posting.html");
        fs::write(&path, b"<html></html>").unwrap();

        let snapshot = load_snapshot(path.to_str().unwrap(), None).unwrap();
        assert!(snapshot.url.starts_with("file://"), "{}", snapshot.url);
        assert!(snapshot.url.ends_with("/posting.html"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_snapshot("/definitely/not/here.html", None).is_err());
    }

    #[test]
    fn remote_sources_are_recognised() {
        assert!(is_remote("HTTPS://www.linkedin.com/jobs/view/1"));
        assert!(!is_remote("saved/linkedin.html"));
    }
}
