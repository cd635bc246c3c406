//! Target base URLs: parsing, endpoint construction and list loading
//!
//! Discovery of candidate hosts happens elsewhere; anything that can write a
//! newline-delimited list of base URLs can feed this module.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Failed to read target list {path}: {source}")]
    ListUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid target URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("No targets supplied")]
    NoTargets,
}

/// A base URL that exposes a working-copy control directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    base: Url,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let invalid = |reason: String| TargetError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let mut base = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }

        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }

    /// `<base>/<control_dir>/entries`
    pub fn entries_url(&self, control_dir: &str) -> Url {
        self.control_url(control_dir, &["entries"])
    }

    /// `<base>/<control_dir>/text-base/<file>.svn-base`
    pub fn pristine_url(&self, control_dir: &str, file: &str) -> Url {
        let mut segments: Vec<String> = vec!["text-base".to_string()];
        segments.extend(file.split('/').filter(|s| !s.is_empty()).map(str::to_string));
        if let Some(last) = segments.last_mut() {
            last.push_str(".svn-base");
        }
        let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
        self.control_url(control_dir, &refs)
    }

    fn control_url(&self, control_dir: &str, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a base, so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(control_dir).extend(tail);
        }
        url
    }

    /// Filesystem-safe directory name derived from scheme, host, port and path.
    ///
    /// Distinct targets never share a slug: `https` is prefixed as `https+`,
    /// the port follows the host as `+<port>`, segments are joined with `_` and
    /// any byte outside `[A-Za-z0-9.-]` inside a segment is written as `%XX`.
    pub fn slug(&self) -> String {
        let mut head = String::new();
        if self.base.scheme() != "http" {
            head.push_str(self.base.scheme());
            head.push('+');
        }
        head.push_str(&escape_slug_part(self.base.host_str().unwrap_or("unknown")));
        if let Some(port) = self.base.port() {
            head.push_str(&format!("+{port}"));
        }

        let mut parts = vec![head];
        if let Some(segments) = self.base.path_segments() {
            parts.extend(segments.filter(|s| !s.is_empty()).map(escape_slug_part));
        }
        parts.join("_")
    }
}

fn escape_slug_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for byte in part.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base.as_str())
    }
}

/// Parse a newline-delimited target list. Blank lines and `#` comments are ignored.
pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_list(path: &Path) -> Result<Vec<String>, TargetError> {
    let content = std::fs::read_to_string(path).map_err(|source| TargetError::ListUnreadable {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_list(&content))
}

/// Merge a single URL and an optional list file into a deduplicated,
/// first-seen-ordered list of raw target strings.
pub fn collect(url: Option<&str>, list: Option<&Path>) -> Result<Vec<String>, TargetError> {
    let mut raw = Vec::new();
    if let Some(url) = url {
        raw.push(url.trim().to_string());
    }
    if let Some(path) = list {
        raw.extend(load_list(path)?);
    }

    let mut seen = HashSet::new();
    raw.retain(|u| !u.is_empty() && seen.insert(u.clone()));

    if raw.is_empty() {
        return Err(TargetError::NoTargets);
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_entries_url() {
        let target = Target::parse("http://example.com/app").unwrap();
        assert_eq!(
            target.entries_url(".svn").as_str(),
            "http://example.com/app/.svn/entries"
        );

        let target = Target::parse("https://example.com/").unwrap();
        assert_eq!(
            target.entries_url(".svn").as_str(),
            "https://example.com/.svn/entries"
        );
    }

    #[test]
    fn test_pristine_url_nested_and_escaped() {
        let target = Target::parse("http://example.com/").unwrap();
        assert_eq!(
            target.pristine_url(".svn", "inc/db config.php").as_str(),
            "http://example.com/.svn/text-base/inc/db%20config.php.svn-base"
        );
        assert_eq!(
            target.pristine_url(".svn", "what?.txt").as_str(),
            "http://example.com/.svn/text-base/what%3F.txt.svn-base"
        );
    }

    #[test]
    fn test_query_and_fragment_dropped() {
        let target = Target::parse("http://example.com/site?x=1#top").unwrap();
        assert_eq!(target.as_str(), "http://example.com/site/");
    }

    #[test]
    fn test_rejects_non_http() {
        assert!(matches!(
            Target::parse("ftp://example.com/"),
            Err(TargetError::InvalidUrl { .. })
        ));
        assert!(Target::parse("not a url").is_err());
    }

    #[test]
    fn test_slug() {
        let target = Target::parse("http://example.com:8080/old/site/").unwrap();
        assert_eq!(target.slug(), "example.com+8080_old_site");

        let target = Target::parse("https://example.com").unwrap();
        assert_eq!(target.slug(), "https+example.com");

        let target = Target::parse("http://example.com/my_app/v%201").unwrap();
        assert_eq!(target.slug(), "example.com_my%5Fapp_v%25201");
    }

    #[test]
    fn test_slug_keeps_distinct_targets_apart() {
        let urls = [
            "http://a.test/x/y",
            "http://a.test/x_y",
            "https://a.test/x_y",
            "https://a.test/x/y",
            "http://a.test:8080/",
            "http://a.test/8080",
        ];
        let slugs: HashSet<String> = urls
            .iter()
            .map(|url| Target::parse(url).unwrap().slug())
            .collect();
        assert_eq!(slugs.len(), urls.len());
    }

    #[test]
    fn test_parse_list_skips_comments() {
        let list = "# found by dorking\nhttp://a.example/\n\n  http://b.example/  \n";
        assert_eq!(parse_list(list), vec!["http://a.example/", "http://b.example/"]);
    }

    #[test]
    fn test_collect_merges_and_dedups() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("targets.txt");
        fs::write(&path, "http://a.example/\nhttp://b.example/\nhttp://a.example/\n").unwrap();

        let targets = collect(Some("http://b.example/"), Some(&path)).unwrap();
        assert_eq!(targets, vec!["http://b.example/", "http://a.example/"]);
    }

    #[test]
    fn test_collect_empty_is_error() {
        assert!(matches!(collect(None, None), Err(TargetError::NoTargets)));
    }

    #[test]
    fn test_collect_missing_file() {
        let result = collect(None, Some(Path::new("/nonexistent/targets.txt")));
        assert!(matches!(result, Err(TargetError::ListUnreadable { .. })));
    }
}
