//! Decomposition of a declared module source string
//!
//! Accepted shapes, each optionally prefixed by forced getters (`git::`) and
//! followed by a `//subfolder` suffix and a query string:
//! - `https://host/org/repo.git`, `ssh://user@host/org/repo.git`, `git://host/repo`
//! - `user@host:org/repo.git` (scp-like ssh)
//! - `github.com/org/repo`, `gitlab.com/org/repo`, `bitbucket.org/org/repo`
//!
//! Without a `git::` getter, an `http(s)` URL only counts as git when its path
//! ends in `.git`. Anything else is rejected as [`SourceError::NotAGitSource`].

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::source::error::SourceError;
use crate::source::reference::{Remote, RemoteKind, SourceReference};

static FORCED_GETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9]+)::(.+)$").expect("valid regex"));

static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.\-]+)@([A-Za-z0-9_.\-]+):/?([^:].*)$").expect("valid regex")
});

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(github\.com|gitlab\.com|bitbucket\.org)/([A-Za-z0-9_.\-]+)/([A-Za-z0-9_.\-]+)$")
        .expect("valid regex")
});

const GIT_GETTER: &str = "git";

/// Getters that fetch something other than a git repository
const NON_GIT_GETTERS: &[&str] = &["hg", "s3", "gcs", "http", "https", "file"];

/// Schemes that are git regardless of the path
const GIT_SCHEMES: &[&str] = &["ssh", "git", "git+ssh"];

const SUBFOLDER_MARKER: &str = "//";

/// Split a raw source string into a [`SourceReference`]
pub fn decompose(raw: &str) -> Result<SourceReference, SourceError> {
    let source = raw.trim();
    if source.is_empty() {
        return Err(SourceError::not_git(raw, "empty source"));
    }
    if source.contains("${") || source.contains("%{") {
        return Err(SourceError::not_git(raw, "interpolated source"));
    }

    let (getters, rest) = split_forced_getters(source);
    if let Some(getter) = getters
        .iter()
        .find(|g| NON_GIT_GETTERS.contains(&g.to_ascii_lowercase().as_str()))
    {
        return Err(SourceError::not_git(
            raw,
            format!("forced getter '{getter}' is not git"),
        ));
    }
    let forced_git = getters.iter().any(|g| g.eq_ignore_ascii_case(GIT_GETTER));

    let (location, query) = match rest.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (rest, None),
    };
    let (repository, subfolder) = split_subfolder(location);

    let remote = detect_remote(repository, forced_git)
        .ok_or_else(|| SourceError::not_git(raw, "not a recognizable git remote"))?;

    let parts = split_query(query.unwrap_or_default());

    Ok(SourceReference {
        getters,
        remote,
        subfolder: subfolder.map(str::to_string),
        has_query: query.is_some(),
        query: parts.pairs,
        ref_position: parts.ref_position,
        pin: parts.pin,
        bare_ref: parts.bare_ref,
    })
}

/// Pop `token::` prefixes off the front of `source`, outermost first
fn split_forced_getters(source: &str) -> (Vec<String>, &str) {
    let mut getters = Vec::new();
    let mut rest = source;

    while let Some(caps) = FORCED_GETTER.captures(rest) {
        let (Some(getter), Some(remaining)) = (caps.get(1), caps.get(2)) else {
            break;
        };
        getters.push(getter.as_str().to_string());
        rest = remaining.as_str();
    }

    (getters, rest)
}

/// Split at the first `//` after any `scheme://`
fn split_subfolder(location: &str) -> (&str, Option<&str>) {
    let search_from = location.find("://").map_or(0, |i| i + 3);

    match location[search_from..].find(SUBFOLDER_MARKER) {
        Some(pos) => {
            let split = search_from + pos;
            (
                &location[..split],
                Some(&location[split + SUBFOLDER_MARKER.len()..]),
            )
        }
        None => (location, None),
    }
}

/// Query string with the first `ref` pair lifted out
#[derive(Debug, Default)]
struct QueryParts {
    pairs: Vec<String>,
    ref_position: Option<usize>,
    pin: Option<String>,
    bare_ref: bool,
}

/// Separate the `ref` parameter from the rest of the query
///
/// Every other segment is kept verbatim, empty ones included, so that the
/// query can be written back unchanged. A repeated `ref` stays among the
/// other pairs.
fn split_query(query: &str) -> QueryParts {
    let mut parts = QueryParts::default();
    if query.is_empty() {
        return parts;
    }

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (pair, None),
        };
        if key == "ref" && parts.pin.is_none() {
            parts.ref_position = Some(parts.pairs.len());
            parts.pin = Some(value.unwrap_or_default().to_string());
            parts.bare_ref = value.is_none();
            continue;
        }
        parts.pairs.push(pair.to_string());
    }

    parts
}

fn detect_remote(repository: &str, forced_git: bool) -> Option<Remote> {
    if repository.contains("://") {
        return detect_url(repository, forced_git);
    }

    if let Some(caps) = SCP_LIKE.captures(repository) {
        let canonical = format!(
            "ssh://{}@{}/{}",
            &caps[1],
            &caps[2],
            caps[3].trim_start_matches('/')
        );
        return Some(Remote {
            kind: RemoteKind::Scp,
            text: repository.to_string(),
            canonical,
        });
    }

    if let Some(caps) = SHORTHAND.captures(repository) {
        let repo = &caps[3];
        let suffix = if repo.ends_with(".git") { "" } else { ".git" };
        return Some(Remote {
            kind: RemoteKind::Shorthand,
            text: repository.to_string(),
            canonical: format!("https://{}/{}/{repo}{suffix}", &caps[1], &caps[2]),
        });
    }

    None
}

fn detect_url(repository: &str, forced_git: bool) -> Option<Remote> {
    let url = parse_url(repository)?;
    let scheme = url.scheme();

    if scheme != "file" && url.host_str().is_none() {
        return None;
    }

    let is_git = forced_git
        || GIT_SCHEMES.contains(&scheme)
        || (matches!(scheme, "http" | "https") && url.path().ends_with(".git"));
    if !is_git {
        return None;
    }

    Some(Remote {
        kind: RemoteKind::Url,
        text: repository.to_string(),
        canonical: url.to_string(),
    })
}

/// Parse a URL, accepting `ssh://user@host:org/repo` where the "port" is a path
fn parse_url(repository: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(repository) {
        return Some(url);
    }

    let rest = repository.strip_prefix("ssh://")?;
    let (authority, path) = rest.split_once(':')?;
    if authority.contains('/') || path.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Url::parse(&format!("ssh://{authority}/{}", path.trim_start_matches('/'))).ok()
}
