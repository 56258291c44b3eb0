//! Canonical repository roots for import paths.
//!
//! Well-known code hosts are resolved from the import path alone. Other
//! hosts are asked for their `go-import` meta tag, the same way the `go`
//! command discovers repositories.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use regex::Regex;
use url::Url;

/// Looks up the repository that hosts an import path.
pub trait RepoRootResolver: Send + Sync {
    /// Return the repository URL for `import_path`.
    fn repo_root(&self, import_path: &str) -> Result<String>;
}

/// A known code host and how its import paths map onto repositories.
struct HostRule {
    prefix: &'static str,
    pattern: Regex,
}

static HOST_RULES: LazyLock<Vec<HostRule>> = LazyLock::new(|| {
    let rule = |prefix: &'static str, pattern: &str| HostRule {
        prefix,
        pattern: Regex::new(pattern).expect("host rule pattern"),
    };
    vec![
        rule(
            "github.com/",
            r"^(?P<root>github\.com/[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+)(/[\p{L}0-9_.\-]+)*$",
        ),
        rule(
            "bitbucket.org/",
            r"^(?P<root>bitbucket\.org/[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+)(/[A-Za-z0-9_.\-]+)*$",
        ),
        rule(
            "launchpad.net/",
            r"^(?P<root>launchpad\.net/(([A-Za-z0-9_.\-]+)(/[A-Za-z0-9_.\-]+)?|~[A-Za-z0-9_.\-]+/(\+junk|[A-Za-z0-9_.\-]+)/[A-Za-z0-9_.\-]+))(/[A-Za-z0-9_.\-]+)*$",
        ),
        rule(
            "hub.jazz.net/git/",
            r"^(?P<root>hub\.jazz\.net/git/[a-z0-9]+/[A-Za-z0-9_.\-]+)(/[A-Za-z0-9_.\-]+)*$",
        ),
        rule(
            "git.apache.org/",
            r"^(?P<root>git\.apache\.org/[a-z0-9_.\-]+\.git)(/[A-Za-z0-9_.\-]+)*$",
        ),
        rule(
            "",
            r"^(?P<root>([a-z0-9.\-]+\.)+[a-z0-9.\-]+(:[0-9]+)?(/~?[A-Za-z0-9_.\-]+)+?\.(bzr|fossil|git|hg|svn))(/~?[A-Za-z0-9_.\-]+)*$",
        ),
    ]
});

/// Timeout for `go-import` meta tag requests.
const META_TIMEOUT: Duration = Duration::from_secs(10);

static GO_IMPORT_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name\s*=\s*["']go-import["']\s+content\s*=\s*["']([^"']+)["']"#)
        .expect("go-import pattern")
});

/// Resolve an import path against the static host rules.
pub fn static_repo_root(import_path: &str) -> Option<String> {
    for rule in HOST_RULES.iter() {
        if !import_path.starts_with(rule.prefix) {
            continue;
        }
        if let Some(caps) = rule.pattern.captures(import_path) {
            return caps.name("root").map(|m| format!("https://{}", m.as_str()));
        }
        if !rule.prefix.is_empty() {
            // A known host with a malformed path never matches anything else.
            return None;
        }
    }
    None
}

/// Pick the repository from `go-import` meta tags in an HTML page.
pub fn parse_go_import(import_path: &str, html: &str) -> Result<String> {
    let mut matches = Vec::new();
    for caps in GO_IMPORT_META.captures_iter(html) {
        let fields: Vec<&str> = caps[1].split_whitespace().collect();
        let [prefix, _vcs, repo] = fields.as_slice() else {
            continue;
        };
        let covers = import_path == *prefix
            || import_path
                .strip_prefix(*prefix)
                .is_some_and(|rest| rest.starts_with('/'));
        if covers {
            matches.push(repo.to_string());
        }
    }

    match matches.len() {
        0 => bail!("no go-import meta tag for `{}`", import_path),
        1 => Ok(matches.remove(0)),
        _ => bail!("multiple go-import meta tags match `{}`", import_path),
    }
}

/// Repository lookup by host conventions, optionally falling back to the network.
#[derive(Debug, Clone)]
pub struct VcsRepoRoots {
    remote_lookup: bool,
}

impl VcsRepoRoots {
    /// Create a resolver. With `remote_lookup` off only static rules apply.
    pub fn new(remote_lookup: bool) -> Self {
        VcsRepoRoots { remote_lookup }
    }

    fn lookup_remote(&self, import_path: &str) -> Result<String> {
        let url = go_get_url(import_path)?;
        tracing::debug!("fetching {}", url);

        // Built per call: a blocking client must not be created or dropped
        // on an async worker.
        let client = reqwest::blocking::Client::builder()
            .timeout(META_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        let body = client
            .get(url.as_str())
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .with_context(|| format!("failed to fetch {}", url))?;

        parse_go_import(import_path, &body)
    }
}

/// `https://<import-path>?go-get=1`
fn go_get_url(import_path: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("https://{}", import_path))
        .with_context(|| format!("invalid import path `{}`", import_path))?;
    url.query_pairs_mut().append_pair("go-get", "1");
    Ok(url)
}

impl RepoRootResolver for VcsRepoRoots {
    fn repo_root(&self, import_path: &str) -> Result<String> {
        let host = import_path.split('/').next().unwrap_or_default();
        if !host.contains('.') {
            bail!("import path `{}` does not begin with hostname", import_path);
        }

        if let Some(root) = static_repo_root(import_path) {
            return Ok(root);
        }

        if !self.remote_lookup {
            bail!("no static repository rule for `{}`", import_path);
        }

        self.lookup_remote(import_path)
    }
}
