//! Line-oriented parsing of `p4` text output.
//!
//! Every assumption about the shape of p4's output lives here.

use super::P4Output;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Messages p4 prints when a query legitimately matches nothing.
const EMPTY_RESULT_MARKERS: &[&str] = &[
    "no such file(s)",
    "file(s) not on client",
    "file(s) not opened on this client",
];

/// Field prefix of tagged `fstat` output.
const CLIENT_FILE_TAG: &str = "... clientFile ";

/// `//depot/path#rev - /local/path`
static HAVE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+#(?:\d+|none) - (.+)$").expect("valid have-line regex"));

/// Fields of interest from `p4 info`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InfoRecord {
    /// `Client root:` as reported, if the client is known.
    pub client_root: Option<String>,
    /// Release year from `Server version:` (e.g. 2012 for `2012.2`).
    pub server_year: Option<u32>,
    /// p4 printed `Client unknown.`
    pub client_unknown: bool,
}

/// True when the output says the query matched no files.
pub fn is_empty_result(output: &P4Output) -> bool {
    [&output.stderr, &output.stdout].iter().any(|text| {
        let text = text.to_lowercase();
        EMPTY_RESULT_MARKERS.iter().any(|marker| text.contains(marker))
    })
}

/// Parse `p4 info`.
pub fn parse_info(stdout: &str) -> InfoRecord {
    let mut record = InfoRecord::default();

    for line in stdout.lines() {
        let line = line.trim();
        if line.eq_ignore_ascii_case("client unknown.") {
            record.client_unknown = true;
        } else if let Some(root) = strip_prefix_ignore_case(line, "client root:") {
            let root = root.trim();
            if !root.is_empty() && !root.eq_ignore_ascii_case("*unknown*") {
                record.client_root = Some(root.to_string());
            }
        } else if let Some(version) = strip_prefix_ignore_case(line, "server version:") {
            record.server_year = parse_server_year(version.trim());
        }
    }

    record
}

/// Year from a version string like `P4D/LINUX26X86_64/2012.2/536738 (2012/10/16)`.
pub fn parse_server_year(version: &str) -> Option<u32> {
    version
        .split('/')
        .nth(2)?
        .split('.')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Local paths from `p4 fstat -T clientFile` output.
pub fn parse_fstat_client_files(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .filter_map(|line| line.trim_end().strip_prefix(CLIENT_FILE_TAG))
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Local paths from `p4 have` output.
pub fn parse_have(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .filter_map(|line| HAVE_LINE.captures(line.trim_end()))
        .filter_map(|caps| caps.get(1))
        .map(|m| PathBuf::from(m.as_str().trim()))
        .collect()
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}
