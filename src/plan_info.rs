// Upgrade-plan metadata parsing.
//
// The plan's `info` field is free-form: conventionally a JSON object with
// binary download URLs per platform, but nothing guarantees that. Everything
// in this module is best-effort; malformed input degrades to `None` or to
// the input returned verbatim, never to an error.
//
// A known malformation in published release URLs repeats the version tag in
// the filename (`veranad-v0.9-dev.7-linux-arm64`) instead of the canonical
// `veranad-{platform}` pattern. `normalize_binary_url` rewrites those.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::types::{ParsedPlanInfo, UpgradePlan};

/// Release binary name for this chain.
const BINARY_NAME: &str = "veranad";

/// Platform keys tried in priority order when picking a binary URL.
const PREFERRED_PLATFORMS: &[&str] = &[
    "linux/amd64",
    "linux/arm64",
    "darwin/amd64",
    "darwin/arm64",
];

/// GitHub release download URL template:
/// `{base .../releases/download/}{tag}/{filename}`.
static RELEASE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https://github\.com/[^/]+/[^/]+/releases/download/)([^/]+)/(.+)$").unwrap()
});

/// Filename already in the canonical `veranad-{platform}` form.
static CANONICAL_FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{}-(linux|darwin)-", BINARY_NAME)).unwrap());

/// Filename with an embedded version segment before the platform part.
/// Non-greedy so the first `-linux-`/`-darwin-` boundary wins.
static EMBEDDED_VERSION_FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{}-.*?-(linux|darwin)-(.+)$", BINARY_NAME)).unwrap());

/// Version token in the release tag path segment.
static RELEASE_TAG_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/releases/download/(v[0-9.]+(?:-[a-z]+\.[0-9]+)?)").unwrap()
});

/// Version token embedded in a binary filename.
static BINARY_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i){}-(v[0-9.]+(?:-[a-z]+\.[0-9]+)?)",
        BINARY_NAME
    ))
    .unwrap()
});

/// Bare version-shaped token, the weakest match.
static VERSION_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(v[0-9.]+(?:-[a-z]+\.[0-9]+)?)").unwrap());

/// Rewrite a release download URL whose filename redundantly embeds the
/// version tag.
///
/// `.../download/v0.9-dev.7/veranad-v0.9-dev.7-linux-arm64` becomes
/// `.../download/v0.9-dev.7/veranad-linux-arm64`; the tag path segment is
/// left untouched. URLs that do not match the release template, or whose
/// filename is already canonical, are returned unchanged.
pub fn normalize_binary_url(url: &str) -> String {
    let caps = match RELEASE_URL_RE.captures(url) {
        Some(caps) => caps,
        None => return url.to_string(),
    };

    let base = &caps[1];
    let tag = &caps[2];
    let filename = &caps[3];

    if CANONICAL_FILENAME_RE.is_match(filename) {
        return url.to_string();
    }

    match EMBEDDED_VERSION_FILENAME_RE.captures(filename) {
        Some(parts) => format!("{}{}/{}-{}-{}", base, tag, BINARY_NAME, &parts[1], &parts[2]),
        None => url.to_string(),
    }
}

/// Parse the plan's free-form info field.
///
/// Returns `None` on anything that is not a JSON object. Binary URLs, when
/// present, come back normalized.
pub fn parse_plan_info(info: &str) -> Option<ParsedPlanInfo> {
    if info.is_empty() {
        return None;
    }

    let mut parsed: ParsedPlanInfo = match serde_json::from_str(info) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!("plan info is not structured JSON: {}", err);
            return None;
        }
    };

    if let Some(binaries) = parsed.binaries.as_mut() {
        for value in binaries.values_mut() {
            if let Some(url) = value.as_str() {
                *value = serde_json::Value::String(normalize_binary_url(url));
            }
        }
    }

    Some(parsed)
}

/// Derive a canonical version string for the upgrade.
///
/// Priority chain, later sources overriding earlier ones when present:
/// 1. `plan.name`
/// 2. a version token from a binary download URL
/// 3. an explicit `version` (or `binary`) field in the parsed info
/// 4. a version-shaped token from the proposal title, only when nothing
///    else contributed
pub fn extract_binary_version(plan: &UpgradePlan, proposal_title: Option<&str>) -> Option<String> {
    let mut version = non_empty(&plan.name);

    if let Some(info) = parse_plan_info(&plan.info) {
        if let Some(url) = pick_binary_url(&info) {
            if let Some(url_version) = version_from_url(&url) {
                version = Some(url_version);
            }
        }

        if let Some(explicit) = info.version.as_deref().and_then(non_empty) {
            version = Some(explicit);
        } else if let Some(explicit) = info.binary.as_deref().and_then(non_empty) {
            version = Some(explicit);
        }
    }

    if version.is_none() {
        if let Some(title) = proposal_title {
            version = VERSION_TOKEN_RE
                .captures(title)
                .map(|caps| caps[1].to_string());
        }
    }

    version
}

/// Pick the binary URL to derive a version from: preferred platforms in
/// fixed order, then the first entry in map order.
fn pick_binary_url(info: &ParsedPlanInfo) -> Option<String> {
    let binaries = info.binaries.as_ref()?;

    for platform in PREFERRED_PLATFORMS {
        if let Some(url) = binaries.get(*platform).and_then(|v| v.as_str()) {
            if !url.is_empty() {
                return Some(url.to_string());
            }
        }
    }

    binaries
        .values()
        .filter_map(|v| v.as_str())
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// Try the version patterns against a URL, strongest first.
fn version_from_url(url: &str) -> Option<String> {
    for re in [&*RELEASE_TAG_VERSION_RE, &*BINARY_VERSION_RE, &*VERSION_TOKEN_RE] {
        if let Some(caps) = re.captures(url) {
            return Some(caps[1].to_string());
        }
    }
    None
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_info(name: &str, info: &str) -> UpgradePlan {
        UpgradePlan {
            name: name.to_string(),
            info: info.to_string(),
            ..Default::default()
        }
    }

    // ============================================
    // URL normalizer
    // ============================================

    #[test]
    fn test_normalize_strips_embedded_version() {
        let url = "https://github.com/verana-labs/verana/releases/download/v0.9-dev.7/veranad-v0.9-dev.7-linux-arm64";
        assert_eq!(
            normalize_binary_url(url),
            "https://github.com/verana-labs/verana/releases/download/v0.9-dev.7/veranad-linux-arm64"
        );
    }

    #[test]
    fn test_normalize_handles_darwin() {
        let url = "https://github.com/verana-labs/verana/releases/download/v1.0.0/veranad-v1.0.0-darwin-amd64";
        assert_eq!(
            normalize_binary_url(url),
            "https://github.com/verana-labs/verana/releases/download/v1.0.0/veranad-darwin-amd64"
        );
    }

    #[test]
    fn test_normalize_leaves_canonical_url_alone() {
        let url = "https://github.com/verana-labs/verana/releases/download/v0.9-dev.7/veranad-linux-amd64";
        assert_eq!(normalize_binary_url(url), url);
    }

    #[test]
    fn test_normalize_leaves_foreign_url_alone() {
        let url = "https://example.com/downloads/veranad-v1.0.0-linux-amd64";
        assert_eq!(normalize_binary_url(url), url);

        let url = "not a url at all";
        assert_eq!(normalize_binary_url(url), url);
    }

    #[test]
    fn test_normalize_leaves_unexpected_filename_alone() {
        // Release URL, but the filename is not a veranad binary
        let url = "https://github.com/verana-labs/verana/releases/download/v1.0.0/checksums.txt";
        assert_eq!(normalize_binary_url(url), url);
    }

    // ============================================
    // parse_plan_info
    // ============================================

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_plan_info("").is_none());
        assert!(parse_plan_info("upgrade to v2, see forum post").is_none());
        assert!(parse_plan_info("{truncated").is_none());
    }

    #[test]
    fn test_parse_rejects_non_object_json() {
        assert!(parse_plan_info("42").is_none());
        assert!(parse_plan_info("\"just a string\"").is_none());
    }

    #[test]
    fn test_parse_normalizes_binary_urls() {
        let info = r#"{"binaries":{"linux/arm64":"https://github.com/verana-labs/verana/releases/download/v0.9-dev.7/veranad-v0.9-dev.7-linux-arm64"}}"#;
        let parsed = parse_plan_info(info).unwrap();
        let binaries = parsed.binaries.unwrap();
        assert_eq!(
            binaries["linux/arm64"].as_str().unwrap(),
            "https://github.com/verana-labs/verana/releases/download/v0.9-dev.7/veranad-linux-arm64"
        );
    }

    #[test]
    fn test_parse_keeps_non_string_binary_entries() {
        let info = r#"{"binaries":{"linux/amd64":{"nested":"object"}}}"#;
        let parsed = parse_plan_info(info).unwrap();
        assert!(parsed.binaries.unwrap()["linux/amd64"].is_object());
    }

    // ============================================
    // extract_binary_version
    // ============================================

    #[test]
    fn test_version_from_plan_name_alone() {
        let plan = plan_with_info("v1.2.3", "");
        assert_eq!(
            extract_binary_version(&plan, None),
            Some("v1.2.3".to_string())
        );
    }

    #[test]
    fn test_url_version_overrides_plan_name() {
        let info = r#"{"binaries":{"linux/amd64":"https://github.com/verana-labs/verana/releases/download/v2.0.0/veranad-linux-amd64"}}"#;
        let plan = plan_with_info("v1.2.3", info);
        assert_eq!(
            extract_binary_version(&plan, None),
            Some("v2.0.0".to_string())
        );
    }

    #[test]
    fn test_explicit_version_field_overrides_url() {
        let info = r#"{
            "version": "v3.1.4",
            "binaries": {"linux/amd64": "https://github.com/verana-labs/verana/releases/download/v2.0.0/veranad-linux-amd64"}
        }"#;
        let plan = plan_with_info("v1.2.3", info);
        assert_eq!(
            extract_binary_version(&plan, None),
            Some("v3.1.4".to_string())
        );
    }

    #[test]
    fn test_binary_field_used_when_version_absent() {
        let info = r#"{"binary": "v5.0.0"}"#;
        let plan = plan_with_info("", info);
        assert_eq!(
            extract_binary_version(&plan, None),
            Some("v5.0.0".to_string())
        );
    }

    #[test]
    fn test_platform_priority_order() {
        // darwin comes later in the preference list even though it sorts first
        let info = r#"{"binaries":{
            "darwin/amd64":"https://github.com/verana-labs/verana/releases/download/v9.9.9/veranad-darwin-amd64",
            "linux/amd64":"https://github.com/verana-labs/verana/releases/download/v2.0.0/veranad-linux-amd64"
        }}"#;
        let plan = plan_with_info("", info);
        assert_eq!(
            extract_binary_version(&plan, None),
            Some("v2.0.0".to_string())
        );
    }

    #[test]
    fn test_fallback_to_first_binary_entry() {
        let info = r#"{"binaries":{"windows/amd64":"https://github.com/verana-labs/verana/releases/download/v4.0.0/veranad-windows-amd64"}}"#;
        let plan = plan_with_info("", info);
        assert_eq!(
            extract_binary_version(&plan, None),
            Some("v4.0.0".to_string())
        );
    }

    #[test]
    fn test_title_scan_is_last_resort() {
        let plan = plan_with_info("", "");
        assert_eq!(
            extract_binary_version(&plan, Some("Upgrade chain to v0.9-dev.7!")),
            Some("v0.9-dev.7".to_string())
        );

        // Title must not override a real source
        let plan = plan_with_info("v1.0.0", "");
        assert_eq!(
            extract_binary_version(&plan, Some("Upgrade to v9.9.9")),
            Some("v1.0.0".to_string())
        );
    }

    #[test]
    fn test_no_source_yields_none() {
        let plan = plan_with_info("", "");
        assert_eq!(extract_binary_version(&plan, Some("no version here")), None);
        assert_eq!(extract_binary_version(&plan, None), None);
    }
}
