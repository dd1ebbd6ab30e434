use crate::models::Stage;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// What to do with an archive key whose stage segment is neither `alpha` nor `prod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageFallback {
    /// Publish to alpha and log a warning.
    Alpha,
    /// Fail the invocation before anything is read or written.
    Reject,
}

impl FromStr for StageFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alpha" => Ok(StageFallback::Alpha),
            "reject" | "error" => Ok(StageFallback::Reject),
            other => Err(format!("unknown stage fallback '{}'", other)),
        }
    }
}

/// Recovery for objects already uploaded when another upload of the same
/// archive failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanPolicy {
    Keep,
    Remove,
}

impl FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(OrphanPolicy::Keep),
            "remove" | "delete" => Ok(OrphanPolicy::Remove),
            other => Err(format!("unknown orphan policy '{}'", other)),
        }
    }
}

/// Lookup from (stage, bucket) to a CloudFront distribution id.
///
/// Resolution order: an entry for the exact stage and bucket, then the
/// stage-wide id, then the default id.
#[derive(Debug, Clone, Default)]
pub struct DistributionMap {
    pub default_id: Option<String>,
    pub by_stage: HashMap<Stage, String>,
    pub by_stage_and_bucket: HashMap<(Stage, String), String>,
}

impl DistributionMap {
    pub fn resolve(&self, stage: Stage, bucket: &str) -> Option<&str> {
        self.by_stage_and_bucket
            .get(&(stage, bucket.to_string()))
            .or_else(|| self.by_stage.get(&stage))
            .or(self.default_id.as_ref())
            .map(String::as_str)
    }

    /// Parses `stage@bucket=ID` items separated by commas. Malformed items are
    /// skipped with a warning.
    pub fn parse_entries(raw: &str) -> HashMap<(Stage, String), String> {
        let mut entries = HashMap::new();
        for item in raw.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            let parsed = item.split_once('=').and_then(|(target, id)| {
                let (stage, bucket) = target.split_once('@')?;
                let stage = stage.trim().parse::<Stage>().ok()?;
                Some(((stage, bucket.trim().to_string()), id.trim().to_string()))
            });
            match parsed {
                Some((target, id)) if !id.is_empty() => {
                    entries.insert(target, id);
                }
                _ => tracing::warn!("⚠️  Ignoring malformed CDN_DISTRIBUTIONS item '{}'", item),
            }
        }
        entries
    }
}

/// Configuration of the artifact publishing function
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Root folder that receives `<stage>/<entry>` (default: "src")
    pub destination_root: String,

    /// Cache-Control of every published object (default: "public, max-age=3600")
    pub cache_control: String,

    pub distributions: DistributionMap,

    /// Handling of unknown stage segments (default: alpha)
    pub stage_fallback: StageFallback,

    /// Handling of partially published archives (default: keep)
    pub orphan_policy: OrphanPolicy,

    /// Timeout applied to every object store and CDN call (default: 30 s)
    pub call_timeout: Duration,

    /// Maximum simultaneous uploads; `None` uploads every entry at once
    pub upload_concurrency: Option<usize>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            destination_root: "src".to_string(),
            cache_control: "public, max-age=3600".to_string(),
            distributions: DistributionMap::default(),
            stage_fallback: StageFallback::Alpha,
            orphan_policy: OrphanPolicy::Keep,
            call_timeout: Duration::from_secs(30),
            upload_concurrency: None,
        }
    }
}

impl PublisherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        let mut by_stage = HashMap::new();
        if let Ok(id) = env::var("CDN_DISTRIBUTION_ID_ALPHA") {
            by_stage.insert(Stage::Alpha, id);
        }
        if let Ok(id) = env::var("CDN_DISTRIBUTION_ID_PROD") {
            by_stage.insert(Stage::Production, id);
        }

        Self {
            destination_root: env::var("DESTINATION_ROOT")
                .map(|v| v.trim_matches('/').to_string())
                .unwrap_or(default.destination_root),

            cache_control: env::var("CACHE_CONTROL").unwrap_or(default.cache_control),

            distributions: DistributionMap {
                default_id: env::var("CDN_DISTRIBUTION_ID").ok(),
                by_stage,
                by_stage_and_bucket: env::var("CDN_DISTRIBUTIONS")
                    .map(|v| DistributionMap::parse_entries(&v))
                    .unwrap_or_default(),
            },

            stage_fallback: env::var("STAGE_FALLBACK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.stage_fallback),

            orphan_policy: env::var("ORPHAN_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.orphan_policy),

            call_timeout: env::var("CALL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.call_timeout),

            upload_concurrency: env::var("UPLOAD_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0),
        }
    }

    /// Destination prefix for a stage, with a trailing slash.
    pub fn destination_prefix(&self, stage: Stage) -> String {
        if self.destination_root.is_empty() {
            format!("{}/", stage)
        } else {
            format!("{}/{}/", self.destination_root, stage)
        }
    }
}

/// Configuration of the viewer-request language redirect.
///
/// Edge functions get no environment, so the deployed binaries run on
/// [`EdgeConfig::default`].
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    /// Two-letter codes served by the site; the first one is the fallback
    pub languages: Vec<String>,

    pub default_language: String,

    /// First path segments served as-is, without a language prefix
    pub passthrough_segments: Vec<String>,

    /// Send `clear-site-data` to visitors without a language cookie
    pub clear_site_data: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            default_language: "en".to_string(),
            passthrough_segments: vec![
                "asset-manifest.json".to_string(),
                "manifest.json".to_string(),
                "service-worker.js".to_string(),
                "static".to_string(),
            ],
            clear_site_data: true,
        }
    }
}

impl EdgeConfig {
    pub fn is_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l == code)
    }

    /// Static assets of the previous site generation are served without a
    /// language prefix. That includes the hashed `precache-manifest.*.js`.
    pub fn is_passthrough(&self, segment: &str) -> bool {
        self.passthrough_segments.iter().any(|s| s == segment)
            || (segment.starts_with("precache-manifest.") && segment.ends_with(".js"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PublisherConfig::default();
        assert_eq!(config.cache_control, "public, max-age=3600");
        assert_eq!(config.stage_fallback, StageFallback::Alpha);
        assert_eq!(config.orphan_policy, OrphanPolicy::Keep);
        assert_eq!(config.call_timeout, Duration::from_secs(30));
        assert_eq!(config.destination_prefix(Stage::Production), "src/prod/");
        assert_eq!(config.destination_prefix(Stage::Alpha), "src/alpha/");
    }

    #[test]
    fn test_distribution_resolution_order() {
        let mut map = DistributionMap {
            default_id: Some("EDEFAULT".to_string()),
            ..Default::default()
        };
        assert_eq!(map.resolve(Stage::Production, "site"), Some("EDEFAULT"));

        map.by_stage.insert(Stage::Production, "EPROD".to_string());
        assert_eq!(map.resolve(Stage::Production, "site"), Some("EPROD"));
        assert_eq!(map.resolve(Stage::Alpha, "site"), Some("EDEFAULT"));

        map.by_stage_and_bucket = DistributionMap::parse_entries("prod@site=ESITE, alpha@other=EOTHER");
        assert_eq!(map.resolve(Stage::Production, "site"), Some("ESITE"));
        assert_eq!(map.resolve(Stage::Production, "elsewhere"), Some("EPROD"));
        assert_eq!(map.resolve(Stage::Alpha, "other"), Some("EOTHER"));

        assert_eq!(DistributionMap::default().resolve(Stage::Alpha, "site"), None);
    }

    #[test]
    fn test_parse_entries_skips_malformed_items() {
        let entries = DistributionMap::parse_entries("prod@a=E1,broken,staging@b=E2,alpha@c=");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries.get(&(Stage::Production, "a".to_string())).map(String::as_str),
            Some("E1")
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("reject".parse::<StageFallback>().unwrap(), StageFallback::Reject);
        assert_eq!("Alpha".parse::<StageFallback>().unwrap(), StageFallback::Alpha);
        assert_eq!("remove".parse::<OrphanPolicy>().unwrap(), OrphanPolicy::Remove);
        assert!("sometimes".parse::<OrphanPolicy>().is_err());
    }

    #[test]
    fn test_edge_defaults() {
        let config = EdgeConfig::default();
        assert!(config.is_language("en"));
        assert!(!config.is_language("fr"));
        assert!(config.is_passthrough("static"));
        assert!(config.is_passthrough("precache-manifest.e95fc79a3620d8ee2a5587047d6949fd.js"));
        assert!(!config.is_passthrough("about"));
    }
}
