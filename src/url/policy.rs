//! Admission policy for discovered links
//!
//! The policy is a plain list of rules; a URL is admitted only when every
//! rule accepts it. Rejections are silent.

use crate::config::CrawlerConfig;
use crate::ConfigError;
use url::Url;

/// A single syntactic admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionRule {
    /// The absolute URL string must start with this prefix
    InScope { prefix: String },

    /// The URL must not carry a fragment (`#...`), not even an empty one
    NoFragment,

    /// The URL path must not contain any of these infixes
    ExcludedPathSegments { segments: Vec<String> },
}

impl AdmissionRule {
    pub fn accepts(&self, url: &Url) -> bool {
        match self {
            Self::InScope { prefix } => url.as_str().starts_with(prefix.as_str()),
            Self::NoFragment => url.fragment().is_none(),
            Self::ExcludedPathSegments { segments } => {
                let path = url.path();
                !segments.iter().any(|segment| path.contains(segment.as_str()))
            }
        }
    }
}

/// The full set of rules a link has to pass to enter the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionPolicy {
    base_url: Url,
    rules: Vec<AdmissionRule>,
}

impl AdmissionPolicy {
    /// Creates a policy scoped to `base_url` with the standard rule set
    ///
    /// The scope prefix is the parsed form of the base URL, so
    /// `https://example.com` and `https://example.com/` define the same scope.
    pub fn new(base_url: Url, excluded_paths: Vec<String>) -> Self {
        let rules = vec![
            AdmissionRule::InScope {
                prefix: base_url.as_str().to_string(),
            },
            AdmissionRule::NoFragment,
            AdmissionRule::ExcludedPathSegments {
                segments: excluded_paths,
            },
        ];
        Self { base_url, rules }
    }

    /// Builds the policy from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.base_url, e))
        })?;
        Ok(Self::new(base_url, config.excluded_paths.clone()))
    }

    /// Adds an extra rule on top of the standard ones
    pub fn with_rule(mut self, rule: AdmissionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The crawl's starting point
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn rules(&self) -> &[AdmissionRule] {
        &self.rules
    }

    /// Returns true if every rule accepts the URL
    pub fn admits(&self, url: &Url) -> bool {
        self.rules.iter().all(|rule| rule.accepts(url))
    }

    /// Same as [`admits`](Self::admits) for an unparsed URL; unparseable URLs are rejected
    pub fn admits_str(&self, url: &str) -> bool {
        Url::parse(url).map(|u| self.admits(&u)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AdmissionPolicy {
        AdmissionPolicy::new(
            Url::parse("https://example.com/docs").unwrap(),
            vec!["/de/".to_string(), "/zh-hant/".to_string()],
        )
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_accepts_in_scope() {
        assert!(policy().admits(&url("https://example.com/docs/x")));
        assert!(policy().admits(&url("https://example.com/docs")));
    }

    #[test]
    fn test_rejects_fragment() {
        assert!(!policy().admits(&url("https://example.com/docs/x#frag")));
        assert!(!policy().admits(&url("https://example.com/docs/x#")));
    }

    #[test]
    fn test_rejects_out_of_scope() {
        assert!(!policy().admits(&url("https://other.com/x")));
        assert!(!policy().admits(&url("https://example.com/blog/x")));
        assert!(!policy().admits(&url("http://example.com/docs/x")));
    }

    #[test]
    fn test_rejects_excluded_locale() {
        assert!(!policy().admits(&url("https://example.com/docs/de/x")));
        assert!(!policy().admits(&url("https://example.com/docs/zh-hant/")));
        assert!(policy().admits(&url("https://example.com/docs/design/x")));
    }

    #[test]
    fn test_locale_rule_only_checks_path() {
        let rule = AdmissionRule::ExcludedPathSegments {
            segments: vec!["/de/".to_string()],
        };
        assert!(rule.accepts(&url("https://example.com/docs/x?lang=/de/")));
    }

    #[test]
    fn test_bare_host_base() {
        let policy = AdmissionPolicy::new(url("https://example.com"), vec![]);
        assert_eq!(policy.base_url().as_str(), "https://example.com/");
        assert!(policy.admits(&url("https://example.com/")));
        assert!(policy.admits(&url("https://example.com/tutorial/")));
    }

    #[test]
    fn test_extra_rule() {
        let policy = policy().with_rule(AdmissionRule::ExcludedPathSegments {
            segments: vec!["/release-notes/".to_string()],
        });
        assert_eq!(policy.rules().len(), 4);
        assert!(!policy.admits(&url("https://example.com/docs/release-notes/")));
    }

    #[test]
    fn test_admits_str() {
        assert!(policy().admits_str("https://example.com/docs/x"));
        assert!(!policy().admits_str("not a url"));
    }

    #[test]
    fn test_from_config() {
        let mut config = CrawlerConfig::default();
        config.base_url = "https://example.com/docs".to_string();
        let policy = AdmissionPolicy::from_config(&config).unwrap();
        assert!(!policy.admits(&url("https://example.com/docs/ja/x")));

        config.base_url = "nope".to_string();
        assert!(AdmissionPolicy::from_config(&config).is_err());
    }
}
