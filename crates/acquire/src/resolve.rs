//! Specifier resolution
//!
//! Turns a raw specifier into a [`ResolvedAddress`]:
//!
//! - `/abs/thing` and `https://host/x` are already absolute and only get
//!   extension normalization.
//! - `ns/sub/path` maps to `<root>/ns/sub/path`, or to `<ns.root>/sub/path`
//!   when the namespace is configured.
//! - `ns` and `ns/` map to the namespace's index file.
//!
//! An address whose final component has no extension gets the script
//! extension appended.

use crate::address::{file_extension, split_suffix, ResolvedAddress};
use crate::config::LoaderConfig;
use crate::error::ResolveError;

/// Resolves specifiers against a loader configuration
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    config: &'a LoaderConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a LoaderConfig) -> Self {
        Self { config }
    }

    /// Resolve a specifier to its normalized address
    pub fn resolve(&self, specifier: &str) -> Result<ResolvedAddress, ResolveError> {
        validate(specifier)?;

        let (path, suffix) = split_suffix(specifier);
        if path.is_empty() {
            return Err(ResolveError::Empty);
        }

        if is_absolute(path) {
            if path.ends_with('/') {
                return Err(ResolveError::MissingFileName(specifier.to_string()));
            }
            return Ok(self.finish(path.to_string(), suffix));
        }

        if path.contains("//") {
            return Err(ResolveError::EmptySegment(specifier.to_string()));
        }
        let (namespace, sub_path) = path.split_once('/').unwrap_or((path, ""));

        let ns = self.config.namespace(namespace);
        let root = match ns.and_then(|ns| ns.root.as_deref()) {
            Some(root) => root.trim_end_matches('/').to_string(),
            None => format!("{}/{}", self.config.root.trim_end_matches('/'), namespace),
        };
        let index = ns
            .and_then(|ns| ns.index.as_deref())
            .unwrap_or(&self.config.index);

        let mut sub_path = if sub_path.is_empty() {
            index.to_string()
        } else if sub_path.ends_with('/') {
            format!("{}{}", sub_path, index.trim_start_matches('/'))
        } else {
            sub_path.to_string()
        };
        if !sub_path.starts_with('/') {
            sub_path.insert(0, '/');
        }

        Ok(self.finish(root + &sub_path, suffix))
    }

    /// Append the script extension when the final component lacks one
    fn finish(&self, mut path: String, suffix: &str) -> ResolvedAddress {
        if file_extension(&path).is_none() {
            path.push('.');
            path.push_str(&self.config.script_extension);
        }
        path.push_str(suffix);
        ResolvedAddress::verbatim(path)
    }
}

/// Resolve `specifier` against `config`
pub fn resolve(specifier: &str, config: &LoaderConfig) -> Result<ResolvedAddress, ResolveError> {
    PathResolver::new(config).resolve(specifier)
}

/// Whether a specifier is already an absolute address
pub fn is_absolute(specifier: &str) -> bool {
    specifier.starts_with('/') || specifier.contains("://")
}

fn validate(specifier: &str) -> Result<(), ResolveError> {
    if specifier.is_empty() {
        return Err(ResolveError::Empty);
    }
    if specifier
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ResolveError::Whitespace(specifier.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamespaceConfig;
    use rstest::rstest;

    fn pkg_config() -> LoaderConfig {
        let mut config = LoaderConfig::default();
        config.configure([("pkg", NamespaceConfig::new("/vendor/pkg", "/main.js"))]);
        config
    }

    #[rstest]
    #[case("foo/bar", "/modules/foo/bar.js")]
    #[case("foo", "/modules/foo/index.js")]
    #[case("foo/", "/modules/foo/index.js")]
    #[case("foo/bar/", "/modules/foo/bar/index.js")]
    #[case("foo/data.json", "/modules/foo/data.json")]
    #[case("/abs/thing", "/abs/thing.js")]
    #[case("/abs/style.css", "/abs/style.css")]
    #[case("https://cdn.example.com/lib/x", "https://cdn.example.com/lib/x.js")]
    #[case("foo/bar?v=2", "/modules/foo/bar.js?v=2")]
    #[case("/abs/thing#frag", "/abs/thing.js#frag")]
    fn test_resolve_defaults(#[case] specifier: &str, #[case] expected: &str) {
        let config = LoaderConfig::default();
        assert_eq!(resolve(specifier, &config).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("pkg/x", "/vendor/pkg/x.js")]
    #[case("pkg", "/vendor/pkg/main.js")]
    #[case("pkg/", "/vendor/pkg/main.js")]
    #[case("other/x", "/modules/other/x.js")]
    fn test_resolve_configured_namespace(#[case] specifier: &str, #[case] expected: &str) {
        let config = pkg_config();
        assert_eq!(resolve(specifier, &config).unwrap().as_str(), expected);
    }

    #[test]
    fn test_namespace_with_index_only_keeps_default_root() {
        let mut config = LoaderConfig::default();
        config.configure([(
            "ui",
            NamespaceConfig {
                root: None,
                index: Some("entry".to_string()),
            },
        )]);

        assert_eq!(resolve("ui", &config).unwrap().as_str(), "/modules/ui/entry.js");
        assert_eq!(resolve("ui/x", &config).unwrap().as_str(), "/modules/ui/x.js");
    }

    #[test]
    fn test_custom_script_extension() {
        let config = LoaderConfig {
            script_extension: "mjs".to_string(),
            ..LoaderConfig::default()
        };
        assert_eq!(resolve("foo/bar", &config).unwrap().as_str(), "/modules/foo/bar.mjs");
    }

    #[test]
    fn test_trailing_root_slash_is_trimmed() {
        let config = LoaderConfig {
            root: "/modules/".to_string(),
            ..LoaderConfig::default()
        };
        assert_eq!(resolve("foo/bar", &config).unwrap().as_str(), "/modules/foo/bar.js");
    }

    #[test]
    fn test_same_resource_from_different_specifiers() {
        let config = LoaderConfig::default();
        let a = resolve("foo", &config).unwrap();
        let b = resolve("/modules/foo/index", &config).unwrap();
        let c = resolve("foo/index.js", &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[rstest]
    #[case("", ResolveError::Empty)]
    #[case("?v=1", ResolveError::Empty)]
    #[case("foo bar", ResolveError::Whitespace("foo bar".to_string()))]
    #[case("/abs/", ResolveError::MissingFileName("/abs/".to_string()))]
    #[case("/", ResolveError::MissingFileName("/".to_string()))]
    #[case("foo//bar", ResolveError::EmptySegment("foo//bar".to_string()))]
    fn test_malformed_specifiers(#[case] specifier: &str, #[case] expected: ResolveError) {
        let config = LoaderConfig::default();
        assert_eq!(resolve(specifier, &config), Err(expected));
    }
}
