//! Recover the installed distribution name from installer output
//!
//! Installer output changes between versions, so several phrasings are
//! recognized. Matchers are tried in the order of `MATCHERS`; the first one
//! that matches decides the name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::InstallerError;

/// Matcher name and pattern; capture group 1 holds the distribution name(s)
const MATCHERS: &[(&str, &str)] = &[
    // pip >= 21.3 with PEP 660 editable builds
    (
        "editable",
        r"(?m)^\s*Building editable for (\S+) \(pyproject\.toml\)",
    ),
    // older pip, setup.py or legacy builds
    (
        "wheels",
        r"(?m)^\s*Building wheels for collected packages: (.+?)\s*$",
    ),
    // uv pip install -e: `+` for a fresh install, `~` for a reinstall
    (
        "uv",
        r"(?m)^\s*[+~] ([A-Za-z0-9][A-Za-z0-9._-]*)==\S+ \(from file://",
    ),
];

static COMPILED: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    MATCHERS
        .iter()
        .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|re| (*name, re)))
        .collect()
});

/// A distribution name and the matcher that found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedDistribution {
    pub matcher: &'static str,
    pub name: String,
}

/// Names of the matchers, in the order they are tried
pub fn matcher_names() -> Vec<&'static str> {
    MATCHERS.iter().map(|(name, _)| *name).collect()
}

/// Find the distribution name in installer output
pub fn parse_distribution_name(output: &str) -> Result<MatchedDistribution, InstallerError> {
    for &(matcher, ref regex) in COMPILED.iter() {
        let Some(captured) = regex
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
        else {
            continue;
        };

        let names: Vec<&str> = captured
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        return match names.as_slice() {
            [name] => Ok(MatchedDistribution {
                matcher,
                name: (*name).to_string(),
            }),
            [] => Err(InstallerError::OutputParse(format!(
                "'{}' matcher found an empty package list",
                matcher
            ))),
            many => Err(InstallerError::OutputParse(format!(
                "installer built several packages ({}); cannot tell which one was installed",
                many.join(", ")
            ))),
        };
    }

    Err(InstallerError::OutputParse(format!(
        "no known marker in installer output (tried: {})",
        matcher_names().join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIP_EDITABLE: &str = "\
Obtaining file:///home/dev/demo-app
  Installing build dependencies: started
  Installing build dependencies: finished with status 'done'
Building wheels for collected packages: demo-app
  Building editable for demo-app (pyproject.toml): started
  Building editable for demo-app (pyproject.toml): finished with status 'done'
Successfully built demo-app
Installing collected packages: demo-app
Successfully installed demo-app-0.1.0
";

    const PIP_LEGACY: &str = "\
Obtaining file:///home/dev/legacy_pkg
Building wheels for collected packages: legacy_pkg
  Running setup.py develop for legacy_pkg
Successfully installed legacy_pkg
";

    const UV: &str = "\
Resolved 1 package in 12ms
   Built demo-app @ file:///home/dev/demo-app
Prepared 1 package in 410ms
Installed 1 package in 2ms
 + demo-app==0.1.0 (from file:///home/dev/demo-app)
";

    #[test]
    fn test_editable_marker() {
        let matched = parse_distribution_name(PIP_EDITABLE);
        assert!(matched.is_ok_and(|m| m.matcher == "editable" && m.name == "demo-app"));
    }

    #[test]
    fn test_wheels_marker() {
        let matched = parse_distribution_name(PIP_LEGACY);
        assert!(matched.is_ok_and(|m| m.matcher == "wheels" && m.name == "legacy_pkg"));
    }

    #[test]
    fn test_uv_marker() {
        let matched = parse_distribution_name(UV);
        assert!(matched.is_ok_and(|m| m.matcher == "uv" && m.name == "demo-app"));
    }

    #[test]
    fn test_uv_reinstall_marker() {
        let output = "\
Resolved 1 package in 9ms
   Built demo-app @ file:///home/dev/demo-app
Prepared 1 package in 380ms
Uninstalled 1 package in 1ms
Installed 1 package in 2ms
 ~ demo-app==0.1.0 (from file:///home/dev/demo-app)
";
        let matched = parse_distribution_name(output);
        assert!(matched.is_ok_and(|m| m.matcher == "uv" && m.name == "demo-app"));
    }

    #[test]
    fn test_uv_audit_only_has_no_name() {
        let output = "Audited 1 package in 3ms\n";
        assert!(matches!(
            parse_distribution_name(output),
            Err(InstallerError::OutputParse(_))
        ));
    }

    #[test]
    fn test_several_wheels_is_ambiguous() {
        let output = "Building wheels for collected packages: demo-app, helper\n";
        assert!(matches!(
            parse_distribution_name(output),
            Err(InstallerError::OutputParse(_))
        ));
    }

    #[test]
    fn test_no_marker() {
        let output = "Requirement already satisfied: demo-app in ./demo-app (0.1.0)\n";
        assert!(matches!(
            parse_distribution_name(output),
            Err(InstallerError::OutputParse(ref msg)) if msg.contains("editable, wheels, uv")
        ));
    }

    #[test]
    fn test_all_matchers_compile() {
        assert_eq!(COMPILED.len(), MATCHERS.len());
    }
}
