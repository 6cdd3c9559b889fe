//! Engine value objects

use serde::{Deserialize, Serialize};

/// Programming language of an analyzed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::JavaScript => write!(f, "javascript"),
            Language::TypeScript => write!(f, "typescript"),
        }
    }
}

/// Finding severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Numeric rank for ordering, higher is more severe.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
            Severity::Info => 0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Bounded confidence score in `[0, 1]`.
///
/// Constructed through [`Confidence::new`], which clamps; scoring
/// adjustments multiply through [`Confidence::scale`] so the product
/// can never leave the unit interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f32);

impl Confidence {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Multiply by a factor, clamping the result back into `[0, 1]`.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.0 * factor)
    }
}

/// Vulnerability class attached to catalog entries and findings.
///
/// Serialized in the wire-facing `SCREAMING_SNAKE_CASE` form
/// (`SQL_INJECTION`, `COMMAND_INJECTION`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VulnerabilityClass {
    /// SQL Injection (CWE-89)
    SqlInjection,
    /// OS Command Injection (CWE-78)
    CommandInjection,
    /// Code Injection / Eval Injection (CWE-94)
    CodeInjection,
    /// Cross-Site Scripting (CWE-79)
    Xss,
    /// Path Traversal (CWE-22)
    PathTraversal,
    /// Server-Side Request Forgery (CWE-918)
    Ssrf,
    /// Open Redirect (CWE-601)
    OpenRedirect,
    /// Deserialization of Untrusted Data (CWE-502)
    Deserialization,
    /// Template Injection (CWE-1336)
    TemplateInjection,
    /// LDAP Injection (CWE-90)
    LdapInjection,
}

impl VulnerabilityClass {
    /// CWE identifier for compliance mapping.
    pub fn cwe_id(&self) -> &'static str {
        match self {
            VulnerabilityClass::SqlInjection => "CWE-89",
            VulnerabilityClass::CommandInjection => "CWE-78",
            VulnerabilityClass::CodeInjection => "CWE-94",
            VulnerabilityClass::Xss => "CWE-79",
            VulnerabilityClass::PathTraversal => "CWE-22",
            VulnerabilityClass::Ssrf => "CWE-918",
            VulnerabilityClass::OpenRedirect => "CWE-601",
            VulnerabilityClass::Deserialization => "CWE-502",
            VulnerabilityClass::TemplateInjection => "CWE-1336",
            VulnerabilityClass::LdapInjection => "CWE-90",
        }
    }

    /// OWASP Top 10 (2021) category.
    pub fn owasp_category(&self) -> &'static str {
        match self {
            VulnerabilityClass::SqlInjection
            | VulnerabilityClass::CommandInjection
            | VulnerabilityClass::CodeInjection
            | VulnerabilityClass::Xss
            | VulnerabilityClass::TemplateInjection
            | VulnerabilityClass::LdapInjection => "A03:2021 - Injection",
            VulnerabilityClass::PathTraversal | VulnerabilityClass::OpenRedirect => {
                "A01:2021 - Broken Access Control"
            }
            VulnerabilityClass::Ssrf => "A10:2021 - Server-Side Request Forgery",
            VulnerabilityClass::Deserialization => "A08:2021 - Software and Data Integrity Failures",
        }
    }

    /// Stable kebab-case slug used in finding identifiers.
    pub fn slug(&self) -> &'static str {
        match self {
            VulnerabilityClass::SqlInjection => "sql-injection",
            VulnerabilityClass::CommandInjection => "command-injection",
            VulnerabilityClass::CodeInjection => "code-injection",
            VulnerabilityClass::Xss => "xss",
            VulnerabilityClass::PathTraversal => "path-traversal",
            VulnerabilityClass::Ssrf => "ssrf",
            VulnerabilityClass::OpenRedirect => "open-redirect",
            VulnerabilityClass::Deserialization => "unsafe-deserialization",
            VulnerabilityClass::TemplateInjection => "template-injection",
            VulnerabilityClass::LdapInjection => "ldap-injection",
        }
    }
}

impl std::fmt::Display for VulnerabilityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(Confidence::new(1.5).value(), 1.0);
        assert_eq!(Confidence::new(-0.2).value(), 0.0);
        assert_eq!(Confidence::new(0.85).value(), 0.85);
    }

    #[test]
    fn confidence_scale_stays_bounded() {
        let c = Confidence::new(0.9).scale(0.25).scale(0.9);
        assert!(c.value() > 0.0 && c.value() < 1.0);
        assert_eq!(Confidence::new(0.5).scale(4.0).value(), 1.0);
    }

    #[test]
    fn severity_rank_orders_critical_first() {
        assert!(Severity::Critical.rank() > Severity::High.rank());
        assert!(Severity::High.rank() > Severity::Medium.rank());
        assert!(Severity::Low.rank() > Severity::Info.rank());
    }

    #[test]
    fn language_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_filename("a/b/app.mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("rb"), None);
    }

    #[test]
    fn class_serializes_screaming_snake() {
        let json = serde_json::to_string(&VulnerabilityClass::SqlInjection).unwrap();
        assert_eq!(json, "\"SQL_INJECTION\"");
    }
}
