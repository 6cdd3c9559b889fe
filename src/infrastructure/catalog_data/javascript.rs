//! JavaScript catalog entries

use super::entry;
use crate::domain::catalog::{CatalogEntry, CatalogKind, Matcher};
use crate::domain::value_objects::{Language, Severity, VulnerabilityClass};

use CatalogKind::{Sanitizer, Sink, Source};
use Language::JavaScript;
use Severity::{Critical, High, Medium};
use VulnerabilityClass::*;

pub fn entries() -> Vec<CatalogEntry> {
    language_entries(JavaScript, "javascript")
}

/// JavaScript and TypeScript share a surface; the TypeScript module
/// re-derives the same entries under its own language tag.
pub(crate) fn language_entries(language: Language, prefix: &str) -> Vec<CatalogEntry> {
    let id = |suffix: &str| format!("{prefix}-{suffix}");
    let mut v = Vec::new();

    // ========================================================================
    // Sources
    // ========================================================================
    v.push(entry(
        &id("req-query-get"),
        language,
        Source,
        Matcher::method("req.query", "get"),
        Xss,
        High,
        0.9,
        "Express request query parameter",
    ));
    v.push(entry(
        &id("url-search-params-get"),
        language,
        Source,
        Matcher::method("searchParams", "get"),
        Xss,
        High,
        0.85,
        "URLSearchParams value from the request URL",
    ));
    v.push(entry(
        &id("prompt"),
        language,
        Source,
        Matcher::callee("prompt"),
        Xss,
        Medium,
        0.7,
        "Browser prompt() input",
    ));
    v.push(entry(
        &id("readline-question"),
        language,
        Source,
        Matcher::method("rl", "question"),
        CommandInjection,
        Medium,
        0.6,
        "Interactive terminal input",
    ));

    // ========================================================================
    // Sinks
    // ========================================================================
    v.push(entry(
        &id("eval"),
        language,
        Sink,
        Matcher::callee("eval"),
        CodeInjection,
        Critical,
        0.95,
        "eval() executes arbitrary JavaScript",
    ));
    v.push(entry(
        &id("function-constructor"),
        language,
        Sink,
        Matcher::callee("Function"),
        CodeInjection,
        Critical,
        0.9,
        "The Function constructor compiles source text",
    ));
    v.push(entry(
        &id("child-process-exec"),
        language,
        Sink,
        Matcher::method("child_process", "exec"),
        CommandInjection,
        Critical,
        0.95,
        "child_process.exec() passes its argument to the shell",
    ));
    v.push(entry(
        &id("child-process-exec-sync"),
        language,
        Sink,
        Matcher::method("child_process", "execSync"),
        CommandInjection,
        Critical,
        0.95,
        "child_process.execSync() passes its argument to the shell",
    ));
    v.push(entry(
        &id("db-query"),
        language,
        Sink,
        Matcher::method("db", "query"),
        SqlInjection,
        Critical,
        0.9,
        "Database query with an interpolated string",
    ));
    v.push(entry(
        &id("connection-query"),
        language,
        Sink,
        Matcher::method("connection", "query"),
        SqlInjection,
        Critical,
        0.9,
        "Database query with an interpolated string",
    ));
    v.push(entry(
        &id("inner-html-set"),
        language,
        Sink,
        Matcher::callee("innerHTML"),
        Xss,
        High,
        0.85,
        "Assigning attacker markup to innerHTML",
    ));
    v.push(entry(
        &id("document-write"),
        language,
        Sink,
        Matcher::method("document", "write"),
        Xss,
        High,
        0.85,
        "document.write() injects markup into the page",
    ));
    v.push(entry(
        &id("res-send"),
        language,
        Sink,
        Matcher::method("res", "send"),
        Xss,
        Medium,
        0.6,
        "Unescaped response body in Express",
    ));
    v.push(entry(
        &id("res-redirect"),
        language,
        Sink,
        Matcher::method("res", "redirect"),
        OpenRedirect,
        Medium,
        0.7,
        "Redirect to a user-controlled target",
    ));
    v.push(entry(
        &id("fs-readfile"),
        language,
        Sink,
        Matcher::method("fs", "readFile"),
        PathTraversal,
        High,
        0.7,
        "fs.readFile() with a user-controlled path",
    ));
    v.push(entry(
        &id("fs-readfile-sync"),
        language,
        Sink,
        Matcher::method("fs", "readFileSync"),
        PathTraversal,
        High,
        0.7,
        "fs.readFileSync() with a user-controlled path",
    ));
    v.push(entry(
        &id("fetch"),
        language,
        Sink,
        Matcher::callee("fetch"),
        Ssrf,
        High,
        0.7,
        "Outbound request to a user-controlled URL",
    ));
    v.push(entry(
        &id("json-parse"),
        language,
        Sink,
        Matcher::method("JSON", "parse"),
        Deserialization,
        Medium,
        0.4,
        "Parsing untrusted JSON; risky when combined with prototype merging",
    ));

    // ========================================================================
    // Sanitizers
    // ========================================================================
    v.push(entry(
        &id("encode-uri-component"),
        language,
        Sanitizer,
        Matcher::callee("encodeURIComponent"),
        Xss,
        High,
        0.9,
        "encodeURIComponent() percent-encodes metacharacters",
    ));
    v.push(entry(
        &id("escape-html"),
        language,
        Sanitizer,
        Matcher::callee("escapeHtml"),
        Xss,
        High,
        0.85,
        "Project-conventional HTML escaping helper",
    ));
    v.push(entry(
        &id("dompurify-sanitize"),
        language,
        Sanitizer,
        Matcher::method("DOMPurify", "sanitize"),
        Xss,
        High,
        0.95,
        "DOMPurify.sanitize() strips unsafe markup",
    ));
    v.push(entry(
        &id("parse-int"),
        language,
        Sanitizer,
        Matcher::callee("parseInt"),
        SqlInjection,
        High,
        0.85,
        "parseInt() coercion rejects non-numeric input",
    ));
    v.push(entry(
        &id("escape-sql"),
        language,
        Sanitizer,
        Matcher::callee("escape_sql"),
        SqlInjection,
        High,
        0.8,
        "Project-conventional SQL escaping helper",
    ));

    v
}
