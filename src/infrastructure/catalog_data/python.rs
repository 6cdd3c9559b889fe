//! Python catalog entries
//!
//! Sources, sinks, and sanitizers for Python code.

use super::entry;
use crate::domain::catalog::{CatalogEntry, CatalogKind, Matcher};
use crate::domain::value_objects::{Language, Severity, VulnerabilityClass};

use CatalogKind::{Sanitizer, Sink, Source};
use Language::Python;
use Severity::{Critical, High, Medium};
use VulnerabilityClass::*;

pub fn entries() -> Vec<CatalogEntry> {
    let mut v = Vec::new();

    // ========================================================================
    // Sources — untrusted data entering the program
    // ========================================================================
    v.push(entry(
        "python-input",
        Python,
        Source,
        Matcher::callee("input"),
        CodeInjection,
        High,
        0.9,
        "input() reads attacker-controlled standard input",
    ));
    v.push(entry(
        "python-env-get",
        Python,
        Source,
        Matcher::method("os.environ", "get"),
        CommandInjection,
        Medium,
        0.7,
        "Environment variables may be attacker-influenced in shared environments",
    ));
    v.push(entry(
        "python-request-args-get",
        Python,
        Source,
        Matcher::method("request.args", "get"),
        Xss,
        High,
        0.9,
        "Flask request query parameter",
    ));
    v.push(entry(
        "python-request-form-get",
        Python,
        Source,
        Matcher::method("request.form", "get"),
        Xss,
        High,
        0.9,
        "Flask request form field",
    ));
    v.push(entry(
        "python-request-get-json",
        Python,
        Source,
        Matcher::method("request", "get_json"),
        Deserialization,
        High,
        0.85,
        "Flask request JSON body",
    ));
    v.push(entry(
        "python-file-read",
        Python,
        Source,
        Matcher::callee("read"),
        PathTraversal,
        Medium,
        0.5,
        "File contents are untrusted when the path is user-controlled",
    ));

    // ========================================================================
    // Sinks — dangerous operations
    // ========================================================================
    v.push(entry(
        "python-eval",
        Python,
        Sink,
        Matcher::callee("eval"),
        CodeInjection,
        Critical,
        0.95,
        "eval() executes arbitrary Python expressions",
    ));
    v.push(entry(
        "python-exec",
        Python,
        Sink,
        Matcher::callee("exec"),
        CodeInjection,
        Critical,
        0.95,
        "exec() executes arbitrary Python statements",
    ));
    v.push(entry(
        "python-db-execute",
        Python,
        Sink,
        Matcher::callee("execute"),
        SqlInjection,
        Critical,
        0.9,
        "DB-API execute() with an interpolated query string",
    ));
    v.push(entry(
        "python-db-executemany",
        Python,
        Sink,
        Matcher::callee("executemany"),
        SqlInjection,
        Critical,
        0.9,
        "DB-API executemany() with an interpolated query string",
    ));
    v.push(entry(
        "python-os-system",
        Python,
        Sink,
        Matcher::method("os", "system"),
        CommandInjection,
        Critical,
        0.95,
        "os.system() passes its argument to the shell",
    ));
    v.push(entry(
        "python-os-popen",
        Python,
        Sink,
        Matcher::method("os", "popen"),
        CommandInjection,
        Critical,
        0.9,
        "os.popen() passes its argument to the shell",
    ));
    v.push(entry(
        "python-subprocess-run",
        Python,
        Sink,
        Matcher::method("subprocess", "run"),
        CommandInjection,
        High,
        0.75,
        "subprocess.run() with a string command; dangerous with shell=True",
    ));
    v.push(entry(
        "python-subprocess-popen",
        Python,
        Sink,
        Matcher::method("subprocess", "Popen"),
        CommandInjection,
        High,
        0.75,
        "subprocess.Popen() with a string command",
    ));
    v.push(entry(
        "python-subprocess-call",
        Python,
        Sink,
        Matcher::method("subprocess", "call"),
        CommandInjection,
        High,
        0.75,
        "subprocess.call() with a string command",
    ));
    v.push(entry(
        "python-pickle-loads",
        Python,
        Sink,
        Matcher::method("pickle", "loads"),
        Deserialization,
        Critical,
        0.9,
        "pickle.loads() deserializes attacker-controlled bytes",
    ));
    v.push(entry(
        "python-yaml-load",
        Python,
        Sink,
        Matcher::method("yaml", "load"),
        Deserialization,
        High,
        0.8,
        "yaml.load() without SafeLoader constructs arbitrary objects",
    ));
    v.push(entry(
        "python-open",
        Python,
        Sink,
        Matcher::callee("open"),
        PathTraversal,
        High,
        0.7,
        "open() with a user-controlled path",
    ));
    v.push(entry(
        "python-requests-get",
        Python,
        Sink,
        Matcher::method("requests", "get"),
        Ssrf,
        High,
        0.75,
        "Outbound request to a user-controlled URL",
    ));
    v.push(entry(
        "python-requests-post",
        Python,
        Sink,
        Matcher::method("requests", "post"),
        Ssrf,
        High,
        0.75,
        "Outbound request to a user-controlled URL",
    ));
    v.push(entry(
        "python-flask-redirect",
        Python,
        Sink,
        Matcher::callee("redirect"),
        OpenRedirect,
        Medium,
        0.65,
        "redirect() to a user-controlled target",
    ));
    v.push(entry(
        "python-render-template-string",
        Python,
        Sink,
        Matcher::callee("render_template_string"),
        TemplateInjection,
        Critical,
        0.9,
        "Rendering a user-controlled Jinja2 template string",
    ));
    v.push(entry(
        "python-markup",
        Python,
        Sink,
        Matcher::callee("Markup"),
        Xss,
        High,
        0.8,
        "Markup() marks a string as safe HTML without escaping",
    ));

    // ========================================================================
    // Sanitizers — calls that neutralize taint on their result
    // ========================================================================
    v.push(entry(
        "python-html-escape",
        Python,
        Sanitizer,
        Matcher::method("html", "escape"),
        Xss,
        High,
        0.9,
        "html.escape() neutralizes HTML metacharacters",
    ));
    v.push(entry(
        "python-shlex-quote",
        Python,
        Sanitizer,
        Matcher::method("shlex", "quote"),
        CommandInjection,
        High,
        0.9,
        "shlex.quote() shell-escapes its argument",
    ));
    v.push(entry(
        "python-escape-sql",
        Python,
        Sanitizer,
        Matcher::callee("escape_sql"),
        SqlInjection,
        High,
        0.8,
        "Project-conventional SQL escaping helper",
    ));
    v.push(entry(
        "python-int",
        Python,
        Sanitizer,
        Matcher::callee("int"),
        SqlInjection,
        High,
        0.85,
        "int() coercion rejects non-numeric input",
    ));
    v.push(entry(
        "python-secure-filename",
        Python,
        Sanitizer,
        Matcher::callee("secure_filename"),
        PathTraversal,
        High,
        0.9,
        "werkzeug secure_filename() strips path separators",
    ));

    v
}
