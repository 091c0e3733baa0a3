use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use formatter::{Params, Value};
use msgfmt::{Checker, ParseError};

const TEST_SUFFIX: &str = ".test.msg";

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based template line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Named arguments passed to the formatter.
    #[serde(default)]
    pub args: toml::Table,

    /// Expected exact output (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Expected formatting error: its Display string must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// If true, the checker must report at least one error for the template.
    #[serde(default)]
    pub expect_check_error: bool,

    /// Expected checker warnings. If present (even empty), warning count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

fn toml_arg_to_value(val: &toml::Value) -> Value {
    match val {
        toml::Value::Integer(n) => Value::Integer(*n),
        toml::Value::Float(f) => Value::Float(*f),
        toml::Value::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}

/// Split a `.test.msg` file into its TOML front matter and the template.
///
/// The single newline that ends the file is not part of the template.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- front matter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- front matter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..]; // skip \n---
    let template = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    let template = template
        .strip_suffix("\r\n")
        .or_else(|| template.strip_suffix('\n'))
        .unwrap_or(template);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, template))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(TEST_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let (description, outcome) = match evaluate_test(path) {
        Ok(description) => (description, TestOutcome::Pass),
        Err((description, reason)) => (description, TestOutcome::Fail(reason)),
    };
    TestResult {
        path: path.to_path_buf(),
        description,
        outcome,
    }
}

type Failure = (Option<String>, String);

/// Run one test file. Ok carries the description; Err adds the failure reason.
fn evaluate_test(path: &Path) -> Result<Option<String>, Failure> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| (None, format!("cannot read file: {}", e)))?;

    let (config, template) =
        parse_test_file(&content).map_err(|e| (None, format!("front matter error: {}", e)))?;
    let fail = |reason: String| (config.description.clone(), reason);

    // Lint only when the test states checker expectations.
    if config.expect_check_error || config.expect_warnings.is_some() {
        let checked = Checker::new(template.to_string(), 0).check();
        if config.expect_check_error {
            return match checked {
                Err(_) => Ok(config.description.clone()),
                Ok(_) => Err(fail("expected checker errors, but the template is clean".into())),
            };
        }
        let diagnostics = match checked {
            Ok(warnings) => warnings,
            Err(all) => {
                let msgs: Vec<String> = all
                    .iter()
                    .filter(|d| d.is_error())
                    .map(|d| d.message.clone())
                    .collect();
                return Err(fail(format!("unexpected checker error: {}", msgs.join("; "))));
            }
        };
        if let Some(expected) = &config.expect_warnings {
            if let Some(reason) = check_warnings(template, &diagnostics, expected) {
                return Err(fail(reason));
            }
        }
    }

    let params: Params = config
        .args
        .iter()
        .map(|(k, v)| (k.clone(), toml_arg_to_value(v)))
        .collect();
    let result = formatter::format(template, &params);

    let failure = match (&config.expect_error, &config.expect_output, result) {
        (Some(expected_err), _, Err(err)) => {
            let err_str = err.to_string();
            if err_str.contains(expected_err.as_str()) {
                None
            } else {
                Some(format!(
                    "expected error containing \"{}\", got: {}",
                    expected_err, err_str
                ))
            }
        }
        (Some(expected_err), _, Ok(output)) => Some(format!(
            "expected error containing \"{}\", but formatting produced: {}",
            expected_err, output
        )),
        (None, _, Err(err)) => Some(format!("unexpected formatting error: {}", err)),
        (None, Some(expected_output), Ok(output)) => {
            let actual = output.trim();
            let expected = expected_output.trim();
            if actual == expected {
                None
            } else {
                Some(format!(
                    "output mismatch\n  expected: {}\n  actual:   {}",
                    expected, actual
                ))
            }
        }
        (None, None, Ok(_)) => None,
    };

    match failure {
        Some(reason) => Err(fail(reason)),
        None => Ok(config.description.clone()),
    }
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(
    source: &str,
    diagnostics: &[ParseError],
    expected: &[ExpectedWarning],
) -> Option<String> {
    let actual: Vec<&ParseError> = diagnostics.iter().filter(|d| d.is_warning()).collect();

    if actual.len() != expected.len() {
        let actual_msgs: Vec<String> = actual.iter().map(|w| format!("  - {}", w)).collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            actual.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (warning, expected)) in actual.iter().zip(expected).enumerate() {
        if !warning.message.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, warning.message
            ));
        }
        if let Some(expected_line) = expected.line {
            let actual_line = byte_offset_to_line(source, warning.span.start);
            if actual_line != expected_line {
                return Some(format!(
                    "warning[{}]: expected on line {}, but span is on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }

    None
}

/// Discover `.test.msg` files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(TEST_SUFFIX) {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn paint(s: &str, code: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, s)
    }
}

/// Select the categories to run. Unknown requests are reported and skipped.
fn filter_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a Vec<PathBuf>> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v)).collect();
    }

    let mut filtered = BTreeMap::new();
    for req in requested {
        let req = req.trim_matches('/');
        let prefix = format!("{}/", req);
        let mut found = false;
        for (cat, files) in all {
            if cat == req || cat.starts_with(&prefix) {
                filtered.insert(cat.as_str(), files);
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all.keys()
                    .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    filtered
}

/// Run all `.test.msg` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let groups: Vec<(String, Vec<PathBuf>)> = if path.is_file() {
        // Single file mode: categories do not apply.
        vec![(String::new(), vec![path.to_path_buf()])]
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
            return 1;
        }
        let selected = filter_categories(&all, categories);
        if selected.is_empty() {
            eprintln!("no matching categories found");
            return 1;
        }
        selected
            .into_iter()
            .map(|(cat, files)| (cat.to_string(), files.clone()))
            .collect()
    };
    let show_headers = !path.is_file();

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &groups {
        if show_headers {
            let header = if cat.is_empty() { "(root)" } else { cat.as_str() };
            eprintln!();
            eprintln!("{}", paint(header, "1", no_color));
        }

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", paint("PASS", "32", no_color), result.label());
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", paint("FAIL", "31", no_color), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        eprintln!("test result: {}. {} passed, 0 failed", paint("ok", "32", no_color), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failed,
            passed + failed
        );
        1
    }
}
