mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use formatter::{Params, Value};
use msgfmt::{Checker, ParseError};

const SUBCOMMANDS: &[&str] = &["format", "check", "test", "help"];

#[derive(Parser)]
#[command(name = "msgfmt", version, about = "ICU-style message formatter")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format a message template with arguments
    Format(FormatArgs),

    /// Lint message template files
    Check(CheckArgs),

    /// Run .test.msg test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct FormatArgs {
    /// The message template
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    template: Option<String>,

    /// Read the template from a file instead
    #[arg(short, long)]
    file: Option<String>,

    /// Argument as NAME=VALUE (integer, float or string); NAME:=VALUE is always a string. Repeatable.
    #[arg(short = 'a', long = "arg", value_name = "NAME=VALUE", value_parser = parse_named_arg)]
    args: Vec<(String, Value)>,

    /// Lint the template first and print any warnings
    #[arg(long)]
    check: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Template files to check
    #[arg(required = true)]
    files: Vec<String>,

    /// Treat warnings as failures
    #[arg(long)]
    deny_warnings: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.msg file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // Without a subcommand, `format` is assumed:
    // `msgfmt -a n=1 "{n}"` works like `msgfmt format -a n=1 "{n}"`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = implicit_format_position(&args) {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "format".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Format(format_args) => do_format(format_args, cli.no_color),
        Command::Check(check_args) => {
            let exit_code = do_check(&check_args, cli.no_color);
            process::exit(exit_code);
        }
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// Where an implicit `format` subcommand goes: before the first positional
/// argument, or before the first of `format`'s own options.
fn implicit_format_position(args: &[String]) -> Option<usize> {
    args.iter()
        .enumerate()
        .skip(1)
        .find(|(_, arg)| !arg.starts_with('-') || is_format_option(arg))
        .map(|(i, _)| i)
}

fn is_format_option(arg: &str) -> bool {
    ["--arg", "--file", "--check"]
        .iter()
        .any(|long| arg == *long || arg.starts_with(&format!("{}=", long)))
        || (!arg.starts_with("--") && (arg.starts_with("-a") || arg.starts_with("-f")))
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn do_format(args: FormatArgs, no_color: bool) {
    let (name, template) = match (&args.file, args.template) {
        (Some(path), _) => match std::fs::read_to_string(path) {
            // Editors add a final newline that is not part of the message.
            Ok(s) => (path.clone(), strip_final_newline(&s).to_string()),
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                process::exit(1);
            }
        },
        (None, Some(template)) => ("<template>".to_string(), template),
        (None, None) => {
            eprintln!("error: no template given");
            process::exit(2);
        }
    };

    if args.check {
        let mut files = SimpleFiles::new();
        let file_id = files.add(name, template.clone());
        let diagnostics = match Checker::new(template.clone(), file_id).check() {
            Ok(warnings) => warnings,
            Err(all) => all,
        };
        emit_diagnostics(color_choice(no_color), &files, &diagnostics);
        if diagnostics.iter().any(ParseError::is_error) {
            process::exit(1);
        }
    }

    let params: Params = args.args.into_iter().collect();
    match formatter::format(&template, &params) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn do_check(args: &CheckArgs, no_color: bool) -> i32 {
    let mut files = SimpleFiles::new();
    let mut failed = false;

    for path in &args.files {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                failed = true;
                continue;
            }
        };
        let template = strip_final_newline(&source).to_string();
        let file_id = files.add(path.clone(), template.clone());

        let (diagnostics, has_errors) = match Checker::new(template, file_id).check() {
            Ok(warnings) => (warnings, false),
            Err(all) => (all, true),
        };
        emit_diagnostics(color_choice(no_color), &files, &diagnostics);

        if has_errors || (args.deny_warnings && !diagnostics.is_empty()) {
            failed = true;
        } else if diagnostics.is_empty() {
            eprintln!("ok: {}", path);
        } else {
            eprintln!("ok: {} ({} warning(s))", path, diagnostics.len());
        }
    }

    if failed { 1 } else { 0 }
}

fn emit_diagnostics(
    color_choice: ColorChoice,
    files: &SimpleFiles<String, String>,
    diagnostics: &[ParseError],
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for diag in diagnostics {
        let diagnostic = diag.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
    }
}

fn strip_final_newline(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

/// Parse `NAME=VALUE` into a named argument.
/// Integers become Integer, finite decimals Float, everything else String.
/// `NAME:=VALUE` keeps VALUE as a String.
fn parse_named_arg(s: &str) -> Result<(String, Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let (name, value) = match name.strip_suffix(':') {
        Some(name) => (name, Value::String(raw.to_string())),
        None => (name, parse_value(raw)),
    };
    if name.is_empty() {
        return Err(format!("missing argument name in '{}'", s));
    }
    Ok((name.to_string(), value))
}

fn parse_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Integer(n);
    }
    match raw.parse::<f64>() {
        Ok(x) if x.is_finite() => Value::Float(x),
        _ => Value::String(raw.to_string()),
    }
}
