//! Integration tests for end-to-end translation.
//!
//! These tests verify that the complete pipeline works correctly from source
//! code through tokenization, parsing and C++ generation. When a C++
//! compiler is installed, the generated programs are also built and run.

use std::{path::Path, process::Command, rc::Rc};

use dtlang::{
    compiler::compiler::compile,
    errors::errors::ErrorKind,
    format_error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    toolchain::{build, write_output, BuildConfig, BuildOutcome},
    translate,
};

const COUNTER: &str = "\
def coroutine counter(i) {
    def i = 0;
    yield i;
    i = i + 1;
    yield i;
}
";

fn cxx_available() -> bool {
    Command::new("g++")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

/// Translates, builds and runs `source`, returning the process output.
/// Returns `None` when no C++ compiler is installed.
fn run_program(source: &str, out_dir: &Path) -> Option<std::process::Output> {
    if !cxx_available() {
        eprintln!("g++ not found, skipping native build");
        return None;
    }

    let code = translate(source, "test.dtl").unwrap();
    let config = BuildConfig {
        out_dir: out_dir.to_path_buf(),
        ..BuildConfig::default()
    };
    write_output(&config, &code).unwrap();

    let binary = match build(&config) {
        BuildOutcome::Built { binary } => binary,
        BuildOutcome::Failed { output, .. } => panic!("C++ build failed:\n{}\n{}", output, code),
    };

    Some(Command::new(binary).output().unwrap())
}

#[test]
fn test_pipeline_stages() {
    let source = "def main() { x = 42; print(x); }".to_string();
    let tokens = tokenize(source, Some("test.dtl".to_string())).unwrap();
    let (_, ast) = parse(tokens, Rc::new("test.dtl".to_string()));
    assert!(ast.is_ok());

    let code = compile(&ast.unwrap()).unwrap();
    assert!(code.starts_with("#include <cmath>\n#include <iostream>\n#include <stdexcept>\n"));
    assert!(code.contains("int main() {\n    auto x = 42;\n    std::cout << x << \"\\n\";\n}"));
}

#[test]
fn test_well_formed_program_has_one_entry_point() {
    let source = format!(
        "{}\nscale = 2;\ndef twice(x) {{ return x * scale; }}\ndef main() {{\n    c = create_coroutine counter(5);\n    print(twice(next c));\n}}\n",
        COUNTER
    );
    let code = translate(&source, "test.dtl").unwrap();

    assert_eq!(code.matches("int main()").count(), 1);
}

#[test]
fn test_translation_is_independent_between_runs() {
    let source = "def f() {}\ndef main() { f(); }";

    assert!(translate(source, "a.dtl").is_ok());
    assert!(translate(source, "b.dtl").is_ok());
}

#[test]
fn test_redefinition_anywhere() {
    let sources = [
        "def f() {}\ndef main() {}\ndef f() {}",
        "def coroutine g() { yield 1; }\ndef main() {}\ndef coroutine g() { yield 2; }",
        "def f() {}\ndef main() {}\ndef coroutine f() { yield 2; }",
        "x = 1;\ndef main() {}\ndef x() {}",
    ];

    for source in sources {
        let error = translate(source, "test.dtl").unwrap_err();
        assert_eq!(error.get_kind(), ErrorKind::RedefinitionError, "{}", source);
    }
}

#[test]
fn test_arity_mismatch_message() {
    let source = "def f() {}\ndef main() { f(1); }";
    let error = translate(source, "test.dtl").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::ArityMismatchError);
    assert!(error
        .to_diagnostic(source)
        .to_string()
        .contains("must have 0 arguments, but 1 are provided"));
}

#[test]
fn test_block_scoped_names_can_be_reused() {
    let source = "def main() {\n    {\n        tmp = 1;\n    }\n    tmp = 2;\n}";

    assert!(translate(source, "test.dtl").is_ok());
}

#[test]
fn test_percent_normalisation() {
    let code = translate("def main() { print(5 % 2); }", "test.dtl").unwrap();

    assert!(code.contains("(2 * 0.01)"));
}

#[test]
fn test_syntax_error_diagnostic() {
    let source = "def main() {\n    x = ;\n}";
    let error = translate(source, "test.dtl").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
    let diagnostic = error.to_diagnostic(source);
    assert_eq!((diagnostic.line, diagnostic.column), (2, 8));
}

#[test]
fn test_unrecognised_token_diagnostic() {
    let source = "def main() { x = 1 @ 2; }";
    let error = translate(source, "test.dtl").unwrap_err();

    assert_eq!(
        error.to_diagnostic(source).to_string(),
        "Error: token recognition error at: '@' [Ln 1, Col 19]"
    );
}

#[test]
fn test_format_error_points_at_the_token() {
    let source = "def main() {\n    print(y);\n}";
    let error = translate(source, "final.dtl").unwrap_err();

    let rendered = format_error(&error, source, "final.dtl");
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "Error: y is undefined [Ln 2, Col 10]");
    assert_eq!(lines[1], "-> final.dtl");
    assert_eq!(lines[3], "2 | print(y);");
    assert_eq!(lines[4], "  | ------^");
}

#[test]
fn test_coroutine_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let source = format!(
        "{}\ndef main() {{\n    c = create_coroutine counter(7);\n    print(next c);\n    print(next c);\n}}\n",
        COUNTER
    );

    if let Some(output) = run_program(&source, dir.path()) {
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "0\n1\n");
    }
}

#[test]
fn test_exhausted_coroutine_faults_at_run_time() {
    let dir = tempfile::tempdir().unwrap();
    let source = format!(
        "{}\ndef main() {{\n    c = create_coroutine counter(7);\n    next c;\n    next c;\n    next c;\n}}\n",
        COUNTER
    );

    if let Some(output) = run_program(&source, dir.path()) {
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Coroutine is over"));
    }
}

#[test]
fn test_arithmetic_at_run_time() {
    let dir = tempfile::tempdir().unwrap();
    let source = "\
def add(a, b) { return a + b; }
def main() {
    print(5 % 2);
    print(2 ^ 10);
    print(int(7.9));
    print(add(1, 2.5));
    print(\"done\");
}
";

    if let Some(output) = run_program(source, dir.path()) {
        assert!(output.status.success());
        assert_eq!(
            String::from_utf8_lossy(&output.stdout),
            "0.1\n1024\n7\n3.5\ndone\n"
        );
    }
}

#[test]
fn test_printed_comparisons_build_and_run() {
    let dir = tempfile::tempdir().unwrap();
    let source = "\
def main() {
    a = 1;
    b = 2;
    print(a < b, a == b, a && b);
    print(a + b < 4 || b == 0);
    print(\"\\xff\");
}
";

    if let Some(output) = run_program(source, dir.path()) {
        assert!(output.status.success());
        assert_eq!(output.stdout, b"101\n1\n\xff\n");
    }
}
