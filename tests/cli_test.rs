//! End-to-end tests through the command dispatcher

use std::path::PathBuf;

use clap::Parser;
use rstest::rstest;

use orgtree::cli::args::Cli;
use orgtree::cli::commands::execute_command;
use orgtree::exitcode;
use orgtree::util::testing;

fn resource(file: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources")
        .join(file)
        .display()
        .to_string()
}

fn run(args: &[&str]) -> Result<(), i32> {
    testing::init_test_setup();
    let mut argv = vec!["orgtree"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("arguments parse");
    execute_command(&cli).map_err(|e| e.exit_code())
}

#[rstest]
#[case(vec!["validate"])]
#[case(vec!["show"])]
#[case(vec!["report"])]
#[case(vec!["find", "--department", "Sales"])]
#[case(vec!["highest-paid"])]
#[case(vec!["lowest-paid"])]
#[case(vec!["departments"])]
#[case(vec!["headcount", "IT"])]
#[case(vec!["spend", "--highest"])]
#[case(vec!["remove", "Josh Anderson"])]
#[case(vec!["chain", "Lucy Grant"])]
fn given_valid_document_when_running_command_then_succeeds(#[case] args: Vec<&str>) {
    let file = resource("valid_structure.json");
    let mut argv = vec![args[0], file.as_str()];
    argv.extend_from_slice(&args[1..]);

    assert_eq!(run(&argv), Ok(()));
}

#[rstest]
fn given_inline_employee_when_adding_then_succeeds() {
    let file = resource("valid_structure.json");
    let employee = r#"{"name": "Clive Mitchel", "title": "Apprentice", "department": "IT", "salary": 10000}"#;

    let result = run(&["add", file.as_str(), employee, "--manager", "Martin Shawshank"]);

    assert_eq!(result, Ok(()));
}

#[rstest]
#[case(vec!["validate", "invalid_structure.json"], exitcode::DATAERR)]
#[case(vec!["remove", "valid_structure.json", "Mike Love"], exitcode::DATAERR)]
#[case(vec!["chain", "valid_structure.json", "Nobody"], exitcode::DATAERR)]
#[case(vec!["report", "missing.json"], exitcode::NOINPUT)]
fn given_bad_input_when_running_command_then_exit_code_matches(
    #[case] args: Vec<&str>,
    #[case] expected: i32,
) {
    let file = resource(args[1]);
    let mut argv = vec![args[0], file.as_str()];
    argv.extend_from_slice(&args[2..]);

    assert_eq!(run(&argv), Err(expected));
}

#[test]
fn given_missing_config_file_when_running_then_config_exit_code() {
    let file = resource("valid_structure.json");
    let result = run(&["-C", "/nonexistent/orgtree.toml", "validate", file.as_str()]);
    assert_eq!(result, Err(exitcode::CONFIG));
}
