//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::OrgService;
use crate::cli::args::{Cli, Commands, ConfigCommands, QueryArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{self, Employee};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, InfraResult};
use crate::tree_traits::ToTermTree;

/// Resolve settings from config files, environment and command line.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(strategy) = cli.strategy {
        settings.strategy = strategy;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see orgtree --help".to_string(),
        ));
    };

    // completions need neither config nor documents
    if let Commands::Completion { shell } = command {
        return _completion(*shell);
    }

    let settings = load_settings(cli)?;
    if !settings.color {
        output::disable_colors();
    }
    let container = ServiceContainer::new(settings);
    let org = &container.org;
    let pretty = container.settings.pretty_json;

    match command {
        Commands::Validate { file } => _validate(org, file),
        Commands::Show { file } => _show(org, file),
        Commands::Report { file } => _report(org, file),
        Commands::Find { file, query } => _find(org, file, query),
        Commands::HighestPaid { file } => {
            let root = org.load_validated(file)?;
            output::info(domain::find_highest_paid_employee(&root));
            Ok(())
        }
        Commands::LowestPaid { file } => {
            let root = org.load_validated(file)?;
            output::info(domain::find_lowest_paid_employee(&root));
            Ok(())
        }
        Commands::Departments { file } => {
            let root = org.load_validated(file)?;
            for department in domain::get_departments(&root) {
                output::info(&department);
            }
            Ok(())
        }
        Commands::Headcount { file, department } => {
            let root = org.load_validated(file)?;
            output::info(&domain::get_department_employee_count(&root, department));
            Ok(())
        }
        Commands::Spend {
            file,
            highest,
            lowest,
        } => _spend(org, file, *highest, *lowest),
        Commands::Add {
            file,
            employee,
            manager,
        } => {
            let root = org.load_validated(file)?;
            let new_employee = org.resolve_employee(employee)?;
            let updated = org.add(&root, manager.as_deref(), new_employee)?;
            write_json(&updated, pretty)
        }
        Commands::Remove { file, name } => {
            let root = org.load_validated(file)?;
            let updated = org.remove(&root, name)?;
            write_json(&updated, pretty)
        }
        Commands::Replace {
            file,
            name,
            employee,
        } => {
            let root = org.load_validated(file)?;
            let replacement = org.resolve_employee(employee)?;
            let updated = org.replace(&root, name, replacement)?;
            write_json(&updated, pretty)
        }
        Commands::Chain { file, name } => {
            let root = org.load_validated(file)?;
            let chain = org.chain_of_command(&root, name)?;
            output::info(&chain.join(" -> "));
            Ok(())
        }
        Commands::Config { command } => _config(&container.settings, command),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(org))]
fn _validate(org: &OrgService, file: &Path) -> CliResult<()> {
    let root = org.load(file)?;
    OrgService::ensure_unique_names(&root, &file.display().to_string())?;
    output::success(&format!(
        "{}: {} employees, all names unique",
        file.display(),
        root.headcount()
    ));
    Ok(())
}

#[instrument(skip(org))]
fn _show(org: &OrgService, file: &Path) -> CliResult<()> {
    let root = org.load(file)?;
    if !domain::has_unique_names(&root) {
        output::warning("document contains duplicate names");
    }
    output::info(&root.to_term_tree());
    Ok(())
}

#[instrument(skip(org))]
fn _report(org: &OrgService, file: &Path) -> CliResult<()> {
    let root = org.load_validated(file)?;
    let report = org.report(&root);
    output::header(&format!("Organization of {}", report.root));
    output::action("Headcount", &report.headcount);
    output::action("Depth", &report.depth);
    output::action("Highest paid", &report.highest_paid);
    output::action("Lowest paid", &report.lowest_paid);
    output::action("Highest spend", &report.highest_spend_department);
    output::action("Lowest spend", &report.lowest_spend_department);
    output::header("Departments");
    for (department, count, spend) in &report.departments {
        output::detail(&format!("{}: {} employees, spend {}", department, count, spend));
    }
    Ok(())
}

#[instrument(skip(org, query))]
fn _find(org: &OrgService, file: &Path, query: &QueryArgs) -> CliResult<()> {
    let query = query
        .to_query()
        .ok_or_else(|| CliError::InvalidArgs("one of --name, --title, --department, --salary is required".into()))?;
    let root = org.load_validated(file)?;
    match org.find(&root, &query) {
        Some(employee) => {
            output::info(employee);
            Ok(())
        }
        None => {
            output::warning(&format!("no employee with {}", query));
            Ok(())
        }
    }
}

#[instrument(skip(org))]
fn _spend(org: &OrgService, file: &Path, highest: bool, lowest: bool) -> CliResult<()> {
    let root = org.load_validated(file)?;
    if highest {
        output::info(&domain::find_highest_spend_department(&root));
    } else if lowest {
        output::info(&domain::find_lowest_spend_department(&root));
    } else {
        for (department, spend) in domain::department_spend(&root) {
            output::info(&format!("{}\t{}", department, spend));
        }
    }
    Ok(())
}

fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("cannot determine config directory"),
        },
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

fn write_json(employee: &Employee, pretty: bool) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json_to(&mut out, employee, pretty)?;
    Ok(())
}

fn write_json_to<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> InfraResult<()> {
    let result = if pretty {
        serde_json::to_writer_pretty(&mut *out, value)
    } else {
        serde_json::to_writer(&mut *out, value)
    };
    result.map_err(|e| InfraError::io("write JSON", e.into()))?;
    writeln!(out).map_err(|e| InfraError::io("write JSON", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_write_json_compact() {
        let mut buf = Vec::new();
        let employee = Employee::new("a", "t", "d", 1.0);
        write_json_to(&mut buf, &employee, false).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"name\":\"a\",\"title\":\"t\",\"department\":\"d\",\"salary\":1.0,\"subordinates\":[]}\n"
        );
    }

    #[test]
    fn test_no_command_is_usage_error() {
        let cli = Cli::parse_from(["orgtree"]);
        let err = execute_command(&cli).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn test_strategy_flag_overrides_config() {
        let cli = Cli::parse_from(["orgtree", "--strategy", "trampoline", "config", "show"]);
        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.strategy, crate::domain::SearchStrategy::Trampoline);
    }
}
