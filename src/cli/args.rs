//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::application::services::EmployeeQuery;
use crate::domain::SearchStrategy;

/// Query and edit an organization tree stored as JSON
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (overrides the global config)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Search strategy: recursive, stack, worklist, continuation, trampoline
    #[arg(short, long, global = true)]
    pub strategy: Option<SearchStrategy>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that all employee names are unique
    Validate {
        /// Org document (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show hierarchy as tree
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Summarize headcount, salaries and departments
    Report {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Find the first employee matching a field
    Find {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show the highest paid employee
    HighestPaid {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the lowest paid employee
    LowestPaid {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List departments
    Departments {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Count employees in a department
    Headcount {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        department: String,
    },

    /// Show salary spend per department
    Spend {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only print the department with the highest spend
        #[arg(long, conflicts_with = "lowest")]
        highest: bool,
        /// Only print the department with the lowest spend
        #[arg(long)]
        lowest: bool,
    },

    /// Add an employee, print the new tree as JSON
    Add {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Employee as JSON, or @file
        employee: String,
        /// Manager name; without it the employee becomes the new root
        #[arg(short, long)]
        manager: Option<String>,
    },

    /// Remove an employee, print the new tree as JSON
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        name: String,
    },

    /// Replace an employee, print the new tree as JSON
    Replace {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        name: String,
        /// Replacement as JSON, or @file
        employee: String,
    },

    /// Show the chain of command down to an employee
    Chain {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        name: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Exactly one field to match on.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct QueryArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub salary: Option<f64>,
}

impl QueryArgs {
    pub fn to_query(&self) -> Option<EmployeeQuery> {
        if let Some(name) = &self.name {
            return Some(EmployeeQuery::Name(name.clone()));
        }
        if let Some(title) = &self.title {
            return Some(EmployeeQuery::Title(title.clone()));
        }
        if let Some(department) = &self.department {
            return Some(EmployeeQuery::Department(department.clone()));
        }
        self.salary.map(EmployeeQuery::Salary)
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show global config file location
    Path,
}
