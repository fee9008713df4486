//! rollcall CLI: mark attendance and read the numbers from a terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use rollcall_core::AttendanceError;
use tracing_subscriber::filter::{Directive, LevelFilter};

mod commands;

use commands::Session;

#[derive(Parser)]
#[command(name = "rollcall", version, about = "Student attendance tracker")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding students.json and attendance.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter rollcall.toml
    Init,

    /// Manage the student roster
    Student {
        #[command(subcommand)]
        command: StudentCommand,
    },

    /// Record one student's status for a day
    Mark {
        /// Student ID
        #[arg(long)]
        id: String,

        /// present or absent
        #[arg(long)]
        status: String,

        /// Day to mark (DD/MM/YYYY, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record the same status for every student in a course
    MarkAll {
        /// present or absent
        #[arg(long)]
        status: String,

        /// Course to mark ("all" for everyone)
        #[arg(long)]
        course: Option<String>,

        /// Day to mark (DD/MM/YYYY, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the attendance sheet for a day
    Sheet {
        /// Course to show ("all" for everyone)
        #[arg(long)]
        course: Option<String>,

        /// Day to show (DD/MM/YYYY, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show headline numbers for a day
    Dashboard {
        /// Day to summarize (DD/MM/YYYY, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Per-student attendance report over all recorded days
    Report {
        /// Course to report on ("all" for everyone)
        #[arg(long)]
        course: Option<String>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StudentCommand {
    /// List students
    List {
        /// Only students in this course
        #[arg(long)]
        course: Option<String>,
    },

    /// Add a student
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        course: String,
    },

    /// Remove a student (their history is kept)
    Remove {
        #[arg(long)]
        id: String,
    },

    /// Change a student's ID, name or course
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        new_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        course: Option<String>,
    },
}

fn main() {
    let default_directive = "rollcall_core=info"
        .parse::<Directive>()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_directive),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Session::new(cli.config, cli.data_dir);

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Student { command } => match command {
            StudentCommand::List { course } => commands::student::list(&session, course),
            StudentCommand::Add { id, name, course } => {
                commands::student::add(&session, &id, &name, &course)
            }
            StudentCommand::Remove { id } => commands::student::remove(&session, &id),
            StudentCommand::Edit {
                id,
                new_id,
                name,
                course,
            } => commands::student::edit(&session, &id, new_id, name, course),
        },
        Commands::Mark { id, status, date } => commands::mark::one(&session, &id, &status, date),
        Commands::MarkAll {
            status,
            course,
            date,
        } => commands::mark::all(&session, &status, course, date),
        Commands::Sheet { course, date } => commands::sheet::execute(&session, course, date),
        Commands::Dashboard { date } => commands::dashboard::execute(&session, date),
        Commands::Report {
            course,
            format,
            output,
        } => commands::report::execute(&session, course, &format, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(exit_code(&e));
    }
}

/// 2 when the core rejected the input itself, 1 for every other failure.
fn exit_code(err: &anyhow::Error) -> i32 {
    let rejected_input = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<AttendanceError>())
        .any(AttendanceError::is_user_error);
    if rejected_input {
        2
    } else {
        1
    }
}
