//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tasktrack_core` linkage without the mobile shell.
//! - Print a deterministic summary of a record database when a path is given.

use std::process::ExitCode;
use tasktrack_core::db::open_db;
use tasktrack_core::{
    ProjectRepository, RecordProjectRepository, RecordUserRepository, SqliteRecordStore,
    UserRepository,
};

fn main() -> ExitCode {
    println!("tasktrack_core ping={}", tasktrack_core::ping());
    println!("tasktrack_core version={}", tasktrack_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match summarize(&db_path) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("tasktrack_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(db_path: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let store = SqliteRecordStore::try_new(&conn)?;
    let users = RecordUserRepository::new(&store);
    let projects = RecordProjectRepository::new(&store);

    let all_projects = projects.list_all_projects()?;
    let mut lines = vec![
        format!("users={}", users.list_users()?.len()),
        format!("projects={}", all_projects.len()),
    ];
    if let Some(current) = users.current_user()? {
        lines.push(format!("current_user={}", current.id));
    }
    for project in &all_projects {
        lines.push(format!(
            "project id={} status={:?} progress={}",
            project.id,
            project.status,
            project.progress()
        ));
    }
    Ok(lines)
}
