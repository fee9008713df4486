//! The `rollcall init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("rollcall.toml");
    if path.exists() {
        println!("rollcall.toml already exists, skipping.");
        return Ok(());
    }
    std::fs::write(path, SAMPLE_CONFIG)?;
    println!("Created rollcall.toml");

    println!("\nNext steps:");
    println!("  1. Edit rollcall.toml to point data_dir somewhere permanent");
    println!("  2. Run: rollcall student list");
    println!("  3. Run: rollcall mark-all --status present");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# rollcall configuration

# Consecutive absences that raise the absence alert.
streak_threshold = 3

# Attendance percentage at or above which a student is in good standing.
good_attendance_percent = 80

# Course used when a command is given no --course ("all" for everyone).
default_course = "all"

[store]
type = "file"
data_dir = "./rollcall-data"
"#;
