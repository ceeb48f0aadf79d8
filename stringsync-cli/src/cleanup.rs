use crate::CommandOptions;

/// Run cleanup: drop target entries the source no longer has.
pub fn run_cleanup_command(opts: &CommandOptions) -> Result<(), String> {
    let sync = opts.synchronizer()?;

    if !sync.target_path().exists() {
        println!("Target file doesn't exist: {}", opts.target);
        return Ok(());
    }

    println!("Cleaning up obsolete entries in {}", opts.target);
    let report = sync
        .cleanup()
        .map_err(|e| format!("Cleanup of '{}' failed: {}", opts.target, e))?;

    if report.removed.is_empty() {
        println!("No obsolete entries found");
        return Ok(());
    }

    for (kind, name) in &report.removed {
        println!("Removing obsolete {}: {}", kind, name);
    }
    if let Some(backup) = &report.backup {
        println!("Backup created: {}", backup.display());
    }
    println!("✅ Removed {} obsolete entries", report.removed.len());
    Ok(())
}
