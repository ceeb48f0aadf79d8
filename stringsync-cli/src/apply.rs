use crate::{CommandOptions, validation::validate_file_path};

/// Run apply: merge the translations of one batch file into the target.
pub fn run_apply_command(opts: &CommandOptions, batch_file: &str) -> Result<(), String> {
    let sync = opts.synchronizer()?;
    validate_file_path(batch_file)?;

    println!("Applying translations from {}", batch_file);
    let report = sync.apply(batch_file).map_err(|e| e.to_string())?;

    if report.created_target {
        println!("Created target file: {}", opts.target);
    }
    if let Some(backup) = &report.backup {
        println!("Backup created: {}", backup.display());
    }
    for (kind, name) in &report.added {
        println!("Applied {}: {}", kind, name);
    }
    for (kind, name) in &report.replaced {
        println!("Updated {}: {}", kind, name);
    }

    if report.applied() == 0 {
        println!("No translations found in batch file");
        return Ok(());
    }

    println!("✅ Applied {} translations", report.applied());
    if report.skipped > 0 {
        println!("Skipped {} entries without a translation", report.skipped);
    }
    Ok(())
}
