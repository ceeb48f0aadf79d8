use crate::CommandOptions;

/// Run extract: write batch files for every entry the target is missing.
pub fn run_extract_command(opts: &CommandOptions) -> Result<(), String> {
    let sync = opts.synchronizer()?;
    opts.check_output_dir()?;

    println!("Extracting missing translations from {}", opts.source);
    let report = sync
        .extract()
        .map_err(|e| format!("Extraction failed: {}", e))?;

    if report.batches.is_empty() {
        println!("No missing translations found");
        return Ok(());
    }

    println!("Found {} missing translations", report.missing);
    for batch in &report.batches {
        println!(
            "Created batch file: {} ({} entries)",
            batch.path.display(),
            batch.entries
        );
    }
    println!(
        "✅ Wrote {} batch file(s) for language '{}'",
        report.batches.len(),
        sync.language_code()
    );
    Ok(())
}
