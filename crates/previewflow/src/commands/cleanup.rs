use colored::Colorize;
use previewflow_compose::remove_preview_stack;
use previewflow_config::PreviewPaths;
use std::path::Path;

pub fn handle(app_path: &Path, pr_number: u64) -> anyhow::Result<()> {
    let paths = PreviewPaths::new(app_path, pr_number)?;

    if remove_preview_stack(&paths)? {
        println!(
            "{}",
            format!("✓ Removed temp stack at {}", paths.temp_path.display()).green()
        );
    } else {
        println!(
            "Temp stack {} does not exist, nothing to clean up",
            paths.temp_path.display()
        );
    }
    Ok(())
}
