use colored::Colorize;
use previewflow_compose::{TagUpdate, update_image_tag};
use std::path::Path;

pub fn handle(app_path: &Path, registry: &str, repo: &str, tag: &str) -> anyhow::Result<()> {
    let image = format!("{}/{}", registry.trim_end_matches('/'), repo);

    match update_image_tag(app_path, registry, repo, tag)? {
        TagUpdate::Unchanged { .. } => {
            println!(
                "{}",
                format!("No changes - image {} not found or already at {}", image, tag).yellow()
            );
        }
        TagUpdate::Updated { manifest_path } => {
            println!(
                "{}",
                format!(
                    "✓ Updated {} to tag {} in {}",
                    image,
                    tag,
                    manifest_path.display()
                )
                .green()
            );
        }
    }
    Ok(())
}
