use colored::Colorize;
use previewflow_compose::{PreviewRequest, SecretsOverride, create_preview_stack};
use previewflow_config::StepOutput;

pub fn handle(request: &PreviewRequest, output: &StepOutput) -> anyhow::Result<()> {
    println!("{}", "一時スタックを作成中...".blue());
    println!("  アプリ: {}", request.paths.app_path.display().to_string().cyan());
    println!("  タグ: {}", request.tag.cyan());

    let stack = create_preview_stack(request)?;

    match &stack.secrets {
        SecretsOverride::NotRequested => {}
        SecretsOverride::Missing(path) => {
            println!(
                "  ℹ シークレット上書きファイルがありません（スキップ）: {}",
                path.display()
            );
        }
        SecretsOverride::Copied(path) => {
            println!("  ✓ シークレット上書きファイルをコピー: {}", path.display());
        }
    }
    if !stack.env_override_services.is_empty() {
        println!(
            "  ✓ env_file に {} を追加: {}",
            previewflow_compose::TEMP_ENV_FILE,
            stack.env_override_services.join(", ")
        );
    }
    if !stack.report.retagged_services.is_empty() {
        println!(
            "  ✓ イメージタグを更新: {}",
            stack.report.retagged_services.join(", ")
        );
    }
    if !stack.report.volume_names.is_empty() {
        println!(
            "  ✓ 名前付きボリュームに変換: {}",
            stack.report.volume_names.join(", ")
        );
    }

    let url = stack.url();
    let temp_path = stack.temp_path.display().to_string();

    println!();
    println!("{}", format!("✓ Created temp stack at {}", temp_path).green().bold());
    println!("URL: {}", url);

    let manifest_name = stack
        .manifest_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("--- {} ---", manifest_name);
    println!("{}", stack.manifest);

    output.append(&[("url", url.as_str()), ("temp-path", temp_path.as_str())])?;
    Ok(())
}
