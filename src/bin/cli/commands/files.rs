use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub async fn run_upload(
    app: &mut App,
    query: &str,
    path: &Path,
    name: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let module_id = app.module_id(query)?;
    let file_name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("Path has no file name")?,
    };
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let size = bytes.len();

    let file = app
        .study
        .upload_file(&module_id, &file_name, bytes, content_type(&file_name))
        .await
        .context("Failed to upload file")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&file)?),
        OutputFormat::Plain => {
            println!("Uploaded {} ({} bytes) to {}", file.name, size, module_id);
            println!("  {}", file.url);
        }
    }
    Ok(())
}

pub async fn run_rm(app: &mut App, query: &str, name: &str, format: &OutputFormat) -> Result<()> {
    let module = app.find_module(query)?;
    let module_id = module.id.clone();
    let Some(file) = module.files.iter().find(|f| f.name == name).cloned() else {
        bail!("{} has no file named {}", module_id, name);
    };

    app.study
        .delete_file(&module_id, &file)
        .await
        .context("Failed to delete file")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "deleted": file })),
        OutputFormat::Plain => println!("Deleted {} from {}", file.name, module_id),
    }
    Ok(())
}

/// Attached files, plus stored blobs no file entry points at
pub async fn run_ls(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let module = app.find_module(query)?;
    let blobs = app.study.list_module_blobs(&module.id).await?;
    let orphans: Vec<&String> = blobs
        .iter()
        .filter(|key| !module.files.iter().any(|f| &f.path == *key))
        .collect();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "files": module.files,
                "unreferencedBlobs": orphans,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if module.files.is_empty() {
                println!("No files attached to {}.", module.id);
            }
            for file in &module.files {
                println!("{:<40} {}", file.name, file.url);
            }
            if !orphans.is_empty() {
                println!();
                println!("Stored but not attached:");
                for key in orphans {
                    println!("  {}", key);
                }
            }
        }
    }
    Ok(())
}

/// Content type from the file extension
fn content_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type("notes.PDF"), "application/pdf");
        assert_eq!(content_type("slides.jpeg"), "image/jpeg");
        assert_eq!(content_type("Makefile"), "application/octet-stream");
    }
}
