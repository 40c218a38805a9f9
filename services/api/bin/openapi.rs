//! Writes the EduAccess OpenAPI document.
//!
//! Usage: `openapi [OUTPUT]`, defaulting to `openapi.json` in the working directory.

use eduaccess_api::router::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn write_document(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(path, json)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));
    write_document(&path)?;
    println!("OpenAPI document written to {}", path.display());
    Ok(())
}
