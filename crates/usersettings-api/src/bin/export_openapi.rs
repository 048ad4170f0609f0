// Export OpenAPI specification as JSON
//
// Usage: cargo run --bin export-openapi > docs/api/openapi.json
//
// This binary generates the OpenAPI spec without starting the API server.
// It's useful for CI/CD pipelines and documentation builds.

use anyhow::{Context, Result};
use usersettings_api::openapi::ApiDoc;

fn main() -> Result<()> {
    let spec = ApiDoc::to_json().context("Failed to serialize OpenAPI spec")?;
    println!("{}", spec);
    Ok(())
}
