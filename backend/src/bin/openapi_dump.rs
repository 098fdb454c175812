//! Print the OpenAPI document as JSON.

use booking_backend::doc::ApiDoc;
use std::io::Write as _;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let json = ApiDoc::openapi().to_pretty_json()?;
    writeln!(std::io::stdout().lock(), "{json}")?;
    Ok(())
}
