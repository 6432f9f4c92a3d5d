//! OpenAPI command - Prints the API document.

use common::{AppError, AppResult};

use crate::openapi::ApiDoc;

/// Execute the openapi command
pub fn execute() -> AppResult<()> {
    let json = ApiDoc::to_pretty_json().map_err(|e| AppError::internal(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
