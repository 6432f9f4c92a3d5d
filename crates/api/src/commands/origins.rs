//! Origins command - Explains the CORS decision for one origin.

use common::AppResult;

use crate::cli::{OriginsAction, OriginsArgs};
use crate::config::ApiConfig;
use crate::cors::{OriginMatch, OriginPolicy};

/// Execute the origins command
pub fn execute(args: OriginsArgs, config: &ApiConfig) -> AppResult<()> {
    match args.action {
        OriginsAction::Check { origin } => {
            let policy = OriginPolicy::new(&config.cors_allowed_origins, config.debug);
            println!("{}: {}", origin, describe(policy.matches(&origin)));
        }
    }
    Ok(())
}

fn describe(matched: Option<OriginMatch>) -> String {
    match matched {
        Some(OriginMatch::Exact) => "allowed (exact match)".to_string(),
        Some(OriginMatch::Wildcard) => "allowed (wildcard)".to_string(),
        Some(OriginMatch::Pattern(name)) => format!("allowed (pattern {})", name),
        Some(OriginMatch::CustomScheme(scheme)) => format!("allowed (scheme {}://)", scheme),
        None => "rejected".to_string(),
    }
}
