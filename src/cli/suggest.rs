//! `pinpoint suggest`: one autocomplete query.

use anyhow::Result;

use super::common;
use super::display::render_suggestions;
use crate::backend::BackendError;
use crate::config::AppConfig;

pub fn run_suggest(config: &AppConfig, query: &str) -> Result<()> {
    let query = query.trim();
    let min = config.autocomplete.min_chars;
    if query.chars().count() < min {
        crate::log!("suggest"; "query needs at least {} characters", min);
        return Ok(());
    }

    let backend = common::backend(config)?;
    let rt = common::runtime()?;
    let suggestions = rt.block_on(async {
        tokio::time::timeout(config.api.timeout(), backend.autocomplete(query.to_string()))
            .await
            .unwrap_or(Err(BackendError::Timeout))
    })?;

    if suggestions.is_empty() {
        crate::log!("suggest"; "no suggestions for `{}`", query);
    } else {
        println!("{}", render_suggestions(&suggestions));
    }
    Ok(())
}
