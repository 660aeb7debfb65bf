//! Loading the greeting document from disk or the bundled default.

use std::path::Path;

use anyhow::Context;
use greeting_core::model::{GreetingConfig, GreetingConfigDraft};

/// Bundled Valentine's greeting used when no `--config` is given.
pub const BUNDLED: &str = include_str!("../assets/greeting.toml");

/// Parse and validate a TOML document.
///
/// # Errors
///
/// Fails on malformed TOML or when validation rejects the content.
pub fn parse(text: &str) -> anyhow::Result<GreetingConfig> {
    let draft: GreetingConfigDraft = toml::from_str(text).context("invalid greeting document")?;
    let config = draft.validate().context("greeting document failed validation")?;
    Ok(config)
}

/// Load the config at `path`, or the bundled one when `path` is `None`.
///
/// # Errors
///
/// Fails when the file cannot be read or does not validate.
pub fn load(path: Option<&Path>) -> anyhow::Result<GreetingConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded greeting config");
            parse(&text).with_context(|| format!("in {}", path.display()))
        }
        None => {
            tracing::debug!("using bundled greeting config");
            parse(BUNDLED)
        }
    }
}

/// One-screen summary printed by `greeting check`.
#[must_use]
pub fn summary(config: &GreetingConfig) -> String {
    let rules = &config.quiz.rules;
    let lives = rules
        .lives
        .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
    let reveal = match &config.reveal.content {
        greeting_core::model::Reveal::Cinema(_) => "cinema ticket",
        greeting_core::model::Reveal::Date(_) => "date invitation",
    };
    let countdown = config.countdown.as_ref().map_or_else(
        || "none".to_string(),
        |c| c.countdown.target().to_rfc3339(),
    );

    format!(
        "quiz: {} questions, pass at {}, lives {lives}\n\
         slideshow: {} slides, loop {}\n\
         reveal: {reveal}\n\
         countdown: {countdown}",
        config.quiz.questions.len(),
        rules.min_correct,
        config.slideshow.slides.len(),
        if config.slideshow.loop_enabled { "on" } else { "off" },
    )
}
