// src/settings.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Internal reasoning allowance per request, in tokens.
pub const DEFAULT_THINKING_BUDGET: i32 = 32768;

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"
You are an expert AI Math Solver. Your goal is to provide accurate, complete, and step-by-step solutions to math problems immediately.

When a user uploads a photo of a math problem or asks a question:
1.  **Solve Immediately**: Do not ask guiding questions. Provide the full solution right away.
2.  **Show Your Work**: Break down the solution into clear, logical steps. Explain *why* you are taking each step.
3.  **Final Answer**: Clearly state the final answer at the end of the response.
4.  **Thinking Mode**: Use your advanced reasoning capabilities to ensure the math is strictly accurate. Double-check your calculations in your internal thought process before outputting the final response.
5.  **Format**: Use standard LaTeX for all math expressions. Wrap inline math in single dollar signs ($...$) and block math in double dollar signs ($$...$$). Structure with clear headings or bullet points.

If the image contains multiple problems, ask the user which one to solve, or solve the most prominent one and mention there are others.
"#;

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub version: u32,
    pub model: String,
    pub system_prompt: String,
    pub thinking_budget: i32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: 1,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
        }
    }
}

/// Get the path to the settings file (~/.config/mathtutor/settings.json)
pub fn get_settings_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("could not determine config directory")?;

    let app_config_dir = config_dir.join("mathtutor");
    if !app_config_dir.exists() {
        fs::create_dir_all(&app_config_dir).context("failed to create config directory")?;
    }

    Ok(app_config_dir.join("settings.json"))
}

/// Load settings from disk, creating defaults if not present.
pub fn load_settings() -> Result<AppSettings> {
    load_from(&get_settings_path()?)
}

pub fn load_from(path: &Path) -> Result<AppSettings> {
    if !path.exists() {
        let defaults = AppSettings::default();
        save_to(&defaults, path)?;
        return Ok(defaults);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings at {}", path.display()))?;
    let settings = serde_json::from_str(&content).context("failed to parse settings")?;
    Ok(settings)
}

pub fn save_to(settings: &AppSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    fs::write(path, content)
        .with_context(|| format!("failed to write settings at {}", path.display()))?;
    Ok(())
}
