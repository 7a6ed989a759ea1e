use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const IMAGE_PLACEHOLDER_FLAG: &str = "--image-placeholder";

/// Defaults for the command-line host, saved as command-line flags.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub show_selection: bool,
    pub verbose: bool,
    pub image_placeholder: Option<String>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            show_selection: self.show_selection || other.show_selection,
            verbose: self.verbose || other.verbose,
            image_placeholder: other
                .image_placeholder
                .clone()
                .or_else(|| self.image_placeholder.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markcraft").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markcraft")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markcraft").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markcraft")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markcraftrc")
}

/// Load saved flags from `path`; a missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(line_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Split one config line into flag tokens. The placeholder value runs to the
/// end of its line, so URLs or paths containing spaces survive a save.
fn line_tokens(line: &str) -> Vec<String> {
    match line.strip_prefix(IMAGE_PLACEHOLDER_FLAG) {
        Some(rest) if rest.starts_with(|c: char| c == '=' || c.is_whitespace()) => {
            let value = rest.strip_prefix('=').unwrap_or(rest).trim();
            vec![IMAGE_PLACEHOLDER_FLAG.to_string(), value.to_string()]
        }
        _ => line.split_whitespace().map(ToOwned::to_owned).collect(),
    }
}

/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# markcraft defaults (saved with --save)".to_string()];
    if flags.show_selection {
        lines.push("--show-selection".to_string());
    }
    if flags.verbose {
        lines.push("--verbose".to_string());
    }
    if let Some(placeholder) = &flags.image_placeholder {
        lines.push(format!("{IMAGE_PLACEHOLDER_FLAG} {placeholder}"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module persists out of a raw argument list; anything
/// else is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--show-selection" {
            flags.show_selection = true;
        } else if token == "--verbose" || token == "-v" {
            flags.verbose = true;
        } else if token == IMAGE_PLACEHOLDER_FLAG {
            if let Some(next) = tokens.get(i + 1) {
                flags.image_placeholder = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--image-placeholder=") {
            flags.image_placeholder = Some(value.to_string());
        }
        i += 1;
    }
    flags
}
