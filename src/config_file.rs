use anyhow::{anyhow, Context, Result};
use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const PROJECT_FILE: &str = ".logbatchrc";
const MAX_ALIAS_DEPTH: usize = 10;

/// Defaults and aliases read from `.logbatchrc` / `config.ini`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFile {
    /// Arguments prepended to every command line
    pub defaults: Option<String>,
    pub aliases: HashMap<String, String>,
}

impl ConfigFile {
    /// Nearest `.logbatchrc` walking up from the current directory
    pub fn find_project_config() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;
        loop {
            let candidate = current.join(PROJECT_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// User config locations, most preferred first
    pub fn user_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if cfg!(windows) {
            if let Ok(appdata) = env::var("APPDATA") {
                paths.push(PathBuf::from(appdata).join("logbatch").join("config.ini"));
            }
            if let Ok(profile) = env::var("USERPROFILE") {
                paths.push(PathBuf::from(profile).join(PROJECT_FILE));
            }
        } else {
            let xdg_config = env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    env::var("HOME")
                        .map(|home| PathBuf::from(home).join(".config"))
                        .unwrap_or_else(|_| PathBuf::from(".config"))
                });
            paths.push(xdg_config.join("logbatch").join("config.ini"));

            if let Ok(home) = env::var("HOME") {
                paths.push(PathBuf::from(home).join(PROJECT_FILE));
            }
        }

        paths
    }

    /// Merge the first existing user config with the project config (project wins)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_path) = Self::user_config_paths().into_iter().find(|p| p.is_file()) {
            config = config.merged_with(Self::load_from_path(&user_path)?);
        }
        if let Some(project_path) = Self::find_project_config() {
            config = config.merged_with(Self::load_from_path(&project_path)?);
        }

        Ok(config)
    }

    /// An explicit `--config-file` replaces the search entirely
    pub fn load_with_custom_path(custom_path: Option<&str>) -> Result<Self> {
        match custom_path {
            Some(path) => Self::load_from_path(Path::new(path)),
            None => Self::load(),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Ok(Self::parse_ini_content(&content))
    }

    /// Root-level `defaults = ...` and an `[aliases]` section; everything else is ignored
    pub fn parse_ini_content(content: &str) -> Self {
        let mut config = Self::default();
        let mut section = String::new();

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = name.trim().to_string();
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim().to_string());

            match section.as_str() {
                "" if key == "defaults" => config.defaults = Some(value),
                "aliases" => {
                    config.aliases.insert(key.to_string(), value);
                }
                _ => {}
            }
        }

        config
    }

    fn merged_with(self, overlay: Self) -> Self {
        let mut aliases = self.aliases;
        aliases.extend(overlay.aliases);
        Self {
            defaults: overlay.defaults.or(self.defaults),
            aliases,
        }
    }

    /// Expand one alias, following nested `-a name` references
    pub fn resolve_alias(
        &self,
        name: &str,
        seen: &mut HashSet<String>,
        depth: usize,
    ) -> Result<Vec<String>> {
        if depth > MAX_ALIAS_DEPTH {
            return Err(anyhow!("Alias chain too deep: {} levels", depth));
        }
        if !seen.insert(name.to_string()) {
            return Err(anyhow!("Circular dependency detected in alias: {}", name));
        }

        let value = self
            .aliases
            .get(name)
            .ok_or_else(|| anyhow!("Unknown alias: {}", name))?;
        let args = shell_words::split(value)
            .with_context(|| format!("Invalid alias '{}': failed to parse arguments", name))?;

        let mut resolved = Vec::new();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if arg == "-a" || arg == "--alias" {
                if let Some(nested) = iter.next() {
                    resolved.extend(self.resolve_alias(&nested, seen, depth + 1)?);
                    continue;
                }
            }
            resolved.push(arg);
        }

        seen.remove(name);
        Ok(resolved)
    }

    /// Insert defaults after the program name, then expand aliases
    pub fn process_args(&self, args: Vec<String>) -> Result<Vec<String>> {
        let mut with_defaults = Vec::with_capacity(args.len());
        let mut args = args.into_iter();
        with_defaults.extend(args.next());
        if let Some(defaults) = &self.defaults {
            let default_args = shell_words::split(defaults)
                .context("Invalid defaults: failed to parse arguments")?;
            with_defaults.extend(default_args);
        }
        with_defaults.extend(args);

        let mut expanded = Vec::with_capacity(with_defaults.len());
        let mut iter = with_defaults.into_iter();
        while let Some(arg) = iter.next() {
            if arg == "-a" || arg == "--alias" {
                if let Some(name) = iter.next() {
                    expanded.extend(self.resolve_alias(&name, &mut HashSet::new(), 0)?);
                    continue;
                }
            }
            expanded.push(arg);
        }

        Ok(expanded)
    }

    /// Human-readable description of what `--show-config` found
    pub fn describe(custom_path: Option<&str>) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Configuration precedence: CLI > project {} > user config > defaults\n",
            PROJECT_FILE
        );

        match Self::load_with_custom_path(custom_path) {
            Ok(config) => {
                match &config.defaults {
                    Some(defaults) => {
                        let _ = writeln!(out, "Active defaults:\n  defaults = {}", defaults);
                    }
                    None => {
                        let _ = writeln!(out, "No defaults configured.");
                    }
                }
                if !config.aliases.is_empty() {
                    let _ = writeln!(out, "\nActive aliases:");
                    let mut aliases: Vec<_> = config.aliases.iter().collect();
                    aliases.sort_by_key(|(name, _)| name.as_str());
                    for (name, value) in aliases {
                        let _ = writeln!(out, "  {} = {}", name, value);
                    }
                }
            }
            Err(e) => {
                let _ = writeln!(out, "Error loading configuration: {}", e);
            }
        }

        let _ = writeln!(out, "\nSearch locations (in precedence order):");
        match custom_path {
            Some(path) => {
                let _ = writeln!(out, "  --config-file: {}", path);
            }
            None => {
                let project = Self::find_project_config()
                    .map(|p| format!("{} (found)", p.display()))
                    .unwrap_or_else(|| {
                        format!("{} (searched up directory tree, not found)", PROJECT_FILE)
                    });
                let _ = writeln!(out, "  1. Project: {}", project);
                for (i, path) in Self::user_config_paths().iter().enumerate() {
                    let status = if path.is_file() { "(found)" } else { "(not found)" };
                    let _ = writeln!(out, "  {}. User: {} {}", i + 2, path.display(), status);
                }
            }
        }

        out
    }
}
