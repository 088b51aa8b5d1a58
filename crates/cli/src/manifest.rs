use anyhow::{Context, Result, bail};
use clapper::{ROOT, Registry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "clapper.json";

/// JSON description of a registry (`clapper.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    #[serde(default)]
    pub commands: Vec<CommandManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandManifest {
    /// Command name; empty for the root command.
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgManifest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgManifest {
    /// Argument name, `...` suffix for a variadic argument.
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_values: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagManifest {
    /// Long name, `no-` prefix for an inverted flag.
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short: String,

    #[serde(default)]
    pub boolean: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_values: Vec<String>,
}

impl ArgManifest {
    fn new(name: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            default: default.to_string(),
            valid_values: Vec::new(),
        }
    }
}

impl FlagManifest {
    fn new(name: &str, short: &str, boolean: bool, default: &str) -> Self {
        Self {
            name: name.to_string(),
            short: short.to_string(),
            boolean,
            default: default.to_string(),
            valid_values: Vec::new(),
        }
    }

    fn valid(mut self, values: &[&str]) -> Self {
        self.valid_values = values.iter().map(|v| v.to_string()).collect();
        self
    }
}

impl Manifest {
    /// Schema used when no `clapper.json` is found.
    pub fn demo() -> Self {
        let root = CommandManifest {
            name: ROOT.to_string(),
            args: vec![ArgManifest::new("output", "")],
            flags: vec![
                FlagManifest::new("force", "f", true, ""),
                FlagManifest::new("verbose", "v", true, ""),
                FlagManifest::new("version", "V", false, ""),
                FlagManifest::new("dir", "", false, "/var/users"),
            ],
        };

        let info = CommandManifest {
            name: "info".to_string(),
            args: vec![
                ArgManifest {
                    valid_values: ["manager", "student", "math", "science", "physics"]
                        .iter()
                        .map(|v| v.to_string())
                        .collect(),
                    ..ArgManifest::new("category", "manager")
                },
                ArgManifest::new("username", ""),
                ArgManifest::new("subjects...", ""),
            ],
            flags: vec![
                FlagManifest::new("verbose", "v", true, ""),
                FlagManifest::new("version", "V", false, "1.0.1").valid(&["1.0.1", "2.0.0"]),
                FlagManifest::new("output", "o", false, "./"),
                FlagManifest::new("no-clean", "", true, ""),
            ],
        };

        let ghost = CommandManifest {
            name: "ghost".to_string(),
            ..Default::default()
        };

        Self {
            schema_version: Some(1),
            commands: vec![root, info, ghost],
        }
    }

    /// Build a registry through the regular registration calls.
    ///
    /// With `skip_root`, the root command is left out.
    pub fn to_registry(&self, skip_root: bool) -> Registry {
        let mut registry = Registry::new();
        for command in &self.commands {
            if skip_root && command.name.trim().is_empty() {
                continue;
            }

            let (config, existed) = registry.register(&command.name);
            if existed {
                tracing::debug!(command = %command.name, "command listed twice, merging");
            }
            for arg in &command.args {
                config.add_arg_with_valid(&arg.name, &arg.default, arg.valid_values.iter().cloned());
            }
            for flag in &command.flags {
                config.add_flag_with_valid(
                    &flag.name,
                    &flag.short,
                    flag.boolean,
                    &flag.default,
                    flag.valid_values.iter().cloned(),
                );
            }
        }
        registry
    }
}

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
}

/// Load `manifest_path`, or `clapper.json` from the current directory.
///
/// A missing explicit path is an error; a missing default file is `None`.
pub fn load_manifest(manifest_path: Option<&Path>) -> Result<Option<LoadedManifest>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match manifest_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_MANIFEST_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("schema manifest not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read schema manifest: {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse schema manifest JSON: {}", path.display()))?;

    Ok(Some(LoadedManifest { path, manifest }))
}

/// Write the demo schema to `<dir>/clapper.json`.
///
/// An existing file is left alone unless `overwrite` is set.
pub fn write_default_manifest(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() && !overwrite {
        return Ok(dest);
    }

    let bytes =
        serde_json::to_vec_pretty(&Manifest::demo()).context("failed to serialize manifest")?;
    let mut out = String::from_utf8(bytes).context("manifest is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("clapper-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn manifest_deserializes_camel_case() {
        let json = r#"{
  "schemaVersion": 1,
  "commands": [
    {
      "name": "deploy",
      "args": [
        { "name": "env", "default": "staging", "validValues": ["staging", "prod"] },
        { "name": "targets..." }
      ],
      "flags": [
        { "name": "dry-run", "short": "n", "boolean": true },
        { "name": "region", "short": "r", "default": "eu" },
        { "name": "no-cache", "boolean": true }
      ]
    }
  ]
}"#;
        let m: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(m.schema_version, Some(1));
        assert_eq!(m.commands.len(), 1);
        let deploy = &m.commands[0];
        assert_eq!(deploy.args[0].valid_values, ["staging", "prod"]);
        assert_eq!(deploy.args[1].default, "");
        assert!(deploy.flags[0].boolean);
        assert_eq!(deploy.flags[1].short, "r");

        let registry = m.to_registry(false);
        let config = registry.get("deploy").unwrap();
        assert!(config.arg("targets").unwrap().is_variadic());
        assert!(config.flag("cache").unwrap().is_inverted());
        assert_eq!(config.flag_by_short('n').unwrap().name(), "dry-run");
    }

    #[test]
    fn demo_registry_matches_demo_program() {
        let registry = Manifest::demo().to_registry(false);
        assert!(registry.root().is_some());
        assert!(registry.contains("ghost"));

        let info = registry.get("info").unwrap();
        let args: Vec<_> = info.args().map(|a| a.name()).collect();
        assert_eq!(args, ["category", "username", "subjects"]);
        assert_eq!(info.flag("clean").unwrap().default_value(), "true");
        assert_eq!(info.flag("version").unwrap().default_value(), "1.0.1");
    }

    #[test]
    fn skip_root_drops_only_the_root() {
        let registry = Manifest::demo().to_registry(true);
        assert!(registry.root().is_none());
        assert_eq!(registry.commands().len(), 2);
    }

    #[test]
    fn write_default_manifest_round_trips_demo() {
        let dir = make_temp_dir("manifest-defaults");
        let dest = write_default_manifest(&dir, false).unwrap();
        assert_eq!(dest, dir.join(DEFAULT_MANIFEST_NAME));

        let loaded = load_manifest(Some(&dest)).unwrap().unwrap();
        assert_eq!(loaded.manifest.schema_version, Some(1));
        let names: Vec<_> = loaded
            .manifest
            .commands
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["", "info", "ghost"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn explicit_missing_manifest_is_an_error() {
        let dir = make_temp_dir("manifest-missing");
        let err = load_manifest(Some(&dir.join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("schema manifest not found"));
        let _ = fs::remove_dir_all(&dir);
    }
}
