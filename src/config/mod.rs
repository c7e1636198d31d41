mod settings;

pub use settings::{AssetSettings, Config, ExportSettings};

use crate::error::{BillError, Result};
use directories::{BaseDirs, ProjectDirs, UserDirs};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (the platform config dir, else ~/.bill/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "bill") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    home_dir().map(|home| home.join(".bill")).ok_or_else(|| {
        BillError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })
}

fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Load config.toml (defaults if missing)
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| BillError::ConfigParse { path, source: e })
}

/// Where exported bills are saved: the configured directory, else the
/// user's Downloads folder, else the current directory.
pub fn resolve_output_dir(settings: &ExportSettings) -> PathBuf {
    if let Some(dir) = &settings.output_dir {
        return expand_path(dir);
    }
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"# Every setting is optional; delete a line to fall back to its default.

[assets]
# Logos drawn at the left and right of the bill header
# milk_logo = "~/.config/bill/kanhas_milk_logo.png"
# goat_logo = "~/.config/bill/kanhas_goat_logo.png"
# Extra font directories passed to typst (e.g., a font with the ₹ glyph)
font_dirs = []

[export]
# output_dir = "~/Downloads"   # default: your Downloads folder
typst = "typst"                # typst binary used to rasterize the bill
ppi = 96.0                     # 96 gives a 794x1123 px A4 image
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(temp_dir.path()).unwrap();

        assert!(config.assets.milk_logo.is_none());
        assert!(config.assets.font_dirs.is_empty());
        assert_eq!(config.export.typst, "typst");
        assert_eq!(config.export.ppi, 96.0);
    }

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert!(config.assets.goat_logo.is_none());
        assert!(config.export.output_dir.is_none());
        assert_eq!(config.export.ppi, 96.0);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.toml"),
            "[assets]\nmilk_logo = \"/srv/logo.png\"\n\n[export]\nppi = 150\n",
        )
        .unwrap();

        let config = load_config(temp_dir.path()).unwrap();
        assert_eq!(config.assets.milk_logo.as_deref(), Some("/srv/logo.png"));
        assert_eq!(config.export.ppi, 150.0);
        assert_eq!(config.export.typst, "typst");
    }

    #[test]
    fn invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "[export\nppi = ").unwrap();

        let err = load_config(temp_dir.path()).unwrap_err();
        assert!(matches!(err, BillError::ConfigParse { ref path, .. } if path.ends_with("config.toml")));
    }

    #[test]
    fn configured_output_dir_wins() {
        let settings = ExportSettings {
            output_dir: Some("/tmp/bills".to_string()),
            ..ExportSettings::default()
        };
        assert_eq!(resolve_output_dir(&settings), PathBuf::from("/tmp/bills"));
    }

    #[test]
    fn expands_home_prefix() {
        let expanded = expand_path("~/bills");
        if let Some(dirs) = BaseDirs::new() {
            assert_eq!(expanded, dirs.home_dir().join("bills"));
        }
        assert_eq!(expand_path("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_path("~other/bills"), PathBuf::from("~other/bills"));
    }

    #[test]
    fn documented_logo_keys_are_read() {
        let config: Config = toml::from_str(
            "[assets]\nmilk_logo = \"/srv/milk.png\"\ngoat_logo = \"/srv/goat.png\"\nfont_dirs = [\"/srv/fonts\"]\n",
        )
        .unwrap();

        assert_eq!(config.assets.milk_logo.as_deref(), Some("/srv/milk.png"));
        assert_eq!(config.assets.goat_logo.as_deref(), Some("/srv/goat.png"));
        assert_eq!(config.assets.font_dirs, vec!["/srv/fonts".to_string()]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        for content in [
            "[assets]\nleft_logo = \"/srv/milk.png\"\n",
            "[export]\noutput = \"/tmp/bills\"\n",
            "[asset]\nmilk_logo = \"/srv/milk.png\"\n",
        ] {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("config.toml"), content).unwrap();

            let err = load_config(temp_dir.path()).unwrap_err();
            assert!(matches!(err, BillError::ConfigParse { .. }), "accepted {content:?}");
        }
    }
}
