use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub assets: AssetSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

/// Where the logos and extra fonts drawn on the bill come from
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct AssetSettings {
    #[serde(default)]
    pub milk_logo: Option<String>,
    #[serde(default)]
    pub goat_logo: Option<String>,
    #[serde(default)]
    pub font_dirs: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ExportSettings {
    /// Download directory; defaults to the user's Downloads folder
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default = "default_typst")]
    pub typst: String,
    #[serde(default = "default_ppi")]
    pub ppi: f32,
}

fn default_typst() -> String {
    "typst".to_string()
}

fn default_ppi() -> f32 {
    96.0
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            typst: default_typst(),
            ppi: default_ppi(),
        }
    }
}
