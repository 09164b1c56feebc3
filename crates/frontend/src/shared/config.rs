use serde::Deserialize;

/// Client settings. Compiled-in defaults can be overridden per deployment by
/// a `<script id="client-config" type="application/toml">` block in the page.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub feedback: FeedbackConfig,
    pub form: FormConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Extension of the server's entry-point scripts (`index.py`, `auth_me.py`, ...)
    pub script_extension: String,
    /// Directory of the JSON endpoints below the mount root
    pub api_dir: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    pub alert_timeout_ms: u32,
    pub flash_fade_ms: u32,
    pub container_selector: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    pub manual_form_id: String,
    pub steps_container_id: String,
    pub step_count_field_id: String,
    pub title_selector: String,
    pub add_step_selector: String,
    pub search_input_id: String,
    pub search_form_id: String,
}

/// Default configuration embedded in the binary
pub const DEFAULT_CONFIG: &str = r#"
[api]
script_extension = "py"
api_dir = "cgi-bin/api"

[feedback]
alert_timeout_ms = 5000
flash_fade_ms = 300
container_selector = ".container"

[form]
manual_form_id = "manual-form"
steps_container_id = "steps-container"
step_count_field_id = "step_count"
title_selector = 'input[name="title"]'
add_step_selector = "[data-add-step]"
search_input_id = "search-input"
search_form_id = "search-form"
"#;

/// Id of the optional in-page override block
pub const CONFIG_ELEMENT_ID: &str = "client-config";

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            script_extension: "py".to_string(),
            api_dir: "cgi-bin/api".to_string(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            alert_timeout_ms: 5000,
            flash_fade_ms: 300,
            container_selector: ".container".to_string(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            manual_form_id: "manual-form".to_string(),
            steps_container_id: "steps-container".to_string(),
            step_count_field_id: "step_count".to_string(),
            title_selector: r#"input[name="title"]"#.to_string(),
            add_step_selector: "[data-add-step]".to_string(),
            search_input_id: "search-input".to_string(),
            search_form_id: "search-form".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Load configuration for the current page
///
/// Search order:
/// 1. `<script id="client-config" type="application/toml">` in the document
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<ClientConfig> {
    let inline = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());

    if let Some(contents) = inline {
        match ClientConfig::from_toml(&contents) {
            Ok(config) => {
                log::info!("Loaded client config from #{}", CONFIG_ELEMENT_ID);
                return Ok(config);
            }
            Err(e) => log::warn!("Ignoring invalid #{} block: {}", CONFIG_ELEMENT_ID, e),
        }
    }

    log::debug!("Using default embedded configuration");
    ClientConfig::from_toml(DEFAULT_CONFIG)
}
