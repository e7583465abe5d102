use crate::config::AppConfig;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    pub src: &'static str,
    pub sizes: &'static str,
    #[serde(rename = "type")]
    pub mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<&'static str>,
}

const fn icon(src: &'static str, sizes: &'static str, purpose: Option<&'static str>) -> ManifestIcon {
    ManifestIcon { src, sizes, mime_type: "image/png", purpose }
}

pub const ICONS: [ManifestIcon; 5] = [
    icon("/icon-192x192.png", "192x192", None),
    icon("/icon-512x512.png", "512x512", None),
    icon("/icon-maskable-192x192.png", "192x192", Some("maskable")),
    icon("/icon-maskable-512x512.png", "512x512", Some("maskable")),
    icon("/apple-touch-icon.png", "180x180", None),
];

/// The web app manifest served at `/manifest.webmanifest`.
#[derive(Clone, Debug, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: &'static str,
    pub scope: &'static str,
    pub display: &'static str,
    pub orientation: &'static str,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

impl WebManifest {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            name: config.name.clone(),
            short_name: config.short_name.clone(),
            description: config.description.clone(),
            start_url: "/",
            scope: "/",
            display: "standalone",
            orientation: "portrait",
            background_color: config.background_color.clone(),
            theme_color: config.theme_color.clone(),
            icons: ICONS.to_vec(),
        }
    }
}
