use figment::providers::{Format, Json, Toml, Yaml};
use std::path::Path;

/// Configuration file formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

/// Pick a provider for `path` from its extension, falling back to sniffing
/// the content. Returns a provider that can be passed straight to
/// `Figment::merge`.
pub fn auto<P: AsRef<Path>>(path: P) -> impl figment::Provider {
    let path = path.as_ref();

    let format = format_from_extension(path).unwrap_or_else(|| {
        let detected = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| detect_format_from_content(&content));
        tracing::debug!(
            "Config {} has no known extension, detected {:?}",
            path.display(),
            detected
        );
        detected.unwrap_or(ConfigFormat::Toml)
    });

    match format {
        ConfigFormat::Toml => SmartProvider::Toml(Toml::file(path)),
        ConfigFormat::Json => SmartProvider::Json(Json::file(path)),
        ConfigFormat::Yaml => SmartProvider::Yaml(Yaml::file(path)),
    }
}

fn format_from_extension(path: &Path) -> Option<ConfigFormat> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "toml" => Some(ConfigFormat::Toml),
        "json" => Some(ConfigFormat::Json),
        "yaml" | "yml" => Some(ConfigFormat::Yaml),
        _ => None,
    }
}

/// Wrapper enum to handle different provider types
enum SmartProvider {
    Toml(figment::providers::Data<Toml>),
    Json(figment::providers::Data<Json>),
    Yaml(figment::providers::Data<Yaml>),
}

impl figment::Provider for SmartProvider {
    fn metadata(&self) -> figment::Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
            SmartProvider::Yaml(p) => p.metadata(),
        }
    }

    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
            SmartProvider::Yaml(p) => p.data(),
        }
    }
}

/// Guess the format of a config file from its content.
///
/// TOML is checked before YAML because TOML values (Windows paths, check
/// globs) often contain colons.
fn detect_format_from_content(content: &str) -> Option<ConfigFormat> {
    let trimmed = content.trim();

    if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed.contains('\n'))
    {
        return Some(ConfigFormat::Json);
    }

    let meaningful = || {
        trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
    };

    if meaningful().any(|line| {
        (line.starts_with('[') && line.ends_with(']'))
            || line.split_once('=').is_some_and(|(key, _)| {
                let key = key.trim();
                !key.is_empty() && !key.contains(':') && !key.contains(' ')
            })
    }) {
        return Some(ConfigFormat::Toml);
    }

    if trimmed.starts_with("---")
        || meaningful().any(|line| line.contains(": ") || line.ends_with(':'))
    {
        return Some(ConfigFormat::Yaml);
    }

    None
}
