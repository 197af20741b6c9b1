//! Text acquisition from the scripture providers over HTTP.

use crate::config::ProvidersConfig;
use crate::text::{Provider, TextSource};
use crate::{MicrographyError, Result, TextAcquirer};
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::time::Duration;
use ureq::Agent;

/// Characters left literal in a reference path segment (`2:255`, `Genesis.1.1`).
const REFERENCE: &AsciiSet = &NON_ALPHANUMERIC.remove(b':').remove(b'.').remove(b'-').remove(b'_');

/// Blocking HTTP client for the scripture providers.
pub struct HttpAcquirer {
    agent: Agent,
    quran_url: String,
    sefaria_url: String,
}

impl HttpAcquirer {
    pub fn new(config: &ProvidersConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(config.timeout_secs.map(Duration::from_secs))
            .build()
            .into();
        Self {
            agent,
            quran_url: config.quran_url.trim_end_matches('/').to_string(),
            sefaria_url: config.sefaria_url.trim_end_matches('/').to_string(),
        }
    }

    fn get(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        let mut resp = self
            .agent
            .get(url)
            .call()
            .map_err(|e| MicrographyError::Fetch(format!("{url}: {e}")))?;
        resp.body_mut()
            .read_to_string()
            .map_err(|e| MicrographyError::Fetch(format!("{url}: {e}")))
    }
}

impl Default for HttpAcquirer {
    fn default() -> Self {
        Self::new(&ProvidersConfig::default())
    }
}

impl TextAcquirer for HttpAcquirer {
    fn fetch(&self, source: &TextSource) -> Result<String> {
        match source {
            TextSource::Custom(text) => Ok(text.clone()),
            TextSource::Scripture { provider, reference } => {
                let url = request_url(*provider, self.base(*provider), reference);
                let body = self.get(&url)?;
                parse_response(*provider, &body)
            }
        }
    }
}

impl HttpAcquirer {
    fn base(&self, provider: Provider) -> &str {
        match provider {
            Provider::Quran => &self.quran_url,
            Provider::Sefaria => &self.sefaria_url,
        }
    }
}

pub fn request_url(provider: Provider, base: &str, reference: &str) -> String {
    let reference = utf8_percent_encode(reference.trim(), REFERENCE);
    match provider {
        Provider::Quran => format!("{base}/ayah/{reference}"),
        Provider::Sefaria => format!("{base}/texts/{reference}?context=0"),
    }
}

/// Extract the raw text field from a provider's JSON response.
pub fn parse_response(provider: Provider, body: &str) -> Result<String> {
    let json: Value = serde_json::from_str(body).map_err(|e| {
        MicrographyError::Fetch(format!("{} returned invalid JSON: {e}", provider.name()))
    })?;
    let text = match provider {
        Provider::Quran => json["data"]["text"].as_str().map(str::to_string),
        Provider::Sefaria => flatten_text(&json["he"]),
    };
    text.ok_or_else(|| {
        let detail = json
            .get("error")
            .or_else(|| json.get("data"))
            .and_then(Value::as_str)
            .unwrap_or("missing text field");
        MicrographyError::Fetch(format!("{}: {detail}", provider.name()))
    })
}

/// Sefaria returns a string for a verse and nested arrays for larger ranges.
fn flatten_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_text).collect();
            Some(parts.join(" "))
        }
        _ => None,
    }
}
