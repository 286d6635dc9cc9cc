//! Request shapes shared by the Gemini embedding and generation providers.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    pub fn text(text: &'a str) -> Self {
        Self {
            role: None,
            parts: vec![Part { text }],
        }
    }

    pub fn user(text: &'a str) -> Self {
        Self {
            role: Some("user"),
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Part<'a> {
    pub text: &'a str,
}

/// Resource name of a model: `"models/<id>"`.
pub(crate) fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// URL of a model method, e.g. `{base}/models/gemini-2.5-flash:generateContent`.
pub(crate) fn method_url(base_url: &str, model: &str, method: &str) -> String {
    format!(
        "{}/{}:{}",
        base_url.trim_end_matches('/'),
        model_path(model),
        method
    )
}
