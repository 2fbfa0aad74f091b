use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize)]
pub struct InferencePayload<'a> {
    pub inputs: &'a str,
}

/// JSON document returned by the endpoint instead of image bytes.
///
/// Each field is read on its own; a field with an unexpected type is
/// treated as absent without affecting the others.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<ErrorField>,
    /// Seconds until the model is expected to be loaded.
    #[serde(default, deserialize_with = "lenient")]
    pub estimated_time: Option<f64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorField {
    Message(String),
    Messages(Vec<String>),
}

impl ErrorField {
    pub fn into_message(self) -> String {
        match self {
            Self::Message(message) => message,
            Self::Messages(messages) => messages.join("; "),
        }
    }
}
