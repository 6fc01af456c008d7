use serde::{Deserialize, Serialize};

/// A model available for chat completions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelInfo {
    /// The unique identifier of the model.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider the model is served by.
    pub provider: String,
    /// Short description shown in the model picker.
    #[serde(default)]
    pub description: String,
}

/// Response schema for the `/llm/models` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelsResponse {
    /// List of available models.
    pub models: Vec<ModelInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_defaults_to_empty() {
        let json = r#"{"id":"m1","name":"Model One","provider":"acme"}"#;
        let model: ModelInfo = serde_json::from_str(json).unwrap();
        assert_eq!(model.description, "");
    }

    #[test]
    fn models_response_round_trip() {
        let response = ModelsResponse {
            models: vec![ModelInfo {
                id: "m1".into(),
                name: "Model One".into(),
                provider: "acme".into(),
                description: "general purpose".into(),
            }],
        };

        let json = serde_json::to_string(&response).unwrap();
        let parsed: ModelsResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }
}
