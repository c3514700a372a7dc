//! LiDAR model definitions

use serde::{Deserialize, Serialize};

/// Supported LiDAR models
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "RS32")]
    Rs32,
    #[serde(rename = "RSBP")]
    Rsbp,
}

impl Model {
    /// Get the model name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Rs32 => "RS32",
            Model::Rsbp => "RSBP",
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Model {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_uppercase().as_str() {
            "RS32" => Ok(Model::Rs32),
            "RSBP" => Ok(Model::Rsbp),
            _ => Err(format!("Unknown model: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_from_str() {
        assert_eq!(Model::try_from("RS32"), Ok(Model::Rs32));
        assert_eq!(Model::try_from("rsbp"), Ok(Model::Rsbp));
        assert!(Model::try_from("RS128").is_err());
    }

    #[test]
    fn test_model_display() {
        assert_eq!(Model::Rs32.to_string(), "RS32");
        assert_eq!(Model::Rsbp.to_string(), "RSBP");
    }

    #[test]
    fn test_model_serde_round_trip() {
        let json = serde_json::to_string(&Model::Rsbp).unwrap();
        assert_eq!(json, "\"RSBP\"");
        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Model::Rsbp);
    }
}
