//! Scenario loader - YAML file loading and parsing
//!
//! Only the envelope is typed here; expression and intersection blocks stay
//! raw YAML nodes and are read by [`crate::scenario::expression::read`] and
//! [`crate::scenario::intersection::Intersection::new`].

use crate::sim::error::ScenarioError;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Top-level scenario script
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ScenarioScript {
    /// Traffic-signal control groups
    #[serde(default)]
    pub intersection: Vec<Value>,
    pub story: StoryDefinition,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct StoryDefinition {
    pub end_condition: EndConditionDefinition,
}

/// Expressions deciding the verdict of the run
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct EndConditionDefinition {
    pub success: Value,
    /// Never fails when absent
    #[serde(default)]
    pub failure: Option<Value>,
}

/// Loads scenario scripts from YAML files
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a scenario script from a YAML file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ScenarioScript, ScenarioError> {
        let path = path.as_ref();
        log::info!("Loading scenario {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse a scenario script from a YAML string
    pub fn parse_yaml(content: &str) -> Result<ScenarioScript, ScenarioError> {
        let script: ScenarioScript = serde_yaml::from_str(content)?;
        Ok(script)
    }
}

impl Default for ScenarioLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_script() {
        let yaml = r#"
Intersection:
  - TrafficLightId: [34836, 34834]
    Control:
      - StateName: Red
        Color: Red

Story:
  EndCondition:
    Success:
      All:
        - Type: AlwaysTrue
    Failure:
      Type: ElapsedTime
      Value: 60
"#;
        let script = ScenarioLoader::parse_yaml(yaml).unwrap();
        assert_eq!(script.intersection.len(), 1);
        assert!(script.story.end_condition.success.get("All").is_some());

        let failure = script.story.end_condition.failure.unwrap();
        assert_eq!(failure.get("Type").and_then(Value::as_str), Some("ElapsedTime"));
    }

    #[test]
    fn test_parse_minimal_script() {
        let yaml = r#"
Story:
  EndCondition:
    Success:
      Type: AlwaysTrue
"#;
        let script = ScenarioLoader::parse_yaml(yaml).unwrap();
        assert!(script.intersection.is_empty());
        assert!(script.story.end_condition.failure.is_none());
    }

    #[test]
    fn test_missing_story_returns_error() {
        let yaml = r#"
Intersection: []
"#;
        let result = ScenarioLoader::parse_yaml(yaml);
        assert!(matches!(result, Err(ScenarioError::Yaml(_))));
    }

    #[test]
    fn test_missing_file_returns_io_error() {
        let result = ScenarioLoader::new().load("does/not/exist.yaml");
        assert!(matches!(result, Err(ScenarioError::Io(_))));
    }
}
