use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MsgflowError, Result};

/// A method whose invocation puts a new message on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOperation {
    /// Method name, e.g. "PublishMessageAsync"
    pub name: String,

    /// Zero-based index of the argument that carries the message
    pub argument: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Messaging conventions of the analyzed codebase
    pub messaging: MessagingConfig,

    /// Service naming heuristics
    pub services: ServicesConfig,

    /// Diagram participants and colors
    pub diagram: DiagramConfig,

    /// Traversal limits
    pub traversal: TraversalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Full name of the base type every command derives from
    pub command_type: String,

    /// Full name of the base type every event derives from
    pub event_type: String,

    /// Interface implemented by event handlers
    pub handler_callback_type: String,

    /// Parameter attribute marking a command bound from a request body
    pub body_marker: String,

    /// Method name that handles events
    pub event_handler_method: String,

    /// Method name that handles commands outside of request bodies
    pub command_handler_method: String,

    /// Operations that create new messages
    pub publish_operations: Vec<PublishOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Regex patterns for full-name segments that never name a service
    pub skip_segments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Participant used when a message has no known sender
    pub external_actor: String,

    /// Participant used when a handler's service cannot be derived
    pub unknown_service: String,

    /// Arrow color for commands
    pub command_color: String,

    /// Arrow color for events and anything else
    pub event_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Maximum nesting of messages triggered by messages
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            messaging: MessagingConfig {
                command_type: "Pitstop.Infrastructure.Messaging.Command".to_string(),
                event_type: "Pitstop.Infrastructure.Messaging.Event".to_string(),
                handler_callback_type: "Pitstop.Infrastructure.Messaging.IMessageHandlerCallback".to_string(),
                body_marker: "Microsoft.AspNetCore.Mvc.FromBodyAttribute".to_string(),
                event_handler_method: "HandleAsync".to_string(),
                command_handler_method: "HandleCommandAsync".to_string(),
                publish_operations: vec![
                    PublishOperation {
                        name: "PublishMessageAsync".to_string(),
                        argument: 1,
                    },
                    PublishOperation {
                        name: "RaiseEvent".to_string(),
                        argument: 0,
                    },
                ],
            },
            services: ServicesConfig {
                skip_segments: vec!["(?i)^pitstop$".to_string(), "^Application$".to_string()],
            },
            diagram: DiagramConfig {
                external_actor: "A".to_string(),
                unknown_service: "Q".to_string(),
                command_color: "DodgerBlue".to_string(),
                event_color: "ForestGreen".to_string(),
            },
            traversal: TraversalConfig { max_depth: 32 },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| MsgflowError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MsgflowError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = ["msgflow.toml", "Msgflow.toml", ".msgflow.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip_keeps_publish_operations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msgflow.toml");

        let mut config = Config::default();
        config.traversal.max_depth = 5;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.traversal.max_depth, 5);
        assert_eq!(loaded.messaging.publish_operations, config.messaging.publish_operations);
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.diagram.external_actor, "A");
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[messaging\ncommand_type = ").unwrap();

        assert!(matches!(Config::load(&path), Err(MsgflowError::Config(_))));
    }
}
