use serde::{Deserialize, Serialize};

use crate::config::{Config, PublishOperation};
use crate::error::Result;
use crate::core::type_graph::{Invocation, TypeDescription};
use super::ServiceNaming;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Command,
    Event,
    Other,
}

/// Messaging conventions of the analyzed codebase, compiled from [`Config`].
#[derive(Debug, Clone)]
pub struct Conventions {
    pub command_type: String,
    pub event_type: String,
    pub handler_callback_type: String,
    pub body_marker: String,
    pub event_handler_method: String,
    pub command_handler_method: String,
    pub publish_operations: Vec<PublishOperation>,
    pub services: ServiceNaming,
    pub external_actor: String,
    pub unknown_service: String,
    pub command_color: String,
    pub event_color: String,
    pub max_depth: usize,
}

impl Conventions {
    pub fn from_config(config: &Config) -> Result<Self> {
        let messaging = &config.messaging;
        let diagram = &config.diagram;

        Ok(Self {
            command_type: messaging.command_type.clone(),
            event_type: messaging.event_type.clone(),
            handler_callback_type: messaging.handler_callback_type.clone(),
            body_marker: messaging.body_marker.clone(),
            event_handler_method: messaging.event_handler_method.clone(),
            command_handler_method: messaging.command_handler_method.clone(),
            publish_operations: messaging.publish_operations.clone(),
            services: ServiceNaming::new(&config.services.skip_segments)?,
            external_actor: diagram.external_actor.clone(),
            unknown_service: diagram.unknown_service.clone(),
            command_color: diagram.command_color.clone(),
            event_color: diagram.event_color.clone(),
            max_depth: config.traversal.max_depth,
        })
    }

    pub fn message_kind(&self, message: &TypeDescription) -> MessageKind {
        if message.implements_type(&self.command_type) {
            MessageKind::Command
        } else if message.implements_type(&self.event_type) {
            MessageKind::Event
        } else {
            MessageKind::Other
        }
    }

    pub fn arrow_color(&self, kind: MessageKind) -> &str {
        match kind {
            MessageKind::Command => &self.command_color,
            MessageKind::Event | MessageKind::Other => &self.event_color,
        }
    }

    /// The publish operation `invocation` performs, if it creates a message.
    pub fn publish_operation(&self, invocation: &Invocation) -> Option<&PublishOperation> {
        self.publish_operations.iter().find(|op| op.name == invocation.name)
    }

    pub fn is_message_creation(&self, invocation: &Invocation) -> bool {
        self.publish_operation(invocation).is_some()
    }
}

impl Default for Conventions {
    fn default() -> Self {
        Self::from_config(&Config::default()).expect("Invalid default conventions")
    }
}
