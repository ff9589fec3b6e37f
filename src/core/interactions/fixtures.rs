//! Pitstop-shaped building blocks shared by the interaction tests.

use crate::core::type_graph::{Invocation, MethodDescription, Statement, TypeDescription};

pub const COMMAND: &str = "Pitstop.Infrastructure.Messaging.Command";
pub const EVENT: &str = "Pitstop.Infrastructure.Messaging.Event";
pub const CALLBACK: &str = "Pitstop.Infrastructure.Messaging.IMessageHandlerCallback";
pub const FROM_BODY: &str = "Microsoft.AspNetCore.Mvc.FromBodyAttribute";
pub const PUBLISHER: &str = "Pitstop.Infrastructure.Messaging.IMessagePublisher";

pub fn command(full_name: &str) -> TypeDescription {
    TypeDescription::class(full_name).with_base(COMMAND)
}

pub fn event(full_name: &str) -> TypeDescription {
    TypeDescription::class(full_name).with_base(EVENT)
}

/// `publisher.PublishMessageAsync("MessageType", message, "")`
pub fn publish(message_full_name: &str) -> Statement {
    Invocation::new(PUBLISHER, "PublishMessageAsync")
        .with_argument("string", "messageType")
        .with_argument(message_full_name, "message")
        .with_argument("string", "\"\"")
        .into()
}

pub fn call(containing_type: &str, name: &str) -> Statement {
    Invocation::new(containing_type, name).into()
}

/// A class implementing the handler callback with a `HandleAsync(message)` method.
pub fn event_handler(full_name: &str, event_full_name: &str, body: Vec<Statement>) -> TypeDescription {
    TypeDescription::class(full_name).with_base(CALLBACK).with_method(
        MethodDescription::new("HandleAsync")
            .with_parameter(event_full_name, "message")
            .with_statements(body),
    )
}

/// A controller whose action binds the command from the request body.
pub fn command_controller(full_name: &str, command_full_name: &str, body: Vec<Statement>) -> TypeDescription {
    TypeDescription::class(full_name).with_method(
        MethodDescription::new("ExecuteAsync")
            .with_marked_parameter(command_full_name, "command", FROM_BODY)
            .with_statements(body),
    )
}
