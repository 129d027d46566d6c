//! Outgoing signals: the live setpoint and the completion notice

pub mod completion;
pub mod emitter;

pub use completion::CompletionNotifier;
pub use emitter::SetpointEmitter;
