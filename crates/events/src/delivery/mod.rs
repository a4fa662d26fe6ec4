//! Outbound delivery channels for platform events.

pub mod email;
