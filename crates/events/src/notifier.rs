//! Background email notifier.
//!
//! [`EmailNotifier`] subscribes to the [`EventBus`] and turns selected
//! events into outbound emails. Delivery failures are logged and dropped;
//! the request that published the event has already succeeded and must not
//! be affected by SMTP trouble.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use crate::bus::{EventBus, PlatformEvent};
use crate::delivery::email::{EmailConfig, EmailDelivery};

/// Event types the notifier reacts to. Everything else is ignored.
pub const EVENT_ACCOUNT_REGISTERED: &str = "account.registered";
pub const EVENT_LECTURER_CREDENTIALS: &str = "lecturer.credentials";
pub const EVENT_ATTACHMENT_STATUS_CHANGED: &str = "attachment.status_changed";
pub const EVENT_LOGBOOK_ENTRY_CREATED: &str = "logbook.entry_created";

pub struct EmailNotifier {
    bus: Arc<EventBus>,
    delivery: EmailDelivery,
}

impl EmailNotifier {
    pub fn new(bus: Arc<EventBus>, config: EmailConfig) -> Self {
        Self {
            bus,
            delivery: EmailDelivery::new(config),
        }
    }

    /// Consume events until the bus is dropped. Run this on its own task.
    pub async fn run(self) {
        let mut rx = self.bus.subscribe();
        loop {
            match rx.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Email notifier lagged behind the event bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    async fn handle(&self, event: &PlatformEvent) {
        let Some((to, subject, body)) = compose(event) else {
            return;
        };
        if let Err(e) = self.delivery.deliver(&to, &subject, &body).await {
            tracing::warn!(
                event_type = %event.event_type,
                to,
                error = %e,
                "Failed to deliver notification email"
            );
        }
    }
}

/// Map an event to (recipient, subject, body). Returns `None` for event
/// types that carry no email, or when the payload lacks a recipient.
fn compose(event: &PlatformEvent) -> Option<(String, String, String)> {
    let payload = event.payload.as_object()?;
    let to = payload.get("email")?.as_str()?.to_string();
    let name = payload
        .get("first_name")
        .and_then(|v| v.as_str())
        .unwrap_or("there");

    match event.event_type.as_str() {
        EVENT_ACCOUNT_REGISTERED => Some((
            to,
            "Welcome to the Industrial Attachment Portal".to_string(),
            format!(
                "Hello {name},\n\nYour account has been created. You can now log in \
                 and submit your attachment details.\n"
            ),
        )),
        EVENT_LECTURER_CREDENTIALS => {
            let password = payload.get("temp_password")?.as_str()?;
            Some((
                to,
                "Your lecturer account credentials".to_string(),
                format!(
                    "Hello {name},\n\nAn administrator has created a lecturer account \
                     for you. Sign in with this temporary password and change it \
                     immediately:\n\n    {password}\n"
                ),
            ))
        }
        EVENT_ATTACHMENT_STATUS_CHANGED => {
            let status = payload.get("status").and_then(|v| v.as_str())?;
            Some((
                to,
                format!("Attachment {status}"),
                format!(
                    "Hello {name},\n\nYour industrial attachment is now \"{status}\". \
                     Log in to the portal for details.\n"
                ),
            ))
        }
        EVENT_LOGBOOK_ENTRY_CREATED => {
            let student = payload
                .get("student_name")
                .and_then(|v| v.as_str())
                .unwrap_or("A student");
            let date = payload.get("entry_date").and_then(|v| v.as_str())?;
            Some((
                to,
                format!("New logbook entry from {student}"),
                format!(
                    "Hello {name},\n\n{student} submitted a logbook entry for {date}. \
                     Log in to the portal to review it.\n"
                ),
            ))
        }
        _ => None,
    }
}
