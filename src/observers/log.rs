use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Base observer that logs events to stdout.
///
/// Enabled via the `logging` feature. Useful for demos and debugging.
pub struct LogWriter;

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::SubscriptionAdded => {
                println!(
                    "[subscribed] id={} target={}",
                    display(&e.subscription),
                    e.message_type.as_deref().unwrap_or("<unknown>")
                );
            }
            EventKind::SubscriptionRemoved => {
                println!("[unsubscribed] id={}", display(&e.subscription));
            }
            EventKind::MessageProcessed => {
                println!(
                    "[processed] type={} delivered={} handled={}",
                    e.message_type.as_deref().unwrap_or("<unknown>"),
                    e.delivered.unwrap_or(false),
                    e.handled.unwrap_or(0)
                );
            }
            EventKind::HandlerFailed => {
                println!(
                    "[handler-failed] id={} type={} reason={}",
                    display(&e.subscription),
                    e.message_type.as_deref().unwrap_or("<unknown>"),
                    e.reason.as_deref().unwrap_or("<unknown>")
                );
            }
            EventKind::DispatchCancelled => {
                println!(
                    "[cancelled] type={}",
                    e.message_type.as_deref().unwrap_or("<unknown>")
                );
            }
            EventKind::ObserverPanicked => {
                println!(
                    "[observer-panic] observer={} reason={}",
                    e.observer.as_deref().unwrap_or("<unknown>"),
                    e.reason.as_deref().unwrap_or("<unknown>")
                );
            }
            EventKind::ObserverOverflow => {
                println!(
                    "[observer-overflow] observer={} reason={}",
                    e.observer.as_deref().unwrap_or("<unknown>"),
                    e.reason.as_deref().unwrap_or("<unknown>")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}

fn display(id: &Option<crate::SubscriptionId>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "<unknown>".to_string(),
    }
}
