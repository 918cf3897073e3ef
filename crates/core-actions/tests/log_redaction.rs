mod common;

use common::{feed, key, open, typed};
use core_actions::SessionStep;
use core_events::KeyCode;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing::dispatcher::Dispatch;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

#[derive(Clone, Debug)]
struct CapturedEvent {
    target: String,
    fields: Vec<(String, String)>,
}

#[derive(Default)]
struct FieldCollector {
    fields: Vec<(String, String)>,
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{:?}", value)));
    }
}

impl<S> Layer<S> for Capture
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            fields: collector.fields,
        });
    }
}

#[test]
fn typed_text_never_reaches_log_fields() {
    let capture = Capture::default();
    let events = capture.events.clone();
    let dispatch = Dispatch::new(Registry::default().with(capture));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diary.txt");
    std::fs::write(&path, "hidden words\n").unwrap();

    tracing::dispatcher::with_default(&dispatch, || {
        let mut session = open(&path);
        let mut script = typed("isecret");
        script.push(key(KeyCode::Esc));
        script.extend(typed(":zz\n:wq\n"));
        assert_eq!(feed(&mut session, script), SessionStep::Quit);
    });

    let events = events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|e| e.target == "versions"
                && e.fields.iter().any(|(n, v)| n == "message" && v.contains("version_saved"))),
        "missing versions/version_saved event"
    );
    for event in events.iter() {
        for (name, value) in &event.fields {
            assert!(
                !value.contains("secret") && !value.contains("hidden words"),
                "{}:{name} leaked buffer content: {value}",
                event.target
            );
            assert!(!value.contains(":zz"), "{}:{name} leaked command text", event.target);
        }
    }
}
