//! Property tests for change detection.

mod common;

use common::*;
use padel_watch::prelude::*;
use proptest::prelude::*;

fn court_line() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Court A: free".to_string(),
        "Court A: booked".to_string(),
        "Court B: free".to_string(),
        r#"{"court": "A", "free": 2}"#.to_string(),
        r#"{"free": 2, "court": "A"}"#.to_string(),
        r#"{"court": "A", "free": 1}"#.to_string(),
    ])
}

proptest! {
    #[test]
    fn identical_content_same_snapshot(text in ".{0,200}") {
        prop_assert_eq!(Snapshot::of(&text), Snapshot::of(&text.clone()));
    }

    #[test]
    fn json_key_order_is_irrelevant(a in any::<i64>(), b in "[a-z]{0,12}") {
        let one = format!(r#"{{"a": {}, "b": "{}"}}"#, a, b);
        let two = format!(r#"{{"b": "{}", "a": {}}}"#, b, a);
        prop_assert_eq!(Snapshot::of(&one), Snapshot::of(&two));
    }

    #[test]
    fn one_notification_per_differing_cycle(bodies in prop::collection::vec(court_line(), 1..12)) {
        let fetcher = ScriptedFetcher::new(bodies.iter().map(|b| body(b)));
        let notifier = RecordingNotifier::default();
        let watcher = watcher(&fetcher, &notifier, single_court());

        let (_, counts) = tokio_test::block_on(
            notifications_per_cycle(&watcher, &notifier, bodies.len()),
        );

        prop_assert_eq!(counts[0], 0);
        for i in 1..bodies.len() {
            let changed = Snapshot::of(&bodies[i]) != Snapshot::of(&bodies[i - 1]);
            prop_assert_eq!(counts[i], usize::from(changed));
        }
    }
}
