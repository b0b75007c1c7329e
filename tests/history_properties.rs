//! Property tests for the history bound and replay window.

use herald::{Bus, Playback};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn replayed(bus: &Bus<u32>, channel: &str, playback: Playback) -> Vec<u32> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = bus.subscribe_with(
        channel,
        move |values: &[u32]| sink.lock().unwrap().push(values[0]),
        playback,
    );
    sub.unsubscribe();

    let values = seen.lock().unwrap().clone();
    values
}

proptest! {
    #[test]
    fn history_holds_last_min_n_m(
        messages in prop::collection::vec(any::<u32>(), 0..200),
        max_history in 0usize..40,
    ) {
        let bus: Bus<u32> = Bus::with_max_history(max_history);
        for m in &messages {
            bus.publish("prop", [*m]);
        }

        let keep = messages.len().min(max_history);
        let expected = &messages[messages.len() - keep..];

        let stored: Vec<u32> = bus.history("prop").iter().map(|m| m[0]).collect();
        prop_assert_eq!(&stored[..], expected);
        prop_assert_eq!(replayed(&bus, "prop", Playback::All), expected.to_vec());
    }

    #[test]
    fn replay_window_is_most_recent_count(
        messages in prop::collection::vec(any::<u32>(), 0..60),
        max_history in 1usize..30,
        count in 0usize..80,
    ) {
        let bus: Bus<u32> = Bus::with_max_history(max_history);
        for m in &messages {
            bus.publish("prop", [*m]);
        }

        let stored = messages.len().min(max_history);
        let window = stored.min(count);
        let expected = messages[messages.len() - window..].to_vec();

        prop_assert_eq!(replayed(&bus, "prop", Playback::Last(count)), expected);
    }

    #[test]
    fn every_subscriber_sees_every_message(
        messages in prop::collection::vec(any::<u32>(), 1..50),
        subscribers in 1usize..6,
    ) {
        let bus: Bus<u32> = Bus::with_max_history(0);
        let logs: Vec<Arc<Mutex<Vec<u32>>>> = (0..subscribers)
            .map(|_| Arc::new(Mutex::new(Vec::new())))
            .collect();

        for log in &logs {
            let sink = Arc::clone(log);
            bus.subscribe("fanout", move |values: &[u32]| sink.lock().unwrap().push(values[0]));
        }
        for m in &messages {
            prop_assert_eq!(bus.publish("fanout", [*m]), subscribers);
        }

        for log in &logs {
            let received = log.lock().unwrap().clone();
            prop_assert_eq!(received, messages.clone());
        }
    }
}
