//! Notification texts.

use crate::core::Change;
use std::fmt::Write;

/// Sent once when the monitor comes up.
pub const STARTUP_MESSAGE: &str = "🎾 Padel monitor started";

/// Changed targets listed by name; the rest are only counted.
pub const MAX_LISTED_CHANGES: usize = 20;

/// Target names longer than this are cut in the listing.
const MAX_NAME_CHARS: usize = 120;

/// Text announcing the changes detected in one cycle.
///
/// One line per changed target, up to [`MAX_LISTED_CHANGES`], followed by
/// the booking link when set. The result stays well under the 4096
/// character limit of a Telegram message.
pub fn change_message(changes: &[Change], link: Option<&str>) -> String {
    let mut text = String::from("🎾 Court availability changed\n");

    for change in changes.iter().take(MAX_LISTED_CHANGES) {
        let _ = write!(
            text,
            "\n• {}: {} → {}",
            shorten(&change.target),
            change.previous.short(),
            change.current.short()
        );
    }
    if changes.len() > MAX_LISTED_CHANGES {
        let _ = write!(text, "\n…and {} more", changes.len() - MAX_LISTED_CHANGES);
    }

    if let Some(link) = link {
        let _ = write!(text, "\n\n{}", link);
    }
    text
}

fn shorten(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_CHARS {
        return name.to_string();
    }
    let mut cut: String = name.chars().take(MAX_NAME_CHARS - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Snapshot;

    fn change(target: &str, before: &str, after: &str) -> Change {
        Change {
            target: target.to_string(),
            url: format!("https://example.com/{}", target),
            previous: Snapshot::of(before),
            current: Snapshot::of(after),
        }
    }

    #[test]
    fn test_lists_every_change() {
        let changes = vec![
            change("sessions_2026-10-18", "free", "booked"),
            change("event_info", "v1", "v2"),
        ];
        let text = change_message(&changes, None);

        assert!(text.starts_with("🎾 Court availability changed"));
        assert!(text.contains("• sessions_2026-10-18: "));
        assert!(text.contains(&format!(
            "{} → {}",
            Snapshot::of("v1").short(),
            Snapshot::of("v2").short()
        )));
        assert_eq!(text.lines().filter(|l| l.starts_with('•')).count(), 2);
    }

    #[test]
    fn test_long_lists_are_capped() {
        let changes: Vec<Change> = (0..366)
            .map(|i| {
                let target = format!("https://example.com/{}?date={}", "s".repeat(200), i);
                change(&target, "a", "b")
            })
            .collect();
        let text = change_message(&changes, Some("https://bilet.mos.ru/event/344458257/"));

        assert_eq!(
            text.lines().filter(|l| l.starts_with('•')).count(),
            MAX_LISTED_CHANGES
        );
        assert!(text.contains("\n…and 346 more"));
        assert!(text.ends_with("https://bilet.mos.ru/event/344458257/"));
        assert!(text.chars().count() < 4096);
    }

    #[test]
    fn test_appends_link() {
        let text = change_message(
            &[change("court", "a", "b")],
            Some("https://bilet.mos.ru/event/344458257/"),
        );
        assert!(text.ends_with("\n\nhttps://bilet.mos.ru/event/344458257/"));
    }
}
