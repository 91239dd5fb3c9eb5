use crate::feed::types::Notification;

/// Store notifications, newest first.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    notifications: Vec<Notification>,
}

impl Mailbox {
    pub fn new(mut notifications: Vec<Notification>) -> Self {
        notifications.sort_by(|a, b| b.date.cmp(&a.date));
        Self { notifications }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Flip read/unread. Returns false for an unknown id.
    pub fn toggle_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = !n.read;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::NotificationKind;
    use chrono::{TimeZone, Utc};

    fn note(id: &str, day: u32, read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            kind: NotificationKind::Info,
            title: format!("note {}", id),
            message: String::new(),
            date: Utc.with_ymd_and_hms(2024, 7, day, 9, 0, 0).unwrap(),
            read,
        }
    }

    #[test]
    fn test_sorted_newest_first() {
        let mb = Mailbox::new(vec![note("a", 1, false), note("b", 20, true), note("c", 5, false)]);
        let ids: Vec<&str> = mb.notifications().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(mb.unread_count(), 2);
    }

    #[test]
    fn test_toggle_read() {
        let mut mb = Mailbox::new(vec![note("a", 1, false)]);
        assert!(mb.toggle_read("a"));
        assert_eq!(mb.unread_count(), 0);
        assert!(mb.toggle_read("a"));
        assert_eq!(mb.unread_count(), 1);
        assert!(!mb.toggle_read("zzz"));
    }
}
