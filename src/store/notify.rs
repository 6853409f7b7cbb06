use std::time::{Duration, Instant};

/// Identifies one scheduled dismissal. A token only ever clears the message
/// it was issued with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DismissToken(u64);

#[derive(Debug, Clone)]
struct PendingDismiss {
    token: DismissToken,
    due: Instant,
}

/// Holds the transient notification badge. Setting a new message always
/// cancels whatever dismissal was pending for the previous one.
#[derive(Debug, Default)]
pub struct Notifier {
    message: Option<String>,
    pending: Option<PendingDismiss>,
    next_token: u64,
}

impl Notifier {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Show a message that stays until replaced.
    pub fn set(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
        self.pending = None;
    }

    /// Show a message that clears itself once `after` has elapsed.
    pub fn set_with_dismiss(
        &mut self,
        text: impl Into<String>,
        now: Instant,
        after: Duration,
    ) -> DismissToken {
        self.message = Some(text.into());
        self.next_token += 1;
        let token = DismissToken(self.next_token);
        self.pending = Some(PendingDismiss {
            token,
            due: now + after,
        });
        token
    }

    /// Token of the dismissal currently armed, if any.
    pub fn pending_token(&self) -> Option<DismissToken> {
        self.pending.as_ref().map(|pending| pending.token)
    }

    /// Fire the pending dismissal if it is due. Returns true when the
    /// message was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if now >= pending.due => {
                let token = pending.token;
                self.dismiss(token)
            }
            _ => false,
        }
    }

    /// Clear the message if `token` is still the armed one. Stale tokens are
    /// ignored.
    pub fn dismiss(&mut self, token: DismissToken) -> bool {
        if self.pending_token() != Some(token) {
            return false;
        }
        self.pending = None;
        self.message = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismisses_after_delay() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.set_with_dismiss("relay", start, Duration::from_millis(4500));

        assert!(!notifier.tick(start + Duration::from_millis(4499)));
        assert_eq!(notifier.message(), Some("relay"));

        assert!(notifier.tick(start + Duration::from_millis(4500)));
        assert_eq!(notifier.message(), None);
    }

    #[test]
    fn newer_message_cancels_pending_dismissal() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        let stale = notifier.set_with_dismiss("relay", start, Duration::from_secs(1));
        notifier.set("Editing UZ 45 A123");

        assert!(!notifier.tick(start + Duration::from_secs(10)));
        assert!(!notifier.dismiss(stale));
        assert_eq!(notifier.message(), Some("Editing UZ 45 A123"));
    }

    #[test]
    fn second_timed_message_restarts_the_clock() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        let first = notifier.set_with_dismiss("one", start, Duration::from_secs(2));
        let second =
            notifier.set_with_dismiss("two", start + Duration::from_secs(1), Duration::from_secs(2));
        assert_ne!(first, second);

        assert!(!notifier.tick(start + Duration::from_secs(2)));
        assert_eq!(notifier.message(), Some("two"));
        assert!(notifier.tick(start + Duration::from_secs(3)));
    }
}
