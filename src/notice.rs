//! Blocking Notices
//!
//! Messages the user has to acknowledge (the page renders them as a modal
//! dialog). Queued by event handlers and drained by the next render.

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Pending notices for one view
#[derive(Debug, Default)]
pub struct Notices {
    pending: Vec<Notice>,
}

impl Notices {
    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Info, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Error, text.into());
    }

    fn push(&mut self, kind: NoticeKind, text: String) {
        tracing::debug!(?kind, "Notice queued: {}", text);
        self.pending.push(Notice { kind, text });
    }

    pub fn pending(&self) -> &[Notice] {
        &self.pending
    }

    /// Remove and return everything queued so far
    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_drains_in_order() {
        let mut notices = Notices::default();
        notices.error("first");
        notices.info("second");

        let taken = notices.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].kind, NoticeKind::Error);
        assert_eq!(taken[1].text, "second");
        assert!(notices.pending().is_empty());
    }
}
