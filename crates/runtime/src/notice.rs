use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-facing notification.
///
/// `seq` is assigned by the bus and increases monotonically per session so a
/// client can poll with "everything after N".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub seq: u64,
    pub level: NoticeLevel,
    pub kind: &'static str,
    pub message: String,
}

/// Notices kept per bus; older ones are dropped first. Clients polling with
/// `since` see a gap in `seq` when they fall this far behind.
pub const MAX_RETAINED_NOTICES: usize = 256;

#[derive(Debug, Default)]
pub struct NoticeBus {
    next_seq: u64,
    notices: Vec<Notice>,
}

impl NoticeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, level: NoticeLevel, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => tracing::debug!(kind, "{message}"),
            NoticeLevel::Warning => tracing::warn!(kind, "{message}"),
            NoticeLevel::Error => tracing::error!(kind, "{message}"),
        }
        self.notices.push(Notice {
            seq: self.next_seq,
            level,
            kind,
            message,
        });
        self.next_seq += 1;
        if self.notices.len() > MAX_RETAINED_NOTICES {
            let excess = self.notices.len() - MAX_RETAINED_NOTICES;
            self.notices.drain(..excess);
        }
    }

    pub fn info(&mut self, kind: &'static str, message: impl Into<String>) {
        self.emit(NoticeLevel::Info, kind, message);
    }

    pub fn warn(&mut self, kind: &'static str, message: impl Into<String>) {
        self.emit(NoticeLevel::Warning, kind, message);
    }

    pub fn error(&mut self, kind: &'static str, message: impl Into<String>) {
        self.emit(NoticeLevel::Error, kind, message);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Notices with `seq >= from`.
    pub fn since(&self, from: u64) -> &[Notice] {
        let start = self.notices.partition_point(|n| n.seq < from);
        &self.notices[start..]
    }

    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_RETAINED_NOTICES, NoticeBus, NoticeLevel};

    #[test]
    fn records_notices_in_order() {
        let mut bus = NoticeBus::new();
        bus.info("test", "hello");
        bus.error("test", "boom");
        assert_eq!(bus.notices().len(), 2);
        assert_eq!(bus.notices()[1].level, NoticeLevel::Error);
        assert_eq!(bus.last().map(|n| n.message.as_str()), Some("boom"));
    }

    #[test]
    fn seq_survives_drain() {
        let mut bus = NoticeBus::new();
        bus.warn("k", "a");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.notices().is_empty());

        bus.warn("k", "b");
        assert_eq!(bus.notices()[0].seq, 1);
    }

    #[test]
    fn since_filters_by_seq() {
        let mut bus = NoticeBus::new();
        for m in ["a", "b", "c"] {
            bus.info("k", m);
        }
        let tail: Vec<&str> = bus.since(1).iter().map(|n| n.message.as_str()).collect();
        assert_eq!(tail, vec!["b", "c"]);
        assert!(bus.since(10).is_empty());
    }

    #[test]
    fn oldest_notices_are_dropped_past_the_cap() {
        let mut bus = NoticeBus::new();
        for i in 0..MAX_RETAINED_NOTICES + 10 {
            bus.info("k", format!("n{i}"));
        }
        assert_eq!(bus.notices().len(), MAX_RETAINED_NOTICES);
        assert_eq!(bus.notices()[0].seq, 10);
        assert_eq!(bus.since(0).len(), MAX_RETAINED_NOTICES);
        assert_eq!(bus.last().map(|n| n.seq), Some((MAX_RETAINED_NOTICES + 9) as u64));
    }
}
