//! Transient highlights that clear themselves after a fixed delay.
//!
//! Each (document, style) pair has at most one pending clear. Flashing the
//! same pair again supersedes the pending clear through its `AbortHandle`,
//! so a stale timer never wipes a newer highlight.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::AbortHandle;

use crate::host::{DecorationPainter, DecorationStyle, DocumentId};
use crate::text::TextRange;

/// Default time a highlight stays visible (100ms).
pub const DEFAULT_FLASH_DELAY: Duration = Duration::from_millis(100);

/// Logging target for flash scheduling.
const LOG_TARGET: &str = "rangekeeper::flash";

type FlashKey = (DocumentId, DecorationStyle);

/// Paints ranges and schedules their removal.
///
/// A zero delay clears synchronously, which is what headless runs and tests
/// use. Outside a Tokio runtime the clear is also synchronous.
pub struct FlashScheduler {
    painter: Arc<dyn DecorationPainter>,
    delay: Duration,
    pending: DashMap<FlashKey, AbortHandle>,
}

impl FlashScheduler {
    pub fn new(painter: Arc<dyn DecorationPainter>, delay: Duration) -> Self {
        Self {
            painter,
            delay,
            pending: DashMap::new(),
        }
    }

    /// Scheduler that paints and clears in the same call.
    pub fn immediate(painter: Arc<dyn DecorationPainter>) -> Self {
        Self::new(painter, Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Paint `ranges` in `style` and clear them once the delay has passed.
    pub fn flash(&self, style: DecorationStyle, document: &DocumentId, ranges: &[TextRange]) {
        // Opportunistic cleanup: finished clears leave their handle behind.
        const CLEANUP_THRESHOLD: usize = 32;
        if self.pending.len() > CLEANUP_THRESHOLD {
            self.pending.retain(|_, handle| !handle.is_finished());
        }

        let key = (document.clone(), style);
        if let Some((_, previous)) = self.pending.remove(&key) {
            previous.abort();
            log::trace!(
                target: LOG_TARGET,
                "Superseded pending {:?} clear for {}",
                style,
                document
            );
        }

        self.painter.paint_ranges(style, document, ranges);

        let runtime = tokio::runtime::Handle::try_current();
        let runtime = match runtime {
            Ok(runtime) if !self.delay.is_zero() => runtime,
            _ => {
                self.painter.clear_ranges(style, document);
                return;
            }
        };

        let painter = Arc::clone(&self.painter);
        let delay = self.delay;
        let document = document.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            log::trace!(
                target: LOG_TARGET,
                "Clearing {:?} on {} after {:?}",
                style,
                document,
                delay
            );
            painter.clear_ranges(style, &document);
        });

        self.pending.insert(key, task.abort_handle());
    }

    /// Drop every pending highlight of `document` right away.
    pub fn cancel(&self, document: &DocumentId) {
        let keys: Vec<FlashKey> = self
            .pending
            .iter()
            .filter(|entry| &entry.key().0 == document)
            .map(|entry| entry.key().clone())
            .collect();

        for key in keys {
            if let Some(((document, style), handle)) = self.pending.remove(&key) {
                handle.abort();
                self.painter.clear_ranges(style, &document);
            }
        }
    }

    /// Drop every pending highlight right away.
    pub fn cancel_all(&self) {
        let keys: Vec<FlashKey> = self.pending.iter().map(|entry| entry.key().clone()).collect();
        for key in keys {
            if let Some(((document, style), handle)) = self.pending.remove(&key) {
                handle.abort();
                self.painter.clear_ranges(style, &document);
            }
        }
        log::debug!(target: LOG_TARGET, "Cancelled all pending clears");
    }

    #[cfg(test)]
    pub(crate) fn has_pending(&self, document: &DocumentId, style: DecorationStyle) -> bool {
        self.pending.contains_key(&(document.clone(), style))
    }
}

impl Drop for FlashScheduler {
    fn drop(&mut self) {
        for entry in self.pending.iter() {
            entry.value().abort();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub(crate) enum PaintEvent {
        Paint(DecorationStyle, DocumentId, Vec<TextRange>),
        Clear(DecorationStyle, DocumentId),
    }

    /// Painter that records every call.
    #[derive(Default)]
    pub(crate) struct RecordingPainter {
        events: Mutex<Vec<PaintEvent>>,
    }

    impl RecordingPainter {
        pub(crate) fn events(&self) -> Vec<PaintEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl DecorationPainter for RecordingPainter {
        fn paint_ranges(&self, style: DecorationStyle, document: &DocumentId, ranges: &[TextRange]) {
            self.events.lock().unwrap().push(PaintEvent::Paint(
                style,
                document.clone(),
                ranges.to_vec(),
            ));
        }

        fn clear_ranges(&self, style: DecorationStyle, document: &DocumentId) {
            self.events
                .lock()
                .unwrap()
                .push(PaintEvent::Clear(style, document.clone()));
        }
    }

    fn doc(id: &str) -> DocumentId {
        DocumentId::new(id)
    }

    #[test]
    fn test_zero_delay_clears_synchronously() {
        let painter = Arc::new(RecordingPainter::default());
        let scheduler = FlashScheduler::immediate(painter.clone());

        scheduler.flash(DecorationStyle::JustAdded, &doc("a"), &[TextRange::new(0, 1)]);
        assert_eq!(
            painter.events(),
            vec![
                PaintEvent::Paint(DecorationStyle::JustAdded, doc("a"), vec![TextRange::new(0, 1)]),
                PaintEvent::Clear(DecorationStyle::JustAdded, doc("a")),
            ]
        );
        assert!(!scheduler.has_pending(&doc("a"), DecorationStyle::JustAdded));
    }

    #[test]
    fn test_without_runtime_clears_synchronously() {
        let painter = Arc::new(RecordingPainter::default());
        let scheduler = FlashScheduler::new(painter.clone(), Duration::from_secs(60));

        scheduler.flash(DecorationStyle::Referenced, &doc("a"), &[]);
        assert_eq!(painter.events().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_happens_after_delay() {
        let painter = Arc::new(RecordingPainter::default());
        let scheduler = FlashScheduler::new(painter.clone(), Duration::from_millis(20));

        scheduler.flash(DecorationStyle::JustAdded, &doc("a"), &[TextRange::new(1, 2)]);
        assert_eq!(painter.events().len(), 1);
        assert!(scheduler.has_pending(&doc("a"), DecorationStyle::JustAdded));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            painter.events().last(),
            Some(&PaintEvent::Clear(DecorationStyle::JustAdded, doc("a")))
        );
    }

    #[tokio::test]
    async fn test_reflash_supersedes_pending_clear() {
        let painter = Arc::new(RecordingPainter::default());
        let scheduler = FlashScheduler::new(painter.clone(), Duration::from_millis(50));

        scheduler.flash(DecorationStyle::JustAdded, &doc("a"), &[TextRange::new(0, 1)]);
        scheduler.flash(DecorationStyle::JustAdded, &doc("a"), &[TextRange::new(2, 3)]);
        tokio::time::sleep(Duration::from_millis(300)).await;

        let clears = painter
            .events()
            .iter()
            .filter(|event| matches!(event, PaintEvent::Clear(..)))
            .count();
        assert_eq!(clears, 1);
    }

    #[tokio::test]
    async fn test_cancel_clears_only_that_document() {
        let painter = Arc::new(RecordingPainter::default());
        let scheduler = FlashScheduler::new(painter.clone(), Duration::from_secs(10));

        scheduler.flash(DecorationStyle::JustAdded, &doc("a"), &[]);
        scheduler.flash(DecorationStyle::Referenced, &doc("a"), &[]);
        scheduler.flash(DecorationStyle::JustAdded, &doc("b"), &[]);

        scheduler.cancel(&doc("a"));
        assert!(!scheduler.has_pending(&doc("a"), DecorationStyle::JustAdded));
        assert!(!scheduler.has_pending(&doc("a"), DecorationStyle::Referenced));
        assert!(scheduler.has_pending(&doc("b"), DecorationStyle::JustAdded));

        scheduler.cancel_all();
        assert!(!scheduler.has_pending(&doc("b"), DecorationStyle::JustAdded));
        let clears = painter
            .events()
            .iter()
            .filter(|event| matches!(event, PaintEvent::Clear(..)))
            .count();
        assert_eq!(clears, 3);
    }
}
