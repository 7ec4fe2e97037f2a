// Drag selection session
//
// A press on a date column opens a session anchored at that date. The
// session arms once the pointer has moved past a threshold; until then the
// release is treated as a click.

use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveDate;
use egui::Pos2;

use crate::utils::date::DateSpan;

/// Pointer displacement after which a press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// How long a click following a drag release is ignored.
pub const CLICK_SUPPRESSION: Duration = Duration::from_millis(100);

/// Live pointer-down..pointer-up session.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub anchor_date: NaiveDate,
    pub current_date: NaiveDate,
    pub armed: bool,
    pub anchor_pointer: Pos2,
}

impl DragSession {
    pub fn begin(anchor_date: NaiveDate, anchor_pointer: Pos2) -> Self {
        Self {
            anchor_date,
            current_date: anchor_date,
            armed: false,
            anchor_pointer,
        }
    }

    /// Next session after the pointer moved to `pointer`.
    ///
    /// Arms once the straight-line distance from the anchor exceeds
    /// `threshold`. While armed, `hovered` replaces the current date; `None`
    /// (pointer outside the grid) keeps the last resolved date.
    pub fn moved(&self, pointer: Pos2, hovered: Option<NaiveDate>, threshold: f32) -> Self {
        let mut next = self.clone();
        if !next.armed && pointer.distance(self.anchor_pointer) > threshold {
            next.armed = true;
        }
        if next.armed {
            if let Some(date) = hovered {
                next.current_date = date;
            }
        }
        next
    }

    /// Inclusive span between anchor and current date, in either direction.
    pub fn span(&self) -> DateSpan {
        DateSpan::between(self.anchor_date, self.current_date)
    }
}

/// Viewport-wide pointer listeners the renderer installs for drag tracking.
///
/// They must only be attached while a drag session is open.
pub trait ViewportListeners {
    fn attach_drag_listeners(&self);
    fn detach_drag_listeners(&self);
}

/// Listeners for renderers that poll pointer state every frame and need no
/// global hooks.
#[derive(Debug, Default)]
pub struct PolledPointer;

impl ViewportListeners for PolledPointer {
    fn attach_drag_listeners(&self) {}
    fn detach_drag_listeners(&self) {}
}

/// Holds viewport listeners attached for the lifetime of a drag session.
/// Dropping the guard detaches them, whichever way the session ends.
pub struct DragListenerGuard {
    listeners: Rc<dyn ViewportListeners>,
}

impl DragListenerGuard {
    pub fn acquire(listeners: Rc<dyn ViewportListeners>) -> Self {
        listeners.attach_drag_listeners();
        log::debug!("Drag listeners attached");
        Self { listeners }
    }
}

impl Drop for DragListenerGuard {
    fn drop(&mut self) {
        self.listeners.detach_drag_listeners();
        log::debug!("Drag listeners detached");
    }
}

impl std::fmt::Debug for DragListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DragListenerGuard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;
    use std::cell::Cell;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[derive(Default)]
    struct CountingListeners {
        attached: Cell<i32>,
    }

    impl ViewportListeners for CountingListeners {
        fn attach_drag_listeners(&self) {
            self.attached.set(self.attached.get() + 1);
        }
        fn detach_drag_listeners(&self) {
            self.attached.set(self.attached.get() - 1);
        }
    }

    #[test]
    fn test_arms_only_past_threshold() {
        let session = DragSession::begin(d(3), pos2(100.0, 100.0));

        let small = session.moved(pos2(103.0, 104.0), Some(d(4)), DRAG_THRESHOLD);
        assert!(!small.armed, "distance of exactly 5 must not arm");
        assert_eq!(small.current_date, d(3));

        let far = small.moved(pos2(104.0, 104.0), Some(d(4)), DRAG_THRESHOLD);
        assert!(far.armed);
        assert_eq!(far.current_date, d(4));
    }

    #[test]
    fn test_unresolvable_position_keeps_last_date() {
        let session = DragSession::begin(d(3), pos2(0.0, 0.0))
            .moved(pos2(50.0, 0.0), Some(d(6)), DRAG_THRESHOLD)
            .moved(pos2(900.0, 0.0), None, DRAG_THRESHOLD);
        assert_eq!(session.current_date, d(6));
    }

    #[test]
    fn test_span_is_order_independent() {
        let session = DragSession::begin(d(9), pos2(0.0, 0.0)).moved(pos2(-50.0, 0.0), Some(d(4)), 5.0);
        assert_eq!(session.span(), DateSpan::new(d(4), d(9)).unwrap());
    }

    #[test]
    fn test_guard_detaches_on_drop() {
        let listeners = Rc::new(CountingListeners::default());
        {
            let _guard = DragListenerGuard::acquire(listeners.clone());
            assert_eq!(listeners.attached.get(), 1);
        }
        assert_eq!(listeners.attached.get(), 0);
    }
}
