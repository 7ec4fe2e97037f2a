use chrono::NaiveDate;
use egui::{Pos2, Rect};

/// Date-tagged screen rectangles registered by the renderer each frame.
///
/// Used to resolve which date column lies under the pointer while a drag is
/// extending the selection.
#[derive(Debug, Clone, Default)]
pub struct DateHitMap {
    cells: Vec<(Rect, NaiveDate)>,
}

impl DateHitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all rectangles, typically at the start of a frame.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn register(&mut self, rect: Rect, date: NaiveDate) {
        self.cells.push((rect, date));
    }

    /// Date of the topmost (last registered) rectangle containing `pos`.
    pub fn resolve(&self, pos: Pos2) -> Option<NaiveDate> {
        self.cells
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, date)| *date)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_resolve_hits_and_misses() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let tuesday = monday.succ_opt().unwrap();

        let mut map = DateHitMap::new();
        map.register(Rect::from_min_max(pos2(0.0, 0.0), pos2(40.0, 300.0)), monday);
        map.register(Rect::from_min_max(pos2(40.0, 0.0), pos2(80.0, 300.0)), tuesday);

        assert_eq!(map.resolve(pos2(10.0, 10.0)), Some(monday));
        assert_eq!(map.resolve(pos2(60.0, 200.0)), Some(tuesday));
        assert_eq!(map.resolve(pos2(500.0, 10.0)), None);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.resolve(pos2(10.0, 10.0)), None);
    }
}
