// ============================================
// History - Пары current/previous между кадрами
// ============================================
// Роли меняются местами, данные не копируются.

use std::collections::HashSet;

/// Пара буферов с явным swap()
#[derive(Debug)]
pub struct PingPong<T> {
    pair: [T; 2],
    current: usize,
}

impl<T> PingPong<T> {
    pub fn new(first: T, second: T) -> Self {
        Self {
            pair: [first, second],
            current: 0,
        }
    }

    /// Куда пишем в этом кадре
    pub fn current(&self) -> &T {
        &self.pair[self.current]
    }

    /// Что записано кадром раньше
    pub fn previous(&self) -> &T {
        &self.pair[1 - self.current]
    }

    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }
}

/// Какая именно временная история
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    /// Линейная глубина в половинном разрешении
    HalfDepth,
    /// Накопленный AO
    AmbientOcclusion,
    /// Цвет для TAA
    TaaColor,
    /// Полная глубина
    FullDepth,
    /// Результат SMAA для T2x resolve
    SmaaColor,
}

/// Все пары истории рендерера
#[derive(Debug)]
pub struct HistoryBuffers<T> {
    pub half_depth: PingPong<T>,
    pub ambient_occlusion: PingPong<T>,
    pub taa_color: PingPong<T>,
    pub full_depth: PingPong<T>,
    pub smaa_color: PingPong<T>,
}

impl<T> HistoryBuffers<T> {
    pub fn swap(&mut self, kind: HistoryKind) {
        match kind {
            HistoryKind::HalfDepth => self.half_depth.swap(),
            HistoryKind::AmbientOcclusion => self.ambient_occlusion.swap(),
            HistoryKind::TaaColor => self.taa_color.swap(),
            HistoryKind::FullDepth => self.full_depth.swap(),
            HistoryKind::SmaaColor => self.smaa_color.swap(),
        }
    }
}

/// Какие истории записаны прошлым кадром.
/// Если эффект был выключен, в previous лежат старые данные.
#[derive(Debug, Default)]
pub struct HistoryValidity {
    written: HashSet<HistoryKind>,
}

impl HistoryValidity {
    pub fn is_valid(&self, kind: HistoryKind) -> bool {
        self.written.contains(&kind)
    }

    /// Кадр отрисован: валидны ровно те истории, которые он записал
    pub fn advance(&mut self, swapped: impl IntoIterator<Item = HistoryKind>) {
        self.written = swapped.into_iter().collect();
    }

    pub fn invalidate_all(&mut self) {
        self.written.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> HistoryBuffers<u32> {
        HistoryBuffers {
            half_depth: PingPong::new(1, 2),
            ambient_occlusion: PingPong::new(3, 4),
            taa_color: PingPong::new(5, 6),
            full_depth: PingPong::new(7, 8),
            smaa_color: PingPong::new(9, 10),
        }
    }

    #[test]
    fn test_previous_is_last_frames_current() {
        let mut pair = PingPong::new("a", "b");
        for _ in 0..17 {
            let written = *pair.current();
            pair.swap();
            assert_eq!(*pair.previous(), written);
            assert_ne!(*pair.current(), written);
        }
    }

    #[test]
    fn test_double_swap_is_identity() {
        let mut pair = PingPong::new(10, 20);
        pair.swap();
        pair.swap();
        assert_eq!(*pair.current(), 10);
        assert_eq!(*pair.previous(), 20);
    }

    #[test]
    fn test_even_swaps_restore_assignment() {
        let mut pair = PingPong::new(1, 2);
        for n in 1..=10 {
            pair.swap();
            let expected = if n % 2 == 0 { 1 } else { 2 };
            assert_eq!(*pair.current(), expected);
        }
    }

    #[test]
    fn test_swaps_are_independent_per_kind() {
        let mut history = ids();
        history.swap(HistoryKind::AmbientOcclusion);
        assert_eq!(*history.ambient_occlusion.current(), 4);
        assert_eq!(*history.half_depth.current(), 1);
        assert_eq!(*history.taa_color.current(), 5);
        assert_eq!(*history.full_depth.current(), 7);
        assert_eq!(*history.smaa_color.current(), 9);
    }

    #[test]
    fn test_nothing_is_valid_before_first_frame() {
        let validity = HistoryValidity::default();
        assert!(!validity.is_valid(HistoryKind::TaaColor));
        assert!(!validity.is_valid(HistoryKind::AmbientOcclusion));
    }

    #[test]
    fn test_skipped_frame_invalidates_history() {
        let mut validity = HistoryValidity::default();
        validity.advance([HistoryKind::TaaColor, HistoryKind::FullDepth]);
        assert!(validity.is_valid(HistoryKind::TaaColor));

        // Кадр без TAA: previous больше не соответствует прошлому кадру
        validity.advance([]);
        assert!(!validity.is_valid(HistoryKind::TaaColor));

        validity.advance([HistoryKind::TaaColor]);
        assert!(validity.is_valid(HistoryKind::TaaColor));
        assert!(!validity.is_valid(HistoryKind::FullDepth));
    }

    #[test]
    fn test_invalidate_all_after_resize() {
        let mut validity = HistoryValidity::default();
        validity.advance([HistoryKind::HalfDepth, HistoryKind::AmbientOcclusion]);
        validity.invalidate_all();
        assert!(!validity.is_valid(HistoryKind::HalfDepth));
        assert!(!validity.is_valid(HistoryKind::AmbientOcclusion));
    }
}
