//! Incremental "load more" pagination over an in-memory row set.
//!
//! Loading more is a two-step operation so the host can show a busy state
//! between the two halves: [`Paginator::begin_load_more`] hands out a
//! [`LoadTicket`] and [`Paginator::finish_load_more`] applies it. Only the
//! ticket that is currently pending can grow the visible count, so a second
//! request while one is outstanding is a no-op and a ticket issued before a
//! [`Paginator::reset`] is ignored.

/// Rows visible right after the filtered set changes.
pub const BASELINE_VISIBLE: usize = 20;
/// Rows added by each load-more.
pub const LOAD_MORE_STEP: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub struct Paginator {
    visible_count: usize,
    pending: Option<LoadTicket>,
    issued: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            visible_count: BASELINE_VISIBLE,
            pending: None,
            issued: 0,
        }
    }
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the baseline; any outstanding load-more is dropped.
    pub fn reset(&mut self) {
        self.visible_count = BASELINE_VISIBLE;
        self.pending = None;
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn visible_len(&self, total: usize) -> usize {
        self.visible_count.min(total)
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[..self.visible_len(rows.len())]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible_count < total
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn begin_load_more(&mut self, total: usize) -> Option<LoadTicket> {
        if self.pending.is_some() || !self.has_more(total) {
            return None;
        }
        self.issued += 1;
        let ticket = LoadTicket(self.issued);
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Applies `ticket` if it is the pending one. Returns whether the visible
    /// count grew.
    pub fn finish_load_more(&mut self, ticket: LoadTicket) -> bool {
        if self.pending != Some(ticket) {
            tracing::debug!("ignoring stale load-more ticket {ticket:?}");
            return false;
        }
        self.pending = None;
        self.visible_count += LOAD_MORE_STEP;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_shows_at_most_the_baseline() {
        let mut paginator = Paginator::new();
        paginator.reset();
        assert_eq!(paginator.visible_len(7), 7);
        assert_eq!(paginator.visible_len(20), 20);
        assert_eq!(paginator.visible_len(95), 20);

        let rows: Vec<u32> = (0..50).collect();
        assert_eq!(paginator.slice(&rows), &rows[..20]);
    }

    #[test]
    fn load_more_adds_one_step() {
        let mut paginator = Paginator::new();
        let ticket = paginator.begin_load_more(45).unwrap();
        assert!(paginator.is_busy());
        assert!(paginator.finish_load_more(ticket));
        assert!(!paginator.is_busy());
        assert_eq!(paginator.visible_count(), 30);
    }

    #[test]
    fn nothing_to_load_when_everything_is_visible() {
        let mut paginator = Paginator::new();
        assert!(paginator.begin_load_more(20).is_none());
        assert!(paginator.begin_load_more(3).is_none());
        assert!(!paginator.is_busy());
    }

    #[test]
    fn second_request_while_pending_is_a_no_op() {
        let mut paginator = Paginator::new();
        let first = paginator.begin_load_more(100).unwrap();
        assert!(paginator.begin_load_more(100).is_none());

        assert!(paginator.finish_load_more(first));
        assert!(!paginator.finish_load_more(first));
        assert_eq!(paginator.visible_count(), 30);
    }

    #[test]
    fn ticket_from_before_reset_is_ignored() {
        let mut paginator = Paginator::new();
        let old = paginator.begin_load_more(100).unwrap();
        paginator.reset();
        assert!(!paginator.is_busy());

        let fresh = paginator.begin_load_more(100).unwrap();
        assert!(!paginator.finish_load_more(old));
        assert!(paginator.is_busy());
        assert!(paginator.finish_load_more(fresh));
        assert_eq!(paginator.visible_count(), 30);
    }

    #[test]
    fn visible_rows_never_exceed_total_nor_shrink() {
        let total = 37;
        let mut paginator = Paginator::new();
        let mut last = paginator.visible_len(total);
        for _ in 0..10 {
            if let Some(ticket) = paginator.begin_load_more(total) {
                paginator.finish_load_more(ticket);
            }
            let now = paginator.visible_len(total);
            assert!(now >= last);
            assert!(now <= total);
            last = now;
        }
        assert_eq!(last, total);
    }
}
