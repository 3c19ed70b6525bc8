use ::std::fmt::Debug;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;
use ::std::num::NonZeroUsize;

/// Callback invoked at each yield point with the number of objects processed
/// so far. Hosts with a cooperative scheduler use it to cede control.
pub type Checkpoint<'a> = Box<dyn FnMut(usize) + 'a>;

/// Counts processed objects and calls the checkpoint every `objects_per_tick`
/// objects. Processing order never depends on whether a checkpoint fires.
pub(crate) struct Ticker<'a> {
    objects_per_tick: Option<NonZeroUsize>,
    processed: usize,
    checkpoint: Option<Checkpoint<'a>>,
}

impl Debug for Ticker<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Ticker")
            .field("objects_per_tick", &self.objects_per_tick)
            .field("processed", &self.processed)
            .field("checkpoint", &self.checkpoint.is_some())
            .finish()
    }
}

impl<'a> Ticker<'a> {
    pub(crate) fn new(
        objects_per_tick: Option<NonZeroUsize>,
        checkpoint: Option<Checkpoint<'a>>,
    ) -> Self {
        Self {
            objects_per_tick,
            processed: 0,
            checkpoint,
        }
    }

    /// Record `count` processed objects and report whether a yield point was
    /// reached.
    pub(crate) fn tick(&mut self, count: usize) -> bool {
        self.processed += count;
        let Some(objects_per_tick) = self.objects_per_tick else {
            return false;
        };
        if self.processed % objects_per_tick.get() != 0 {
            return false;
        }
        if let Some(checkpoint) = self.checkpoint.as_mut() {
            checkpoint(self.processed);
        }
        true
    }

    pub(crate) fn processed(&self) -> usize {
        self.processed
    }
}

#[cfg(test)]
mod tests {
    use ::std::cell::RefCell;

    use super::*;

    #[test]
    fn ticker_never_yields_without_threshold() {
        let mut ticker = Ticker::new(None, None);
        assert!(!(0..100).any(|_| ticker.tick(1)));
        assert_eq!(ticker.processed(), 100);
    }

    #[test]
    fn ticker_calls_checkpoint() {
        let calls = RefCell::new(Vec::new());
        let mut ticker = Ticker::new(
            NonZeroUsize::new(3),
            Some(Box::new(|processed| calls.borrow_mut().push(processed))),
        );
        for _ in 0..7 {
            ticker.tick(1);
        }
        drop(ticker);
        assert_eq!(calls.into_inner(), vec![3, 6]);
    }

    #[test]
    fn ticker_counts_batches() {
        let mut ticker = Ticker::new(NonZeroUsize::new(4), None);
        assert!(!ticker.tick(3));
        // 3 + 5 = 8 is a multiple of 4
        assert!(ticker.tick(5));
    }
}
