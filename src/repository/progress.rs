use log::info;

/// Track progress of a concurrent query batch
pub struct BatchProgress {
    label: String,
    total: usize,
    succeeded: usize,
    failed: usize,
}

impl BatchProgress {
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        Self {
            label: label.into(),
            total,
            succeeded: 0,
            failed: 0,
        }
    }

    pub fn record(&mut self, ok: bool) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.log_progress();
    }

    pub fn current_count(&self) -> usize {
        self.succeeded + self.failed
    }

    fn log_progress(&self) {
        let current = self.current_count();
        if should_log(current, self.total) {
            info!(
                "  → {}: {}/{} ({} ok, {} failed)",
                self.label, current, self.total, self.succeeded, self.failed
            );
        }
    }
}

fn should_log(current: usize, total: usize) -> bool {
    is_milestone(current) || is_complete(current, total)
}

fn is_milestone(count: usize) -> bool {
    count % 10 == 0
}

fn is_complete(current: usize, total: usize) -> bool {
    current == total
}
