//! Outward alternating traversal of an index range.

/// Visits `0..len` starting at `start` and alternating outwards:
/// `start, start+1, start-1, start+2, start-2, ...`.
///
/// Out-of-range positions are skipped, so every index is yielded exactly
/// once. A `start` past the end is clamped to the last index.
#[derive(Debug, Clone)]
pub(crate) struct Zigzag {
    start: usize,
    len: usize,
    step: usize,
    emitted: usize,
}

impl Zigzag {
    pub(crate) fn new(start: usize, len: usize) -> Self {
        Self {
            start: start.min(len.saturating_sub(1)),
            len,
            step: 0,
            emitted: 0,
        }
    }
}

impl Iterator for Zigzag {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.emitted < self.len {
            let step = self.step;
            self.step += 1;
            let candidate = if step == 0 {
                Some(self.start)
            } else if step % 2 == 1 {
                self.start.checked_add(step.div_ceil(2))
            } else {
                self.start.checked_sub(step / 2)
            };
            if let Some(i) = candidate.filter(|&i| i < self.len) {
                self.emitted += 1;
                return Some(i);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.emitted;
        (remaining, Some(remaining))
    }
}
