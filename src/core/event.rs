use crate::core::{ProcessId, Ticks};

/// One contiguous run segment of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    pub process: ProcessId,
    pub start: Ticks,
    pub duration: Ticks,
    pub end: Ticks,
    /// Quantum granted at dispatch (round robin only)
    pub slice: Option<Ticks>,
}

/// Ordered execution trace. Back-to-back unsliced runs of the same process
/// collapse into one segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn push(&mut self, entry: TraceEntry) {
        debug_assert_eq!(entry.end, entry.start + entry.duration);
        if let Some(last) = self.entries.last_mut() {
            debug_assert!(last.end <= entry.start, "Trace segments must not overlap");
            if last.process == entry.process
                && last.end == entry.start
                && last.slice.is_none()
                && entry.slice.is_none()
            {
                last.duration += entry.duration;
                last.end = entry.end;
                return;
            }
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of durations across every segment of `process`.
    pub fn time_for(&self, process: ProcessId) -> Ticks {
        self.entries
            .iter()
            .filter(|e| e.process == process)
            .map(|e| e.duration)
            .sum()
    }

    pub fn end(&self) -> Ticks {
        self.entries.last().map_or(0, |e| e.end)
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Ran {
        process: ProcessId,
        start: Ticks,
        ticks: Ticks,
        completed: bool,
    },
    // Nothing ready even after admitting arrivals
    Idle {
        at: Ticks,
        ticks: Ticks,
    },
    Finished {
        at: Ticks,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: u32, start: Ticks, duration: Ticks, slice: Option<Ticks>) -> TraceEntry {
        TraceEntry {
            process: ProcessId(id),
            start,
            duration,
            end: start + duration,
            slice,
        }
    }

    #[test]
    fn unit_ticks_of_one_process_merge() {
        let mut trace = Trace::default();
        trace.push(seg(1, 0, 1, None));
        trace.push(seg(1, 1, 1, None));
        trace.push(seg(2, 2, 1, None));
        trace.push(seg(1, 3, 1, None));

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.entries()[0], seg(1, 0, 2, None));
        assert_eq!(trace.time_for(ProcessId(1)), 3);
        assert_eq!(trace.end(), 4);
    }

    #[test]
    fn sliced_segments_stay_separate() {
        let mut trace = Trace::default();
        trace.push(seg(1, 0, 5, Some(5)));
        trace.push(seg(1, 5, 5, Some(5)));
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn gap_prevents_merge() {
        let mut trace = Trace::default();
        trace.push(seg(1, 0, 1, None));
        trace.push(seg(1, 3, 1, None));
        assert_eq!(trace.len(), 2);
    }
}
