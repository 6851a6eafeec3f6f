use std::cmp::Ordering;
use std::collections::VecDeque;

use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashSet;

use super::state::Pid;

/// Container of admitted, unfinished processes that yields the next one to
/// run under the owning policy's ordering.
pub trait WaitingSet {
    fn pop_next(&mut self) -> Option<Pid>;

    fn contains(&self, pid: Pid) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insertion-ordered list that is explicitly re-sorted (stable) whenever the
/// owner mutates the keys it sorts by.
#[derive(Debug, Default)]
pub struct ResortableList {
    pids: Vec<Pid>,
}

impl ResortableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pid: Pid) {
        assert!(!self.contains(pid), "Process {pid} already waiting");
        self.pids.push(pid);
    }

    /// Stable sort: equal keys keep their previous relative order.
    pub fn resort_by_key<K: Ord>(&mut self, mut key: impl FnMut(Pid) -> K) {
        self.pids.sort_by_key(|&pid| key(pid));
    }

    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.pids.iter().copied()
    }
}

impl WaitingSet for ResortableList {
    fn pop_next(&mut self) -> Option<Pid> {
        if self.pids.is_empty() {
            None
        } else {
            Some(self.pids.remove(0))
        }
    }

    fn contains(&self, pid: Pid) -> bool {
        self.pids.contains(&pid)
    }

    fn len(&self) -> usize {
        self.pids.len()
    }
}

// KeyedPriorityQueue is a max-heap, so flip the key's Ord to surface the minimum
#[derive(Debug, PartialEq, Eq)]
struct MinFirst<K>(K);

impl<K: Ord> PartialOrd for MinFirst<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for MinFirst<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0)
    }
}

/// Binary min-heap of processes keyed by `K`.
///
/// Equal keys pop in unspecified order; callers that need determinism fold a
/// sequence number into `K`.
#[derive(Debug)]
pub struct KeyedHeap<K: Ord> {
    heap: KeyedPriorityQueue<Pid, MinFirst<K>>,
}

impl<K: Ord> KeyedHeap<K> {
    pub fn new() -> Self {
        Self {
            heap: KeyedPriorityQueue::new(),
        }
    }

    pub fn push(&mut self, pid: Pid, key: K) {
        let previous = self.heap.push(pid, MinFirst(key));
        assert!(previous.is_none(), "Process {pid} already present in heap");
    }
}

impl<K: Ord> Default for KeyedHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> WaitingSet for KeyedHeap<K> {
    fn pop_next(&mut self) -> Option<Pid> {
        self.heap.pop().map(|(pid, _)| pid)
    }

    fn contains(&self, pid: Pid) -> bool {
        self.heap.get_priority(&pid).is_some()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// FIFO ring; a preempted process goes to the tail of the current queue.
#[derive(Debug, Default)]
pub struct RequeueRing {
    queue: VecDeque<Pid>,
    members: FxHashSet<Pid>,
}

impl RequeueRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, pid: Pid) {
        assert!(self.members.insert(pid), "Process {pid} already queued");
        self.queue.push_back(pid);
    }

    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.queue.iter().copied()
    }
}

impl WaitingSet for RequeueRing {
    fn pop_next(&mut self) -> Option<Pid> {
        let pid = self.queue.pop_front()?;
        let removed = self.members.remove(&pid);
        debug_assert!(removed, "Process {pid} missing ring membership");
        Some(pid)
    }

    fn contains(&self, pid: Pid) -> bool {
        self.members.contains(&pid)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
