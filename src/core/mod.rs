pub mod driver;
pub mod event;
pub mod observer;
pub mod state;
pub mod waitset;

pub use driver::SchedCore;
pub use event::{SimEvent, Trace, TraceEntry};
pub use state::{Pid, Priority, Process, ProcessId, ProcessState, SimCtx, Ticks};
pub use waitset::{KeyedHeap, RequeueRing, ResortableList, WaitingSet};
