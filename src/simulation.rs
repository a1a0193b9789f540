use std::{cmp::Reverse, hash::BuildHasherDefault};

use ordered_float::NotNan;
use priority_queue::PriorityQueue;
use rustc_hash::FxHasher;

use crate::{
    quantities::{seconds, Float, Time},
    util::logging::Logger,
};

/// Identifies a process by the order it was registered with the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(usize);

/// A state machine resumed by the scheduler at computed wake times.
///
/// Suspension is data, not control flow: returning `Some(t)` from
/// [`Process::wake`] suspends the process until logical time `t`
/// (waiting a duration `d` means returning `Some(time + d)`), and
/// returning `None` leaves it suspended for the rest of the run.
/// Exactly one process body executes at any instant, so mutating the
/// shared state `S` needs no locking.
pub trait Process<S> {
    fn wake(&mut self, time: Time, shared: &mut S) -> Option<Time>;
}

/// Pending resume times, popped in time order. Equal times resume in
/// registration order, which keeps runs with a fixed seed reproducible.
#[derive(Debug)]
pub struct EventQueue {
    current_time: Time,
    #[allow(clippy::type_complexity)]
    queue: PriorityQueue<ProcessId, Reverse<(NotNan<Float>, ProcessId)>, BuildHasherDefault<FxHasher>>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> EventQueue {
        EventQueue {
            current_time: Time::MIN,
            queue: PriorityQueue::<_, _, BuildHasherDefault<FxHasher>>::with_default_hasher(),
        }
    }

    /// Schedules `id` to resume at `time`, replacing any pending resume,
    /// or cancels its pending resume when `time` is `None`.
    pub fn set(&mut self, id: ProcessId, time: Option<Time>) {
        if let Some(time) = time {
            assert!(time >= self.current_time);
            let t = NotNan::new((time - Time::SIM_START).seconds()).unwrap();
            self.queue.push(id, Reverse((t, id)));
        } else {
            self.queue.remove(&id);
        }
    }

    #[must_use]
    pub fn next_time(&self) -> Option<Time> {
        self.queue
            .peek()
            .map(|(_, Reverse((t, _)))| Time::from_sim_start(seconds(t.into_inner())))
    }

    pub fn pop_next(&mut self) -> Option<(Time, ProcessId)> {
        self.queue.pop().map(|(id, Reverse((t, _)))| {
            let time = Time::from_sim_start(seconds(t.into_inner()));
            self.current_time = time;
            (time, id)
        })
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs registered processes over logical time. There is no wall-clock
/// parallelism: concurrency is purely interleaved, one wake at a time.
pub struct Simulator<'a, S, L> {
    processes: Vec<Box<dyn Process<S> + 'a>>,
    shared: S,
    tick_queue: EventQueue,
    logger: L,
}

impl<'a, S, L> Simulator<'a, S, L>
where
    L: Logger,
{
    #[must_use]
    pub fn new(processes: Vec<Box<dyn Process<S> + 'a>>, shared: S, logger: L) -> Simulator<'a, S, L> {
        Simulator {
            processes,
            shared,
            tick_queue: EventQueue::new(),
            logger,
        }
    }

    fn wake(&mut self, id: ProcessId, time: Time) {
        let next = self.processes[id.0].wake(time, &mut self.shared);
        self.tick_queue.set(id, next);
    }

    fn start_all(&mut self) {
        for i in 0..self.processes.len() {
            self.wake(ProcessId(i), Time::SIM_START);
        }
    }

    /// Drives the clock until no process has a pending resume time at or
    /// before `horizon`, then returns the shared state for extraction.
    /// Processes whose next wake-up lies beyond the horizon are abandoned
    /// in their suspended state, not drained.
    pub fn run_until(mut self, horizon: Time) -> S {
        self.start_all();
        while let Some((time, id)) = self.tick_queue.pop_next() {
            if time > horizon {
                break;
            }
            log!(self.logger, "time = {}", time);
            self.wake(id, time);
        }
        self.shared
    }
}

#[cfg(test)]
mod tests {
    use super::{EventQueue, Process, ProcessId, Simulator};
    use crate::{
        quantities::{seconds, Float, Time, TimeSpan},
        util::logging::NothingLogger,
    };

    fn at(t: Float) -> Time {
        Time::from_sim_start(seconds(t))
    }

    #[test]
    fn pops_in_time_order() {
        let mut queue = EventQueue::new();
        queue.set(ProcessId(0), Some(at(3.)));
        queue.set(ProcessId(1), Some(at(1.)));
        queue.set(ProcessId(2), Some(at(2.)));
        assert_eq!(queue.pop_next(), Some((at(1.), ProcessId(1))));
        assert_eq!(queue.pop_next(), Some((at(2.), ProcessId(2))));
        assert_eq!(queue.pop_next(), Some((at(3.), ProcessId(0))));
        assert_eq!(queue.pop_next(), None);
    }

    #[test]
    fn equal_times_pop_in_registration_order() {
        let mut queue = EventQueue::new();
        // Scheduled out of order, but the registration index decides.
        queue.set(ProcessId(2), Some(at(5.)));
        queue.set(ProcessId(0), Some(at(5.)));
        queue.set(ProcessId(1), Some(at(5.)));
        assert_eq!(queue.pop_next(), Some((at(5.), ProcessId(0))));
        assert_eq!(queue.pop_next(), Some((at(5.), ProcessId(1))));
        assert_eq!(queue.pop_next(), Some((at(5.), ProcessId(2))));
    }

    #[test]
    fn reschedule_replaces_pending_resume() {
        let mut queue = EventQueue::new();
        queue.set(ProcessId(0), Some(at(5.)));
        queue.set(ProcessId(0), Some(at(1.)));
        assert_eq!(queue.pop_next(), Some((at(1.), ProcessId(0))));
        assert_eq!(queue.pop_next(), None);
    }

    #[test]
    fn cancel_removes_pending_resume() {
        let mut queue = EventQueue::new();
        queue.set(ProcessId(0), Some(at(5.)));
        queue.set(ProcessId(0), None);
        assert_eq!(queue.next_time(), None);
        assert_eq!(queue.pop_next(), None);
    }

    struct Beacon {
        label: char,
        period: TimeSpan,
    }

    impl Process<Vec<(char, Time)>> for Beacon {
        fn wake(&mut self, time: Time, trace: &mut Vec<(char, Time)>) -> Option<Time> {
            trace.push((self.label, time));
            Some(time + self.period)
        }
    }

    #[test]
    fn equal_time_wakes_interleave_in_registration_order() {
        let processes: Vec<Box<dyn Process<Vec<(char, Time)>>>> = vec![
            Box::new(Beacon {
                label: 'a',
                period: seconds(1.),
            }),
            Box::new(Beacon {
                label: 'b',
                period: seconds(1.),
            }),
        ];
        let trace = Simulator::new(processes, Vec::new(), NothingLogger::new()).run_until(at(2.));
        assert_eq!(
            trace,
            vec![
                ('a', at(0.)),
                ('b', at(0.)),
                ('a', at(1.)),
                ('b', at(1.)),
                ('a', at(2.)),
                ('b', at(2.)),
            ]
        );
    }

    #[test]
    fn wakes_at_the_horizon_still_run() {
        let processes: Vec<Box<dyn Process<Vec<(char, Time)>>>> = vec![Box::new(Beacon {
            label: 'a',
            period: seconds(1.),
        })];
        let trace = Simulator::new(processes, Vec::new(), NothingLogger::new()).run_until(at(3.));
        assert_eq!(trace.len(), 4); // t = 0, 1, 2, 3
    }

    #[test]
    fn wakes_beyond_the_horizon_are_abandoned() {
        let processes: Vec<Box<dyn Process<Vec<(char, Time)>>>> = vec![Box::new(Beacon {
            label: 'a',
            period: seconds(10.),
        })];
        let trace = Simulator::new(processes, Vec::new(), NothingLogger::new()).run_until(at(25.));
        assert_eq!(
            trace,
            vec![('a', at(0.)), ('a', at(10.)), ('a', at(20.))]
        );
    }
}
