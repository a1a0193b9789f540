use std::collections::VecDeque;


use crate::{
    quantities::{seconds, Time, TimeSpan},
    simulation::Process,
    util::logging::Logger,
};

use super::{Network, Packet};

/// How long an idle server waits before rechecking its queue. A tuning
/// constant, not a correctness-relevant value.
const IDLE_POLL: TimeSpan = seconds(0.1);

/// A bounded FIFO queue plus the counters external reporting reads.
#[derive(Debug)]
pub struct Switch {
    capacity: usize,
    queue: VecDeque<Packet>,
    /// Overflow peer. A non-owning link, used for admission only.
    pub(crate) secondary: Option<usize>,
    /// Next hop after service, when the forwarding variant is enabled.
    pub(crate) forward_to: Option<usize>,
    pub(crate) dropped_count: u64,
    pub(crate) forwarded_count: u64,
    pub(crate) wait_times: Vec<TimeSpan>,
    pub(crate) latencies: Vec<(Time, TimeSpan)>,
}

impl Switch {
    #[must_use]
    pub fn new(capacity: usize, secondary: Option<usize>) -> Switch {
        Switch {
            capacity,
            queue: VecDeque::new(),
            secondary,
            forward_to: None,
            dropped_count: 0,
            forwarded_count: 0,
            wait_times: Vec::new(),
            latencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn has_space(&self) -> bool {
        self.queue.len() < self.capacity
    }

    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }

    pub(crate) fn seat(&mut self, packet: Packet) {
        debug_assert!(self.has_space());
        self.queue.push_back(packet);
    }

    pub(crate) fn count_drop(&mut self) {
        self.dropped_count += 1;
    }

    /// Removes the head packet and records how long it queued.
    pub(crate) fn begin_service(&mut self, time: Time) -> Option<Packet> {
        let packet = self.queue.pop_front()?;
        self.wait_times.push(time - packet.arrival_time);
        Some(packet)
    }

    pub(crate) fn record_handoff(&mut self, time: Time, latency: TimeSpan) {
        self.forwarded_count += 1;
        self.latencies.push((time, latency));
    }
}

#[derive(Debug)]
enum ServiceState {
    Idle,
    Serving(Packet),
}

/// Single-server dequeue loop for one switch: at most one packet is in
/// service at a time, and each occupies the server for the fixed
/// service time.
#[derive(Debug)]
pub struct SwitchWorker<L> {
    switch: usize,
    service_time: TimeSpan,
    state: ServiceState,
    logger: L,
}

impl<L> SwitchWorker<L> {
    #[must_use]
    pub fn new(switch: usize, service_time: TimeSpan, logger: L) -> SwitchWorker<L> {
        SwitchWorker {
            switch,
            service_time,
            state: ServiceState::Idle,
            logger,
        }
    }
}

impl<L> SwitchWorker<L>
where
    L: Logger,
{
    fn finish(&mut self, packet: Packet, time: Time, net: &mut Network) {
        let Some(next) = net.switches()[self.switch].forward_to else {
            // No forwarding hop configured: service consumed the packet.
            return;
        };
        net.switch_mut(self.switch)
            .record_handoff(time, time - packet.arrival_time);
        match net.offer(next, packet) {
            Ok(()) => log!(self.logger, "SW{} forwarded a packet to SW{}", self.switch, next),
            Err(packet) => {
                log!(self.logger, "SW{} hand-off refused, requeueing", self.switch);
                net.return_to(self.switch, packet);
            }
        }
    }
}

impl<L> Process<Network> for SwitchWorker<L>
where
    L: Logger,
{
    fn wake(&mut self, time: Time, net: &mut Network) -> Option<Time> {
        match std::mem::replace(&mut self.state, ServiceState::Idle) {
            ServiceState::Idle => match net.switch_mut(self.switch).begin_service(time) {
                Some(packet) => {
                    log!(
                        self.logger,
                        "SW{} serving packet {}/{}",
                        self.switch,
                        packet.source,
                        packet.seq
                    );
                    self.state = ServiceState::Serving(packet);
                    Some(time + self.service_time)
                }
                None => Some(time + IDLE_POLL),
            },
            ServiceState::Serving(packet) => {
                self.finish(packet, time, net);
                // The next packet's service may begin immediately.
                Some(time)
            }
        }
    }
}
