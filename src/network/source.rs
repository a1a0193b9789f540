
use crate::{
    quantities::{seconds, Float, Time, TimeSpan},
    simulation::Process,
    util::{
        logging::Logger,
        rand::{ContinuousDistribution, DiscreteDistribution, Rng},
    },
};

use super::{Network, Packet};

/// Ethernet frame sizes, 64 to 1500 bytes inclusive.
const FRAME_SIZES: DiscreteDistribution<u32> = DiscreteDistribution::Uniform { min: 64, max: 1501 };

#[derive(Debug)]
enum Phase {
    /// Not yet scheduled the first inter-arrival wait.
    Start,
    /// Waiting out the stochastic inter-arrival interval.
    InterArrival,
    /// Waiting out the fixed network latency.
    NetworkDelay,
}

/// One traffic endpoint: waits a stochastically drawn inter-arrival
/// interval, then the fixed network latency, then stamps a packet with
/// the current time and attempts admission at its primary switch.
/// Never terminates on its own; the horizon is the only stop.
#[derive(Debug)]
pub struct TrafficSource<L> {
    source: usize,
    name: String,
    primary: usize,
    interval: ContinuousDistribution<Float>,
    latency: TimeSpan,
    next_seq: u64,
    phase: Phase,
    rng: Rng,
    logger: L,
}

impl<L> TrafficSource<L> {
    #[must_use]
    pub fn new(
        source: usize,
        name: String,
        primary: usize,
        interval: ContinuousDistribution<Float>,
        latency: TimeSpan,
        rng: Rng,
        logger: L,
    ) -> TrafficSource<L> {
        TrafficSource {
            source,
            name,
            primary,
            interval,
            latency,
            next_seq: 0,
            phase: Phase::Start,
            rng,
            logger,
        }
    }
}

impl<L> Process<Network> for TrafficSource<L>
where
    L: Logger,
{
    fn wake(&mut self, time: Time, net: &mut Network) -> Option<Time> {
        match self.phase {
            Phase::Start => {
                self.phase = Phase::InterArrival;
                Some(time + seconds(self.rng.sample(&self.interval)))
            }
            Phase::InterArrival => {
                self.phase = Phase::NetworkDelay;
                Some(time + self.latency)
            }
            Phase::NetworkDelay => {
                let packet = Packet {
                    seq: self.next_seq,
                    source: self.source,
                    size: self.rng.sample(&FRAME_SIZES),
                    arrival_time: time,
                };
                self.next_seq += 1;
                log!(self.logger, "{} sends packet {} to SW{}", self.name, packet.seq, self.primary);
                net.admit(self.primary, packet);
                self.phase = Phase::InterArrival;
                Some(time + seconds(self.rng.sample(&self.interval)))
            }
        }
    }
}
