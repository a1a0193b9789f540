use serde::{Deserialize, Serialize};

use crate::{
    config::SimulationConfig,
    quantities::Time,
    util::rand::{ContinuousDistribution, Rng},
};

pub mod sampler;
pub mod source;
pub mod switch;

use self::sampler::SampleLog;
pub use self::switch::Switch;

/// The topology is fixed: two switches, each the other's overflow peer.
pub const NUM_SWITCHES: usize = 2;

/// A unit of traffic. Stamped once at creation, never mutated, and
/// consumed when the switch serving it completes its service time.
#[derive(Debug)]
pub struct Packet {
    pub seq: u64,
    pub source: usize,
    /// Frame size in bytes. Carried for reporting only.
    pub size: u32,
    pub arrival_time: Time,
}

/// Which switch is charged when a packet finds both switches full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Charge one of the two switches uniformly at random.
    #[default]
    Random,
    /// Always charge the switch admission was first attempted at.
    FirstSwitch,
}

/// The shared state every process wakes against: the switches plus the
/// series the sampler fills in. Owned by the simulator for the lifetime
/// of a run and dismantled for extraction afterwards.
#[derive(Debug)]
pub struct Network {
    switches: Vec<Switch>,
    tie_break: TieBreak,
    rng: Rng,
    pub(crate) samples: SampleLog,
}

impl Network {
    #[must_use]
    pub fn new(config: &SimulationConfig, rng: Rng) -> Network {
        let mut switches: Vec<Switch> = (0..NUM_SWITCHES)
            .map(|id| {
                let secondary = config.spillover.then_some((id + 1) % NUM_SWITCHES);
                Switch::new(config.queue_capacity, secondary)
            })
            .collect();
        if config.forward_hop {
            switches[0].forward_to = Some(1);
        }
        Network {
            samples: SampleLog::new(switches.len()),
            switches,
            tie_break: config.tie_break,
            rng,
        }
    }

    #[must_use]
    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    pub(crate) fn switch_mut(&mut self, id: usize) -> &mut Switch {
        &mut self.switches[id]
    }

    /// Admission control. Never fails: a packet that cannot be seated
    /// anywhere increments a drop counter instead, since a full queue is
    /// an expected steady-state condition rather than a fault.
    pub fn admit(&mut self, primary: usize, packet: Packet) {
        if self.switches[primary].has_space() {
            self.switches[primary].seat(packet);
            return;
        }
        let secondary = self.switches[primary].secondary;
        if let Some(s) = secondary {
            if self.switches[s].has_space() {
                // One bounce only: the secondary gets no further fallback.
                self.switches[s].seat(packet);
                return;
            }
        }
        let charged = match (self.tie_break, secondary) {
            (TieBreak::Random, Some(s)) => {
                if self
                    .rng
                    .sample(&ContinuousDistribution::Uniform { min: 0., max: 1. })
                    < 0.5
                {
                    primary
                } else {
                    s
                }
            }
            _ => primary,
        };
        self.switches[charged].count_drop();
    }

    /// Hand-off of a serviced packet to its next hop. Unlike [`admit`]
    /// this never drops: the caller gets the packet back when the target
    /// is full and decides what to do with it.
    ///
    /// [`admit`]: Network::admit
    pub(crate) fn offer(&mut self, target: usize, packet: Packet) -> Result<(), Packet> {
        if self.switches[target].has_space() {
            self.switches[target].seat(packet);
            Ok(())
        } else {
            Err(packet)
        }
    }

    /// One-shot retry after a failed hand-off: the packet goes back on
    /// its own tail, or counts as dropped if the queue refilled to
    /// capacity while it was in service.
    pub(crate) fn return_to(&mut self, id: usize, packet: Packet) {
        if self.switches[id].has_space() {
            self.switches[id].seat(packet);
        } else {
            self.switches[id].count_drop();
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<Switch>, SampleLog) {
        (self.switches, self.samples)
    }
}
