use crate::{
    quantities::{Time, TimeSpan},
    simulation::Process,
};

use super::Network;

/// The series the sampler fills in, one column per switch. `forwarded`
/// stays empty for switches without a forwarding hop.
#[derive(Debug)]
pub struct SampleLog {
    pub ticks: Vec<Time>,
    pub queue_lengths: Vec<Vec<usize>>,
    pub forwarded: Vec<Vec<bool>>,
}

impl SampleLog {
    #[must_use]
    pub fn new(num_switches: usize) -> SampleLog {
        SampleLog {
            ticks: Vec::new(),
            queue_lengths: vec![Vec::new(); num_switches],
            forwarded: vec![Vec::new(); num_switches],
        }
    }
}

/// Periodic observer of queue occupancy. Read-only with respect to the
/// queues themselves; scheduled and interleaved like any other process.
#[derive(Debug)]
pub struct QueueSampler {
    interval: TimeSpan,
    last_forwarded: Vec<u64>,
}

impl QueueSampler {
    #[must_use]
    pub fn new(interval: TimeSpan, num_switches: usize) -> QueueSampler {
        QueueSampler {
            interval,
            last_forwarded: vec![0; num_switches],
        }
    }
}

impl Process<Network> for QueueSampler {
    fn wake(&mut self, time: Time, net: &mut Network) -> Option<Time> {
        let observed: Vec<(usize, u64, bool)> = net
            .switches()
            .iter()
            .map(|sw| (sw.queue_len(), sw.forwarded_count, sw.forward_to.is_some()))
            .collect();
        net.samples.ticks.push(time);
        for (i, (queue_len, forwarded, forwards)) in observed.into_iter().enumerate() {
            net.samples.queue_lengths[i].push(queue_len);
            if forwards {
                net.samples.forwarded[i].push(forwarded > self.last_forwarded[i]);
                self.last_forwarded[i] = forwarded;
            }
        }
        Some(time + self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::{Network, QueueSampler};
    use crate::{
        config::SimulationConfig,
        network::NUM_SWITCHES,
        quantities::{seconds, Time},
        simulation::{Process, Simulator},
        util::{logging::NothingLogger, rand::Rng},
    };

    #[test]
    fn samples_at_the_configured_cadence() {
        let config = SimulationConfig::default();
        let net = Network::new(&config, Rng::from_seed(0));
        let processes: Vec<Box<dyn Process<Network>>> =
            vec![Box::new(QueueSampler::new(seconds(10.), NUM_SWITCHES))];
        let net = Simulator::new(processes, net, NothingLogger::new())
            .run_until(Time::SIM_START + seconds(25.));

        let at = |t| Time::from_sim_start(seconds(t));
        assert_eq!(net.samples.ticks, vec![at(0.), at(10.), at(20.)]);
        for lengths in &net.samples.queue_lengths {
            assert_eq!(lengths, &vec![0, 0, 0]);
        }
        // No forwarding hop configured, so no indicator series.
        assert!(net.samples.forwarded.iter().all(Vec::is_empty));
    }
}
