use itertools::{izip, Itertools};
use serde::Serialize;

use crate::{
    network::{sampler::SampleLog, Network},
    quantities::{Time, TimeSpan},
    util::average::{IterAverage, NoItems},
};

/// Everything external reporting reads for one switch: the drop counter,
/// the wait-time sequence in completion order, and the sampled series.
/// `latencies` and `forwarded` stay empty without a forwarding hop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SwitchReport {
    pub dropped: u64,
    pub wait_times: Vec<TimeSpan>,
    pub queue_lengths: Vec<(Time, usize)>,
    pub latencies: Vec<(Time, TimeSpan)>,
    pub forwarded: Vec<(Time, bool)>,
}

impl SwitchReport {
    pub fn mean_wait(&self) -> Result<TimeSpan, NoItems> {
        self.wait_times.iter().copied().average()
    }

    pub fn mean_latency(&self) -> Result<TimeSpan, NoItems> {
        self.latencies.iter().map(|&(_, latency)| latency).average()
    }
}

/// The outcome of one run, fully determined by the configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResults {
    pub switches: Vec<SwitchReport>,
}

impl SimulationResults {
    #[must_use]
    pub fn total_dropped(&self) -> u64 {
        self.switches.iter().map(|switch| switch.dropped).sum()
    }

    pub(crate) fn extract(network: Network) -> SimulationResults {
        let (switches, samples) = network.into_parts();
        let SampleLog {
            ticks,
            queue_lengths,
            forwarded,
        } = samples;
        let switches = izip!(switches, queue_lengths, forwarded)
            .map(|(switch, lengths, forwarded)| SwitchReport {
                dropped: switch.dropped_count,
                wait_times: switch.wait_times,
                queue_lengths: ticks.iter().copied().zip_eq(lengths).collect(),
                latencies: switch.latencies,
                forwarded: if forwarded.is_empty() {
                    Vec::new()
                } else {
                    ticks.iter().copied().zip_eq(forwarded).collect()
                },
            })
            .collect();
        SimulationResults { switches }
    }
}

#[cfg(test)]
mod tests {
    use super::{SimulationResults, SwitchReport};
    use crate::{
        quantities::{seconds, Time},
        util::average::NoItems,
    };

    fn report(dropped: u64) -> SwitchReport {
        SwitchReport {
            dropped,
            wait_times: Vec::new(),
            queue_lengths: Vec::new(),
            latencies: Vec::new(),
            forwarded: Vec::new(),
        }
    }

    #[test]
    fn totals_span_both_switches() {
        let results = SimulationResults {
            switches: vec![report(3), report(4)],
        };
        assert_eq!(results.total_dropped(), 7);
    }

    #[test]
    fn means_require_at_least_one_observation() {
        let mut switch = report(0);
        assert_eq!(switch.mean_wait(), Err(NoItems));

        switch.wait_times = vec![seconds(0.25), seconds(0.75)];
        assert_eq!(switch.mean_wait(), Ok(seconds(0.5)));

        switch.latencies = vec![
            (Time::from_sim_start(seconds(1.)), seconds(1.5)),
            (Time::from_sim_start(seconds(2.)), seconds(0.5)),
        ];
        assert_eq!(switch.mean_latency(), Ok(seconds(1.)));
    }
}
