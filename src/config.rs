use std::{fs::File, path::Path};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    network::{
        sampler::QueueSampler, source::TrafficSource, switch::SwitchWorker, Network, TieBreak,
        NUM_SWITCHES,
    },
    quantities::{seconds, Time, TimeSpan},
    results::SimulationResults,
    simulation::{Process, Simulator},
    util::{
        logging::{Logger, NothingLogger},
        rand::{ContinuousDistribution, Rng},
    },
};

/// One traffic endpoint and the switch it sends to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub primary: usize,
}

impl SourceSpec {
    #[must_use]
    pub fn new(name: &str, primary: usize) -> SourceSpec {
        SourceSpec {
            name: name.to_owned(),
            primary,
        }
    }
}

/// Everything a run is determined by. Two runs with equal configs
/// produce identical results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub horizon: TimeSpan,
    pub queue_capacity: usize,
    pub service_time: TimeSpan,
    pub network_latency: TimeSpan,
    pub arrival_min: TimeSpan,
    pub arrival_max: TimeSpan,
    pub sampling_interval: TimeSpan,
    pub sources: Vec<SourceSpec>,
    /// Whether each switch may overflow into its peer on admission.
    pub spillover: bool,
    pub tie_break: TieBreak,
    /// Adds the extra hop from switch 0 to switch 1 after service.
    pub forward_hop: bool,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            horizon: seconds(1440.),
            queue_capacity: 40,
            service_time: seconds(0.253),
            network_latency: seconds(0.2),
            arrival_min: seconds(0.1),
            arrival_max: seconds(0.5),
            sampling_interval: seconds(10.),
            sources: vec![
                SourceSpec::new("PC1", 0),
                SourceSpec::new("PC2", 0),
                SourceSpec::new("PC3", 0),
                SourceSpec::new("PC4", 1),
            ],
            spillover: true,
            tie_break: TieBreak::Random,
            forward_hop: false,
            seed: 0,
        }
    }
}

fn valid_path(path: &Path) -> bool {
    path.extension().is_some_and(|x| x.to_str() == Some("json"))
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.queue_capacity >= 1, "queue capacity must be at least 1");
        ensure!(
            self.horizon > TimeSpan::ZERO,
            "simulation horizon must be positive"
        );
        ensure!(
            self.service_time > TimeSpan::ZERO,
            "service time must be positive"
        );
        ensure!(
            self.sampling_interval > TimeSpan::ZERO,
            "sampling interval must be positive"
        );
        ensure!(
            !self.network_latency.is_negative(),
            "network latency cannot be negative"
        );
        ensure!(
            !self.arrival_min.is_negative(),
            "arrival interval cannot be negative"
        );
        ensure!(
            self.arrival_min <= self.arrival_max,
            "arrival interval range is inverted"
        );
        // A source whose whole cycle takes zero time would wake at the
        // same instant forever and the run could never reach its horizon.
        ensure!(
            self.arrival_max > TimeSpan::ZERO || self.network_latency > TimeSpan::ZERO,
            "sources need a positive delay per cycle"
        );
        ensure!(!self.sources.is_empty(), "at least one source is required");
        for spec in &self.sources {
            ensure!(
                spec.primary < NUM_SWITCHES,
                "source {} names switch {}, but the topology has {}",
                spec.name,
                spec.primary,
                NUM_SWITCHES
            );
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ensure!(valid_path(path), "config files use a .json extension");
        let mut file = File::create(path)?;
        Ok(serde_json::to_writer_pretty(&mut file, self)?)
    }

    pub fn load(path: &Path) -> Result<SimulationConfig> {
        ensure!(valid_path(path), "config files use a .json extension");
        let file =
            File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let config: SimulationConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Runs the simulation to the configured horizon and extracts the
    /// per-switch counters and time series. Silent; see [`run_with`].
    ///
    /// [`run_with`]: SimulationConfig::run_with
    pub fn run(&self) -> Result<SimulationResults> {
        self.run_with(NothingLogger::new())
    }

    /// As [`run`], tracing scheduler activity through `logger`.
    ///
    /// [`run`]: SimulationConfig::run
    pub fn run_with<L>(&self, logger: L) -> Result<SimulationResults>
    where
        L: Logger,
    {
        self.validate()?;
        let mut rng = Rng::from_seed(self.seed);
        let network = Network::new(self, rng.create_child());

        let interval = if self.arrival_min == self.arrival_max {
            ContinuousDistribution::Always {
                value: self.arrival_min.seconds(),
            }
        } else {
            ContinuousDistribution::Uniform {
                min: self.arrival_min.seconds(),
                max: self.arrival_max.seconds(),
            }
        };

        // Registration order doubles as the equal-time tie-break: switch
        // workers, then sources in declaration order, then the sampler.
        let mut processes: Vec<Box<dyn Process<Network>>> = Vec::new();
        for id in 0..NUM_SWITCHES {
            processes.push(Box::new(SwitchWorker::new(
                id,
                self.service_time,
                NothingLogger::new(),
            )));
        }
        for (i, spec) in self.sources.iter().enumerate() {
            processes.push(Box::new(TrafficSource::new(
                i,
                spec.name.clone(),
                spec.primary,
                interval.clone(),
                self.network_latency,
                rng.create_child(),
                NothingLogger::new(),
            )));
        }
        processes.push(Box::new(QueueSampler::new(
            self.sampling_interval,
            NUM_SWITCHES,
        )));

        let network =
            Simulator::new(processes, network, logger).run_until(Time::SIM_START + self.horizon);
        Ok(SimulationResults::extract(network))
    }
}
