use super::population::GenomeOrigin;

/// Receives population lifecycle events as they happen
pub trait PopulationObserver: Send {
    fn on_generation_opened(&mut self, generation: usize);
    fn on_genome_created(&mut self, generation: Option<usize>, origin: GenomeOrigin, created: usize);
    fn on_fitness_reported(&mut self, generation: Option<usize>, fitness: f64, reports_on_file: usize);
}

/// Writes lifecycle events to the `log` facade
#[derive(Default)]
pub struct LoggingObserver;

impl PopulationObserver for LoggingObserver {
    fn on_generation_opened(&mut self, generation: usize) {
        log::info!("Generation {} opened", generation);
    }

    fn on_genome_created(&mut self, generation: Option<usize>, origin: GenomeOrigin, created: usize) {
        match generation {
            Some(g) => log::debug!("Generation {}: genome #{} created ({:?})", g, created, origin),
            None => log::debug!("Genome #{} created ({:?})", created, origin),
        }
    }

    fn on_fitness_reported(&mut self, generation: Option<usize>, fitness: f64, reports_on_file: usize) {
        log::debug!(
            "Fitness {:.4} reported for generation {:?}, {} reports on file",
            fitness, generation, reports_on_file
        );
    }
}

// For handing events to another thread (e.g. a UI)
pub struct ChannelObserver {
    sender: std::sync::mpsc::Sender<PopulationEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopulationEvent {
    GenerationOpened(usize),
    GenomeCreated { generation: Option<usize>, origin: GenomeOrigin, created: usize },
    FitnessReported { generation: Option<usize>, fitness: f64, reports_on_file: usize },
}

impl ChannelObserver {
    pub fn new(sender: std::sync::mpsc::Sender<PopulationEvent>) -> Self {
        Self { sender }
    }
}

impl PopulationObserver for ChannelObserver {
    fn on_generation_opened(&mut self, generation: usize) {
        let _ = self.sender.send(PopulationEvent::GenerationOpened(generation));
    }

    fn on_genome_created(&mut self, generation: Option<usize>, origin: GenomeOrigin, created: usize) {
        let _ = self.sender.send(PopulationEvent::GenomeCreated {
            generation,
            origin,
            created,
        });
    }

    fn on_fitness_reported(&mut self, generation: Option<usize>, fitness: f64, reports_on_file: usize) {
        let _ = self.sender.send(PopulationEvent::FitnessReported {
            generation,
            fitness,
            reports_on_file,
        });
    }
}
