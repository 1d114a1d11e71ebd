use log::debug;
use rand::seq::IndexedRandom;
use rand::RngCore;

use super::ChromosomeFactory;
use crate::chromosome::{Chromosome, TestCase, TestCaseRecorder};
use crate::env::{Action, Environment};

/// Builds test cases of up to `max_num_events` uniformly random actions.
#[derive(Debug, Clone, Copy)]
pub struct RandomChromosomeFactory {
    max_num_events: usize,
}

impl RandomChromosomeFactory {
    pub fn new(max_num_events: usize) -> Self {
        Self { max_num_events }
    }
}

impl<A: Action> ChromosomeFactory<TestCase<A>> for RandomChromosomeFactory {
    fn create(
        &mut self,
        env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
    ) -> Chromosome<TestCase<A>> {
        env.reset();
        let mut recorder = TestCaseRecorder::start(env, self.max_num_events);
        while recorder.len() < self.max_num_events {
            let executable = recorder.executable_actions();
            let Some(action) = executable.choose(rng) else {
                debug!("no executable action after {} events", recorder.len());
                break;
            };
            if !recorder.record(action) {
                break;
            }
        }
        Chromosome::new(recorder.finish())
    }
}
