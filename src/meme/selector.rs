use colored::*;
use rand::Rng;
use rand::seq::SliceRandom;

use super::{HistoryStore, MemeError, MemeRecord, MemeSource, SubredditTarget};
use crate::config::MemeConfig;

/// Picks a meme that is not in the history, giving up after a fixed
/// number of attempts.
pub struct Selector<'a, S: MemeSource + ?Sized> {
    source: &'a S,
    targets: Vec<SubredditTarget>,
    max_attempts: usize,
}

impl<'a, S: MemeSource + ?Sized> Selector<'a, S> {
    pub fn new(source: &'a S, config: &MemeConfig) -> Self {
        Self {
            source,
            targets: config.targets(),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Every failed fetch and every already-seen meme costs one attempt.
    /// The history is only touched when a fresh meme is accepted.
    pub fn select<R: Rng + ?Sized>(
        &self,
        history: &mut HistoryStore,
        rng: &mut R,
    ) -> Result<MemeRecord, MemeError> {
        for attempt in 1..=self.max_attempts {
            let target = self.targets.choose(rng).unwrap_or(&SubredditTarget::Any);
            println!("Selected subreddit: {}", target.to_string().cyan());

            let outcome = self.source.fetch(target).and_then(|record| {
                if history.contains(&record.id) {
                    Err(MemeError::Duplicate(record.id))
                } else {
                    Ok(record)
                }
            });

            match outcome {
                Ok(record) => {
                    history.record(record.id.clone());
                    if let Err(err) = history.save() {
                        tracing::warn!(error = %err, "could not save meme history");
                    }
                    tracing::info!(attempt, id = %record.id, "found a fresh meme");
                    return Ok(record);
                }
                Err(err @ MemeError::Duplicate(_)) => {
                    tracing::debug!(attempt, %target, "{}", err);
                }
                Err(err) => {
                    tracing::warn!(attempt, %target, error = %err, "meme fetch failed");
                }
            }
        }

        Err(MemeError::AttemptsExhausted {
            attempts: self.max_attempts,
        })
    }
}
