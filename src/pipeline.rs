use std::collections::HashMap;
use tracing::{debug, trace, warn};

use crate::lookup::{AgeResolver, CastResolver, normalize_actor_name};

const PLAUSIBLE_AGES: std::ops::RangeInclusive<i32> = 0..=130;

/// Known ages keyed by normalized actor name, for the length of one run.
pub type ActorAgeCache = HashMap<String, i32>;

/// Average cast age per movie, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieAverages {
    entries: Vec<(String, f64)>,
}

impl MovieAverages {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated title replaces the earlier value but keeps its position.
    pub fn insert(&mut self, title: String, average: f64) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == title) {
            Some(entry) => entry.1 = average,
            None => self.entries.push((title, average)),
        }
    }

    pub fn get(&self, title: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == title)
            .map(|(_, average)| *average)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(title, average)| (title.as_str(), *average))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct Pipeline<'a, C: ?Sized, A: ?Sized> {
    cast: &'a C,
    ages: &'a A,
    verbose: bool,
}

impl<'a, C, A> Pipeline<'a, C, A>
where
    C: CastResolver + ?Sized,
    A: AgeResolver + ?Sized,
{
    pub fn new(cast: &'a C, ages: &'a A) -> Self {
        Pipeline { cast, ages, verbose: false }
    }

    /// Print per-movie progress to stdout.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Average cast age of every title whose cast yields at least one known age.
    pub fn aggregate(&self, titles: &[String], reference_year: i32) -> MovieAverages {
        let mut cache = ActorAgeCache::new();
        let mut averages = MovieAverages::new();

        for (index, title) in titles.iter().enumerate() {
            if self.verbose {
                println!(
                    "Gathering actor/actress ages for '{}' - {} / {}",
                    title,
                    index + 1,
                    titles.len()
                );
            }

            match self.average_cast_age(title, reference_year, &mut cache) {
                Some(average) => averages.insert(title.clone(), average),
                None => debug!(title = title.as_str(), "no known cast ages, movie skipped"),
            }
        }

        debug!(movies = averages.len(), actors_cached = cache.len(), "aggregation finished");
        averages
    }

    fn average_cast_age(
        &self,
        title: &str,
        reference_year: i32,
        cache: &mut ActorAgeCache,
    ) -> Option<f64> {
        let cast = match self.cast.resolve_cast(title, reference_year) {
            Ok(cast) => cast,
            Err(err) => {
                debug!(title, error = %err, "cast lookup failed");
                return None;
            }
        };

        let ages: Vec<i32> = cast
            .iter()
            .filter_map(|actor| self.actor_age(actor, cache))
            .collect();
        mean(&ages)
    }

    fn actor_age(&self, actor: &str, cache: &mut ActorAgeCache) -> Option<i32> {
        let key = normalize_actor_name(actor);
        if let Some(&age) = cache.get(&key) {
            trace!(actor, age, "cache hit");
            return Some(age);
        }

        match self.ages.resolve_age(&key) {
            Ok(age) => {
                if !PLAUSIBLE_AGES.contains(&age) {
                    warn!(actor, age, "implausible age parsed from birth date");
                }
                cache.insert(key, age);
                Some(age)
            }
            Err(err) => {
                debug!(actor, error = %err, "age lookup failed");
                None
            }
        }
    }
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(ages: &[i32]) -> Option<f64> {
    if ages.is_empty() {
        return None;
    }
    let total: i64 = ages.iter().map(|&age| i64::from(age)).sum();
    Some(total as f64 / ages.len() as f64)
}
