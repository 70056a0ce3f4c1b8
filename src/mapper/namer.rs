//! Minting identifiers for instance resources.
use log::trace;
use rand::Rng;

use crate::model::IRI;
use crate::vocab::INSTANCE_NAME_PREFIX;

use std::collections::{HashMap, HashSet};

/// Mints identifiers of the form `base INS nonce _ Class _ counter`.
///
/// A namer belongs to a single mapping run. The nonce distinguishes
/// runs against the same base; the counters distinguish instances of
/// the same class within a run.
#[derive(Debug)]
pub struct ResourceNamer {
    base: String,
    nonce: u32,
    counts: HashMap<IRI, usize>,
    issued: HashSet<String>,
}

impl ResourceNamer {
    /// A namer minting under `base`, which should end with `#` or `/`.
    ///
    /// A random nonce is chosen if none is given.
    pub fn new(base: &str, nonce: Option<u32>) -> ResourceNamer {
        let nonce = nonce.unwrap_or_else(|| rand::rng().random_range(0..9_999_999));

        ResourceNamer {
            base: base.to_string(),
            nonce,
            counts: HashMap::new(),
            issued: HashSet::new(),
        }
    }

    /// Start the counter of each of `classes` at one.
    pub fn seed<'a, I: IntoIterator<Item = &'a IRI>>(&mut self, classes: I) {
        for c in classes {
            self.counts.insert(c.clone(), 1);
        }
    }

    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    /// The counter that the next instance of `class` would use.
    pub fn count(&self, class: &IRI) -> usize {
        self.counts.get(class).copied().unwrap_or(1)
    }

    /// A fresh identifier for an instance of `class`.
    ///
    /// Classes in different namespaces can share a local name; the
    /// counter is advanced past any identifier already issued.
    pub fn mint(&mut self, class: &IRI) -> String {
        let counter = self.counts.entry(class.clone()).or_insert(1);

        loop {
            let id = format!(
                "{}{}{}_{}_{}",
                self.base,
                INSTANCE_NAME_PREFIX,
                self.nonce,
                class.local_name(),
                counter
            );
            *counter += 1;

            if self.issued.insert(id.clone()) {
                trace!("Minted {} for {}", id, class);
                return id;
            }
        }
    }
}
