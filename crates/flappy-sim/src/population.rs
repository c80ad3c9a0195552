//! The agent set: bodies, decision functions, and fitness tallies kept in
//! parallel columns addressed by one shared index.
//!
//! The columns are private. Every removal goes through `prune`, which
//! compacts all of them in a single ordered pass, so index `i` always names
//! the same agent in every column.

use flappy_core::config::SimConfig;
use flappy_core::decision::BoxedDecision;
use flappy_core::state::AgentView;
use flappy_core::types::AgentId;

use crate::error::EpisodeError;
use crate::physics::PhysicsBody;

/// Fitness accumulated by one agent this episode. Only ever added to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitnessTally(f64);

impl FitnessTally {
    pub fn add(&mut self, amount: f64) {
        self.0 += amount;
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Mutable view of one agent's row.
pub struct AgentMut<'a> {
    pub id: AgentId,
    pub body: &'a mut PhysicsBody,
    pub pilot: &'a mut BoxedDecision,
    pub tally: &'a mut FitnessTally,
}

/// An agent removed by `prune`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retired {
    pub id: AgentId,
    /// Row index the agent held just before the prune.
    pub index: usize,
    pub fitness: f64,
}

/// Index-synchronized agent columns.
pub struct Population {
    ids: Vec<AgentId>,
    bodies: Vec<PhysicsBody>,
    pilots: Vec<BoxedDecision>,
    tallies: Vec<FitnessTally>,
}

impl std::fmt::Debug for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("ids", &self.ids)
            .field("bodies", &self.bodies)
            .field("tallies", &self.tallies)
            .finish_non_exhaustive()
    }
}

impl Population {
    /// One agent per decision function, all at the configured start position.
    /// Rejects an empty set and any function with no outputs.
    pub fn spawn(config: &SimConfig, pilots: Vec<BoxedDecision>) -> Result<Self, EpisodeError> {
        if pilots.is_empty() {
            return Err(EpisodeError::EmptyPopulation);
        }
        let ids: Vec<AgentId> = (0..pilots.len() as u32).map(AgentId).collect();
        for (id, pilot) in ids.iter().zip(&pilots) {
            let arity = pilot.output_arity();
            if arity == 0 {
                return Err(EpisodeError::OutputArity { agent: *id, arity });
            }
        }

        Ok(Self {
            bodies: vec![PhysicsBody::spawn(config); pilots.len()],
            tallies: vec![FitnessTally::default(); pilots.len()],
            ids,
            pilots,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[AgentId] {
        &self.ids
    }

    pub fn bodies(&self) -> &[PhysicsBody] {
        &self.bodies
    }

    /// Bodies may be moved in place; rows cannot be added or removed here.
    pub fn bodies_mut(&mut self) -> &mut [PhysicsBody] {
        &mut self.bodies
    }

    pub fn tallies(&self) -> &[FitnessTally] {
        &self.tallies
    }

    /// Reference agent for sensing: the first survivor.
    pub fn lead(&self) -> Option<&PhysicsBody> {
        self.bodies.first()
    }

    /// Largest x among survivors.
    pub fn frontmost_x(&self) -> Option<f64> {
        self.bodies.iter().map(|b| b.x).reduce(f64::max)
    }

    /// Iterate rows in index order.
    pub fn agents_mut(&mut self) -> impl Iterator<Item = AgentMut<'_>> {
        self.ids
            .iter()
            .zip(self.bodies.iter_mut())
            .zip(self.pilots.iter_mut())
            .zip(self.tallies.iter_mut())
            .map(|(((id, body), pilot), tally)| AgentMut {
                id: *id,
                body,
                pilot,
                tally,
            })
    }

    pub fn reward_all(&mut self, amount: f64) {
        for tally in &mut self.tallies {
            tally.add(amount);
        }
    }

    /// Remove every row for which `doomed(index)` is true, preserving the
    /// order of the rest. Returns the removed agents in index order.
    pub fn prune(&mut self, mut doomed: impl FnMut(usize) -> bool) -> Vec<Retired> {
        let marks: Vec<bool> = (0..self.len()).map(&mut doomed).collect();
        if !marks.contains(&true) {
            return Vec::new();
        }

        let retired = marks
            .iter()
            .enumerate()
            .filter(|(_, dead)| **dead)
            .map(|(index, _)| Retired {
                id: self.ids[index],
                index,
                fitness: self.tallies[index].value(),
            })
            .collect();

        retain_unmarked(&mut self.ids, &marks);
        retain_unmarked(&mut self.bodies, &marks);
        retain_unmarked(&mut self.pilots, &marks);
        retain_unmarked(&mut self.tallies, &marks);
        self.debug_assert_consistent();
        retired
    }

    /// Remove everyone.
    pub fn drain(&mut self) -> Vec<Retired> {
        self.prune(|_| true)
    }

    pub fn views(&self) -> Vec<AgentView> {
        self.ids
            .iter()
            .zip(&self.bodies)
            .map(|(id, body)| AgentView {
                id: *id,
                x: body.x,
                y: body.y,
                velocity: body.velocity,
                tilt: body.tilt(),
                wing_frame: body.wing_frame(),
            })
            .collect()
    }

    fn debug_assert_consistent(&self) {
        debug_assert_eq!(self.ids.len(), self.bodies.len());
        debug_assert_eq!(self.ids.len(), self.pilots.len());
        debug_assert_eq!(self.ids.len(), self.tallies.len());
    }
}

/// `Vec::retain` visits elements once, in order, so a running index lines
/// up with `marks`.
fn retain_unmarked<T>(items: &mut Vec<T>, marks: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !marks[index];
        index += 1;
        keep
    });
}
