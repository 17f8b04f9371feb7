/// Projectile source registry
///
/// Tracks which projectiles currently own a looping audio source. A source is
/// created the first tick a new projectile is seen while a cast action is
/// running, follows the projectile while it is active, and is torn down the
/// first tick the projectile disappears.
use super::channel::{Channel, Cue};
use crate::observer::{Position, ProjectileView};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Registered {
    id: String,
    sound: String,
}

/// Result of one [`ProjectileSourceRegistry::sync`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectileSync {
    pub cues: Vec<Cue>,
    /// Identifier registered this tick, if any
    pub registered: Option<String>,
}

/// Registered projectile identifiers in registration order
#[derive(Debug, Clone, Default)]
pub struct ProjectileSourceRegistry {
    entries: Vec<Registered>,
}

impl ProjectileSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Reconcile the registry with this tick's active projectiles
    ///
    /// `active` must already exclude empty slots. When `cast` carries a sound,
    /// at most one unregistered projectile is adopted this tick.
    pub fn sync(
        &mut self,
        active: &[ProjectileView],
        cast: Option<&str>,
        caster: Position,
    ) -> ProjectileSync {
        let mut outcome = ProjectileSync::default();

        self.entries.retain(|entry| {
            match active.iter().find(|p| p.id == entry.id) {
                Some(projectile) => {
                    outcome.cues.push(Cue::move_to(
                        Channel::Projectile(entry.id.clone()),
                        projectile.center,
                    ));
                    true
                }
                None => {
                    tracing::debug!("Projectile {} gone; releasing its source", entry.id);
                    outcome
                        .cues
                        .push(Cue::stop(Channel::Projectile(entry.id.clone())));
                    false
                }
            }
        });

        if let Some(sound) = cast {
            let fresh = active.iter().find(|p| !self.contains(&p.id));
            if let Some(projectile) = fresh {
                outcome.cues.push(Cue::looped(
                    Channel::Projectile(projectile.id.clone()),
                    sound,
                    caster,
                ));
                self.entries.push(Registered {
                    id: projectile.id.clone(),
                    sound: sound.to_string(),
                });
                outcome.registered = Some(projectile.id.clone());
            }
        }

        outcome
    }

    /// Drop every entry, stopping and releasing its source
    pub fn reset(&mut self) -> Vec<Cue> {
        self.entries
            .drain(..)
            .map(|entry| Cue::stop(Channel::Projectile(entry.id)))
            .collect()
    }
}
