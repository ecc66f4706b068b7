//! Contact taxonomy
//!
//! The physics engine reports "body A touched body B". This module decides
//! which of the two is which and what the contact means, independent of the
//! order the engine happened to list them in.

use serde::{Deserialize, Serialize};

use super::state::EntityId;

/// Semantic kind of a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player's ship
    Player,
    /// A player-fired shot
    Projectile,
    /// A falling letter
    Obstacle,
    /// The floor or an off-screen edge
    Boundary,
}

impl EntityKind {
    /// Physics category bit for this kind
    pub const fn category(self) -> u32 {
        match self {
            EntityKind::Projectile => 1 << 0,
            EntityKind::Obstacle => 1 << 1,
            EntityKind::Player => 1 << 2,
            EntityKind::Boundary => 1 << 3,
        }
    }

    /// Categories this kind must report contacts with
    pub const fn contact_mask(self) -> u32 {
        match self {
            EntityKind::Projectile => {
                EntityKind::Obstacle.category() | EntityKind::Boundary.category()
            }
            EntityKind::Obstacle => {
                EntityKind::Projectile.category()
                    | EntityKind::Player.category()
                    | EntityKind::Boundary.category()
            }
            EntityKind::Player => EntityKind::Obstacle.category(),
            EntityKind::Boundary => {
                EntityKind::Obstacle.category() | EntityKind::Projectile.category()
            }
        }
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl Body {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self { id, kind }
    }

    pub fn player() -> Self {
        Self::new(0, EntityKind::Player)
    }

    pub fn boundary() -> Self {
        Self::new(0, EntityKind::Boundary)
    }

    pub fn obstacle(id: EntityId) -> Self {
        Self::new(id, EntityKind::Obstacle)
    }

    pub fn projectile(id: EntityId) -> Self {
        Self::new(id, EntityKind::Projectile)
    }
}

/// Two bodies that touched, in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

impl Contact {
    pub fn new(a: Body, b: Body) -> Self {
        Self { a, b }
    }

    /// The body of the given kind, whichever side it is on
    fn find(&self, kind: EntityKind) -> Option<Body> {
        if self.a.kind == kind {
            Some(self.a)
        } else if self.b.kind == kind {
            Some(self.b)
        } else {
            None
        }
    }

    /// What this contact means for gameplay, if anything
    pub fn classify(&self) -> Option<Interaction> {
        use EntityKind::*;

        let obstacle = self.find(Obstacle);
        let projectile = self.find(Projectile);
        let bits = self.a.kind.category() | self.b.kind.category();

        if bits == Projectile.category() | Obstacle.category() {
            Some(Interaction::Shot {
                projectile: projectile?.id,
                obstacle: obstacle?.id,
            })
        } else if bits == Player.category() | Obstacle.category() {
            Some(Interaction::Rammed {
                obstacle: obstacle?.id,
            })
        } else if bits == Obstacle.category() | Boundary.category() {
            Some(Interaction::Missed {
                obstacle: obstacle?.id,
            })
        } else if bits == Projectile.category() | Boundary.category() {
            Some(Interaction::ProjectileLeft {
                projectile: projectile?.id,
            })
        } else {
            None
        }
    }
}

/// A meaningful contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// A projectile hit an obstacle
    Shot {
        projectile: EntityId,
        obstacle: EntityId,
    },
    /// An obstacle hit the player's ship
    Rammed { obstacle: EntityId },
    /// An obstacle reached the floor
    Missed { obstacle: EntityId },
    /// A projectile left the field without hitting anything
    ProjectileLeft { projectile: EntityId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_symmetric() {
        let pairs = [
            (Body::projectile(7), Body::obstacle(3)),
            (Body::player(), Body::obstacle(3)),
            (Body::obstacle(3), Body::boundary()),
            (Body::projectile(7), Body::boundary()),
            (Body::player(), Body::boundary()),
        ];
        for (a, b) in pairs {
            assert_eq!(
                Contact::new(a, b).classify(),
                Contact::new(b, a).classify()
            );
        }
    }

    #[test]
    fn test_shot_names_both_ids() {
        let contact = Contact::new(Body::obstacle(3), Body::projectile(7));
        assert_eq!(
            contact.classify(),
            Some(Interaction::Shot {
                projectile: 7,
                obstacle: 3
            })
        );
    }

    #[test]
    fn test_meaningless_pairs_ignored() {
        assert_eq!(
            Contact::new(Body::player(), Body::boundary()).classify(),
            None
        );
        assert_eq!(
            Contact::new(Body::obstacle(1), Body::obstacle(2)).classify(),
            None
        );
        assert_eq!(
            Contact::new(Body::projectile(1), Body::player()).classify(),
            None
        );
    }

    #[test]
    fn test_masks_are_mutual() {
        let kinds = [
            EntityKind::Player,
            EntityKind::Projectile,
            EntityKind::Obstacle,
            EntityKind::Boundary,
        ];
        for a in kinds {
            for b in kinds {
                let a_wants = a.contact_mask() & b.category() != 0;
                let b_wants = b.contact_mask() & a.category() != 0;
                assert_eq!(a_wants, b_wants, "{a:?} vs {b:?}");
            }
        }
    }
}
