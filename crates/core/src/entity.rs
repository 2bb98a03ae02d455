//! Entities owned by an aggregate.

/// A child entity: has its own identity but lives inside exactly one
/// aggregate, whose id it records.
pub trait Entity {
    type Id: Copy + Eq + core::fmt::Debug;
    type OwnerId: Copy + Eq + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    fn owner_id(&self) -> &Self::OwnerId;

    fn belongs_to(&self, owner: &Self::OwnerId) -> bool {
        self.owner_id() == owner
    }
}

/// Position of the entity with `id` among `entities`, if present.
pub fn position_of<E: Entity>(entities: &[E], id: &E::Id) -> Option<usize> {
    entities.iter().position(|e| e.id() == id)
}
