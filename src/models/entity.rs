// src/models/entity.rs
// DOCUMENTATION: Polymorphic wrapper over the six domain records
// PURPOSE: Lets storage backends hold, key and serialize any entity uniformly

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Amenity, City, Place, Review, State, User};

/// Entity type selector
/// DOCUMENTATION: Used for filtered `all`/`count` and typed `get` calls.
/// The string form is the class name that prefixes every storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Amenity,
    City,
    Place,
    Review,
    State,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Amenity,
        EntityKind::City,
        EntityKind::Place,
        EntityKind::Review,
        EntityKind::State,
        EntityKind::User,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            EntityKind::Amenity => "Amenity",
            EntityKind::City => "City",
            EntityKind::Place => "Place",
            EntityKind::Review => "Review",
            EntityKind::State => "State",
            EntityKind::User => "User",
        }
    }

    /// Parse a class name ("State", "City", ...). Case-sensitive.
    pub fn from_class_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.class_name() == name)
    }

    /// Relational table backing this kind
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Amenity => "amenities",
            EntityKind::City => "cities",
            EntityKind::Place => "places",
            EntityKind::Review => "reviews",
            EntityKind::State => "states",
            EntityKind::User => "users",
        }
    }

    /// Insertion rank: parents always come before the rows referencing them
    pub fn write_order(self) -> u8 {
        match self {
            EntityKind::State | EntityKind::User | EntityKind::Amenity => 0,
            EntityKind::City => 1,
            EntityKind::Place => 2,
            EntityKind::Review => 3,
        }
    }

    /// Storage key: "ClassName.id"
    pub fn key(self, id: &Uuid) -> String {
        format!("{}.{}", self.class_name(), id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Any stored domain object
/// DOCUMENTATION: Serialized with a `__class__` tag so the file backend can
/// rebuild the right record type when reading its JSON document back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    Amenity(Amenity),
    City(City),
    Place(Place),
    Review(Review),
    State(State),
    User(User),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Amenity(_) => EntityKind::Amenity,
            Entity::City(_) => EntityKind::City,
            Entity::Place(_) => EntityKind::Place,
            Entity::Review(_) => EntityKind::Review,
            Entity::State(_) => EntityKind::State,
            Entity::User(_) => EntityKind::User,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Entity::Amenity(e) => e.id,
            Entity::City(e) => e.id,
            Entity::Place(e) => e.id,
            Entity::Review(e) => e.id,
            Entity::State(e) => e.id,
            Entity::User(e) => e.id,
        }
    }

    pub fn key(&self) -> String {
        self.kind().key(&self.id())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Entity::Amenity(e) => e.created_at,
            Entity::City(e) => e.created_at,
            Entity::Place(e) => e.created_at,
            Entity::Review(e) => e.created_at,
            Entity::State(e) => e.created_at,
            Entity::User(e) => e.created_at,
        }
    }

    /// Parents whose deletion removes this entity too
    pub fn owners(&self) -> Vec<(EntityKind, Uuid)> {
        match self {
            Entity::City(city) => vec![(EntityKind::State, city.state_id)],
            Entity::Place(place) => vec![
                (EntityKind::City, place.city_id),
                (EntityKind::User, place.user_id),
            ],
            Entity::Review(review) => vec![
                (EntityKind::Place, review.place_id),
                (EntityKind::User, review.user_id),
            ],
            Entity::Amenity(_) | Entity::State(_) | Entity::User(_) => Vec::new(),
        }
    }

    /// Every foreign key this entity holds, owners plus amenity links
    pub fn references(&self) -> Vec<(EntityKind, Uuid)> {
        let mut refs = self.owners();
        if let Entity::Place(place) = self {
            refs.extend(
                place
                    .amenity_ids
                    .iter()
                    .map(|amenity_id| (EntityKind::Amenity, *amenity_id)),
            );
        }
        refs
    }
}

/// Typed view over one entity kind
/// DOCUMENTATION: Implemented by the six records so callers can move between
/// the concrete struct and the storage-level `Entity` without matching by hand.
pub trait Model: Clone + Into<Entity> + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Uuid;

    /// Set `updated_at` to now
    fn touch(&mut self);

    /// Returns `None` when the entity is of another kind
    fn from_entity(entity: Entity) -> Option<Self>;

    fn key(&self) -> String {
        Self::KIND.key(&self.id())
    }
}

macro_rules! impl_model {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Entity {
                fn from(value: $ty) -> Self {
                    Entity::$ty(value)
                }
            }

            impl Model for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn id(&self) -> Uuid {
                    self.id
                }

                fn touch(&mut self) {
                    self.updated_at = now();
                }

                fn from_entity(entity: Entity) -> Option<Self> {
                    match entity {
                        Entity::$ty(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_model!(Amenity, City, Place, Review, State, User);

/// Current time truncated to microseconds, the precision PostgreSQL keeps
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_class_name(kind.class_name()), Some(kind));
        }
        assert_eq!(EntityKind::from_class_name("BaseModel"), None);
        assert_eq!(EntityKind::from_class_name("state"), None);
    }

    #[test]
    fn test_key_format() {
        let state = State::new("California");
        let entity: Entity = state.clone().into();
        assert_eq!(entity.key(), format!("State.{}", state.id));
        assert_eq!(entity.key(), state.key());
    }

    #[test]
    fn test_serialized_entity_carries_class_tag() {
        let amenity = Amenity::new("Wifi");
        let value = serde_json::to_value(Entity::from(amenity.clone())).unwrap();
        assert_eq!(value["__class__"], "Amenity");
        assert_eq!(value["name"], "Wifi");

        let back: Entity = serde_json::from_value(value).unwrap();
        assert_eq!(back, Entity::Amenity(amenity));
    }

    #[test]
    fn test_references_include_amenity_links() {
        let mut place = Place::new(Uuid::new_v4(), Uuid::new_v4(), "Loft");
        let wifi = Uuid::new_v4();
        place.amenity_ids.push(wifi);

        let entity = Entity::from(place.clone());
        assert_eq!(entity.owners().len(), 2);
        assert!(entity
            .references()
            .contains(&(EntityKind::Amenity, wifi)));
        assert!(entity
            .references()
            .contains(&(EntityKind::City, place.city_id)));
    }

    #[test]
    fn test_from_entity_rejects_other_kind() {
        let entity = Entity::from(State::new("Nevada"));
        assert!(City::from_entity(entity.clone()).is_none());
        assert!(State::from_entity(entity).is_some());
    }

    #[test]
    fn test_touch_moves_updated_at_forward() {
        let mut state = State::new("Oregon");
        let before = state.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        state.touch();
        assert!(state.updated_at > before);
        assert_eq!(state.created_at, before);
    }
}
