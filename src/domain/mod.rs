//! Domain model
pub mod aggregates;
pub mod events;
pub mod value_objects;

/// Verified caller identity handed to the core by the authentication collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub display_name: String,
}
