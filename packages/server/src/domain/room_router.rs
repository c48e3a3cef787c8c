//! Room routing: which broadcast groups an identity belongs to.

use std::collections::BTreeSet;

use super::{
    entity::Identity,
    value_object::{Role, RoomId},
};

/// Derive the rooms a connection joins from its identity.
///
/// Admins join `admins`; supervisors and workers join the room of their single
/// unit; everyone else joins nothing and only gets responses to their own
/// requests.
pub fn rooms_for(identity: &Identity) -> BTreeSet<RoomId> {
    let room = match identity.role() {
        Role::Admin => Some(RoomId::admins()),
        Role::Supervisor => identity.supervised_unit().map(RoomId::for_unit),
        Role::Worker => identity.assigned_unit().map(RoomId::for_unit),
        Role::Student => None,
    };
    room.into_iter().collect()
}
