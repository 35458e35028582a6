use crate::db::{DbPool, OrmConn};

/// Shared handles cloned into every handler. `pool` serves the raw-SQL
/// paths (auth, audit); `orm` serves the entity-backed services.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}
