//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.
//!
//! Events and their admin memberships live in separate tables; an event is
//! inserted together with its admin rows in one transaction and rehydrated
//! through [`Event::restore`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{AdminId, Event, EventDraft};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EventAdminRow, EventDetailsUpdate, EventRow, NewEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::{event_admins, events};

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, EventRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn row_to_event(row: EventRow, admins: Vec<Uuid>) -> Result<Event, EventRepositoryError> {
    let EventRow {
        id,
        name,
        event_date,
        description,
        owner_id,
        created_at,
        updated_at: _,
    } = row;

    Event::restore(
        id,
        AdminId::new(owner_id),
        EventDraft {
            name,
            date: event_date,
            description,
        },
        admins.into_iter().map(AdminId::new),
        created_at,
    )
    .map_err(|err| EventRepositoryError::query(format!("stored event {id} is invalid: {err}")))
}

async fn load_admins(
    conn: &mut AsyncPgConnection,
    event_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Uuid>>, diesel::result::Error> {
    let rows: Vec<EventAdminRow> = event_admins::table
        .filter(event_admins::event_id.eq_any(event_ids))
        .select(EventAdminRow::as_select())
        .load(conn)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in rows {
        grouped.entry(row.event_id).or_default().push(row.admin_id);
    }
    Ok(grouped)
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewEventRow {
            id: event.id(),
            name: event.name(),
            event_date: event.date(),
            description: event.description(),
            owner_id: *event.owner().as_uuid(),
            created_at: event.created_at(),
        };
        let admin_rows: Vec<EventAdminRow> = event
            .admins()
            .iter()
            .map(|admin| EventAdminRow {
                event_id: event.id(),
                admin_id: *admin.as_uuid(),
            })
            .collect();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(events::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(event_admins::table)
                    .values(&admin_rows)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, event_id: &Uuid) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(row) = events::table
            .filter(events::id.eq(event_id))
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let mut admins = load_admins(&mut conn, &[row.id])
            .await
            .map_err(map_diesel_error)?;
        let admins = admins.remove(&row.id).unwrap_or_default();
        row_to_event(row, admins).map(Some)
    }

    async fn update_details(&self, event: &Event) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = EventDetailsUpdate {
            name: event.name(),
            event_date: event.date(),
            description: event.description(),
        };

        let updated = diesel::update(events::table.filter(events::id.eq(event.id())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, event_id: &Uuid) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(events::table.filter(events::id.eq(event_id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn add_admin(
        &self,
        event_id: &Uuid,
        admin: &AdminId,
    ) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(event_admins::table)
            .values(&EventAdminRow {
                event_id: *event_id,
                admin_id: *admin.as_uuid(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_admin(&self, admin: &AdminId) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let admin_id = *admin.as_uuid();

        let assigned = event_admins::table
            .filter(event_admins::admin_id.eq(admin_id))
            .select(event_admins::event_id);
        let rows: Vec<EventRow> = events::table
            .filter(events::owner_id.eq(admin_id).or(events::id.eq_any(assigned)))
            .order((events::event_date.asc(), events::id.asc()))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut admins = load_admins(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                let members = admins.remove(&row.id).unwrap_or_default();
                row_to_event(row, members)
            })
            .collect()
    }
}
