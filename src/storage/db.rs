// src/storage/db.rs
// DOCUMENTATION: PostgreSQL-backed storage engine
// PURPOSE: Persist entities in relational tables with foreign keys; staged
// writes are committed in a single transaction per `save`

use super::{scope, StorageEngine, StorageResult};
use crate::models::{Amenity, City, Entity, EntityKind, Place, Review, State, User};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{FromRow, PgConnection};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Table definitions, parents first
/// DOCUMENTATION: Ownership is expressed with ON DELETE CASCADE so removing
/// a state, city, user or place also removes what hangs off it.
const SCHEMA: [&str; 7] = [
    r#"
    CREATE TABLE IF NOT EXISTS states (
        id UUID PRIMARY KEY,
        name VARCHAR(128) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email VARCHAR(128) NOT NULL,
        password VARCHAR(128) NOT NULL,
        first_name VARCHAR(128),
        last_name VARCHAR(128),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS amenities (
        id UUID PRIMARY KEY,
        name VARCHAR(128) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        id UUID PRIMARY KEY,
        state_id UUID NOT NULL REFERENCES states(id) ON DELETE CASCADE,
        name VARCHAR(128) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS places (
        id UUID PRIMARY KEY,
        city_id UUID NOT NULL REFERENCES cities(id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name VARCHAR(128) NOT NULL,
        description VARCHAR(1024),
        number_rooms INTEGER NOT NULL DEFAULT 0,
        number_bathrooms INTEGER NOT NULL DEFAULT 0,
        max_guest INTEGER NOT NULL DEFAULT 0,
        price_by_night INTEGER NOT NULL DEFAULT 0,
        latitude DOUBLE PRECISION,
        longitude DOUBLE PRECISION,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id UUID PRIMARY KEY,
        place_id UUID NOT NULL REFERENCES places(id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        text VARCHAR(1024) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS place_amenity (
        place_id UUID NOT NULL REFERENCES places(id) ON DELETE CASCADE,
        amenity_id UUID NOT NULL REFERENCES amenities(id) ON DELETE CASCADE,
        PRIMARY KEY (place_id, amenity_id)
    )
    "#,
];

/// Uncommitted changes of one request scope
#[derive(Debug, Default)]
struct Session {
    pending: HashMap<String, Entity>,
    deleted: HashMap<String, Entity>,
}

impl Session {
    fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.deleted.is_empty()
    }
}

/// Relational storage engine
/// DOCUMENTATION: Reads always go to the database and therefore only see
/// committed rows. `new`/`delete` record changes in the caller's scope
/// session; `save` applies that session inside one transaction and rolls
/// back on any failure.
pub struct DbStorage {
    pool: PgPool,
    sessions: Mutex<HashMap<u64, Session>>,
}

impl DbStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create every table that does not exist yet
    pub async fn init_schema(&self) -> StorageResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                log::error!("Failed to create schema: {}", e);
                e
            })?;
        }
        Ok(())
    }

    /// Drop all tables; used when running against a test database
    pub async fn drop_all(&self) -> StorageResult<()> {
        log::warn!("Dropping all tables (test environment)");
        sqlx::query(
            "DROP TABLE IF EXISTS place_amenity, reviews, places, cities, amenities, users, states CASCADE",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_all<T>(&self, kind: EntityKind) -> StorageResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!("SELECT * FROM {}", kind.table());
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    async fn fetch_one<T>(&self, kind: EntityKind, id: Uuid) -> StorageResult<Option<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!("SELECT * FROM {} WHERE id = $1", kind.table());
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Explicit join: attach linked amenity ids to each place
    async fn attach_amenities(&self, places: &mut [Place]) -> StorageResult<()> {
        if places.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = places.iter().map(|p| p.id).collect();
        let links: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT place_id, amenity_id FROM place_amenity
            WHERE place_id = ANY($1)
            ORDER BY amenity_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_place: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (place_id, amenity_id) in links {
            by_place.entry(place_id).or_default().push(amenity_id);
        }
        for place in places.iter_mut() {
            place.amenity_ids = by_place.remove(&place.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn fetch_kind(&self, kind: EntityKind) -> StorageResult<Vec<Entity>> {
        Ok(match kind {
            EntityKind::Amenity => wrap(self.fetch_all::<Amenity>(kind).await?),
            EntityKind::City => wrap(self.fetch_all::<City>(kind).await?),
            EntityKind::Place => {
                let mut places = self.fetch_all::<Place>(kind).await?;
                self.attach_amenities(&mut places).await?;
                wrap(places)
            }
            EntityKind::Review => wrap(self.fetch_all::<Review>(kind).await?),
            EntityKind::State => wrap(self.fetch_all::<State>(kind).await?),
            EntityKind::User => wrap(self.fetch_all::<User>(kind).await?),
        })
    }

    async fn commit(&self, session: Session) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;

        for entity in session.deleted.values() {
            let sql = format!("DELETE FROM {} WHERE id = $1", entity.kind().table());
            sqlx::query(&sql).bind(entity.id()).execute(&mut *tx).await?;
        }

        let mut pending: Vec<&Entity> = session.pending.values().collect();
        pending.sort_by_key(|entity| (entity.kind().write_order(), entity.created_at()));
        for entity in pending {
            upsert(&mut *tx, entity).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn wrap<T: Into<Entity>>(rows: Vec<T>) -> Vec<Entity> {
    rows.into_iter().map(Into::into).collect()
}

/// Insert or overwrite one row (and, for places, its amenity links)
async fn upsert(conn: &mut PgConnection, entity: &Entity) -> StorageResult<()> {
    match entity {
        Entity::State(state) => {
            sqlx::query(
                r#"
                INSERT INTO states (id, name, created_at, updated_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(state.id)
            .bind(&state.name)
            .bind(state.created_at)
            .bind(state.updated_at)
            .execute(&mut *conn)
            .await?;
        }
        Entity::User(user) => {
            sqlx::query(
                r#"
                INSERT INTO users (id, email, password, first_name, last_name, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO UPDATE SET
                    email = EXCLUDED.email,
                    password = EXCLUDED.password,
                    first_name = EXCLUDED.first_name,
                    last_name = EXCLUDED.last_name,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&mut *conn)
            .await?;
        }
        Entity::Amenity(amenity) => {
            sqlx::query(
                r#"
                INSERT INTO amenities (id, name, created_at, updated_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(amenity.id)
            .bind(&amenity.name)
            .bind(amenity.created_at)
            .bind(amenity.updated_at)
            .execute(&mut *conn)
            .await?;
        }
        Entity::City(city) => {
            sqlx::query(
                r#"
                INSERT INTO cities (id, state_id, name, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO UPDATE SET
                    state_id = EXCLUDED.state_id,
                    name = EXCLUDED.name,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(city.id)
            .bind(city.state_id)
            .bind(&city.name)
            .bind(city.created_at)
            .bind(city.updated_at)
            .execute(&mut *conn)
            .await?;
        }
        Entity::Place(place) => {
            sqlx::query(
                r#"
                INSERT INTO places (
                    id, city_id, user_id, name, description,
                    number_rooms, number_bathrooms, max_guest, price_by_night,
                    latitude, longitude, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (id) DO UPDATE SET
                    city_id = EXCLUDED.city_id,
                    user_id = EXCLUDED.user_id,
                    name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    number_rooms = EXCLUDED.number_rooms,
                    number_bathrooms = EXCLUDED.number_bathrooms,
                    max_guest = EXCLUDED.max_guest,
                    price_by_night = EXCLUDED.price_by_night,
                    latitude = EXCLUDED.latitude,
                    longitude = EXCLUDED.longitude,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(place.id) // $1
            .bind(place.city_id) // $2
            .bind(place.user_id) // $3
            .bind(&place.name) // $4
            .bind(&place.description) // $5
            .bind(place.number_rooms) // $6
            .bind(place.number_bathrooms) // $7
            .bind(place.max_guest) // $8
            .bind(place.price_by_night) // $9
            .bind(place.latitude) // $10
            .bind(place.longitude) // $11
            .bind(place.created_at) // $12
            .bind(place.updated_at) // $13
            .execute(&mut *conn)
            .await?;

            sqlx::query("DELETE FROM place_amenity WHERE place_id = $1")
                .bind(place.id)
                .execute(&mut *conn)
                .await?;
            for amenity_id in &place.amenity_ids {
                sqlx::query("INSERT INTO place_amenity (place_id, amenity_id) VALUES ($1, $2)")
                    .bind(place.id)
                    .bind(amenity_id)
                    .execute(&mut *conn)
                    .await?;
            }
        }
        Entity::Review(review) => {
            sqlx::query(
                r#"
                INSERT INTO reviews (id, place_id, user_id, text, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE SET
                    place_id = EXCLUDED.place_id,
                    user_id = EXCLUDED.user_id,
                    text = EXCLUDED.text,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(review.id)
            .bind(review.place_id)
            .bind(review.user_id)
            .bind(&review.text)
            .bind(review.created_at)
            .bind(review.updated_at)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

#[async_trait]
impl StorageEngine for DbStorage {
    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<HashMap<String, Entity>> {
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => EntityKind::ALL.to_vec(),
        };

        let mut objects = HashMap::new();
        for kind in kinds {
            for entity in self.fetch_kind(kind).await? {
                objects.insert(entity.key(), entity);
            }
        }
        Ok(objects)
    }

    async fn new(&self, entity: Entity) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(scope::current()).or_default();
        let key = entity.key();
        session.deleted.remove(&key);
        session.pending.insert(key, entity);
    }

    async fn save(&self) -> StorageResult<()> {
        let session = self.sessions.lock().await.remove(&scope::current());
        let Some(session) = session.filter(|session| !session.is_empty()) else {
            return Ok(());
        };

        let (writes, deletes) = (session.pending.len(), session.deleted.len());
        self.commit(session).await.map_err(|e| {
            log::error!("Transaction rolled back: {}", e);
            e
        })?;

        log::debug!("Committed {} writes and {} deletes", writes, deletes);
        Ok(())
    }

    async fn delete(&self, entity: Option<&Entity>) -> StorageResult<()> {
        if let Some(entity) = entity {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.entry(scope::current()).or_default();
            let key = entity.key();
            session.pending.remove(&key);
            session.deleted.insert(key, entity.clone());
        }
        Ok(())
    }

    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        Ok(match kind {
            EntityKind::Amenity => self.fetch_one::<Amenity>(kind, id).await?.map(Into::into),
            EntityKind::City => self.fetch_one::<City>(kind, id).await?.map(Into::into),
            EntityKind::Place => match self.fetch_one::<Place>(kind, id).await? {
                Some(place) => {
                    let mut places = [place];
                    self.attach_amenities(&mut places).await?;
                    let [place] = places;
                    Some(place.into())
                }
                None => None,
            },
            EntityKind::Review => self.fetch_one::<Review>(kind, id).await?.map(Into::into),
            EntityKind::State => self.fetch_one::<State>(kind, id).await?.map(Into::into),
            EntityKind::User => self.fetch_one::<User>(kind, id).await?.map(Into::into),
        })
    }

    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize> {
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => EntityKind::ALL.to_vec(),
        };

        let mut total = 0usize;
        for kind in kinds {
            let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
            let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
            total += count as usize;
        }
        Ok(total)
    }

    async fn reload(&self) -> StorageResult<()> {
        self.init_schema().await?;
        self.sessions.lock().await.remove(&scope::current());
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        let session = self.sessions.lock().await.remove(&scope::current());
        if let Some(session) = session.filter(|session| !session.is_empty()) {
            log::debug!(
                "Discarding {} uncommitted changes",
                session.pending.len() + session.deleted.len()
            );
        }
        Ok(())
    }

    async fn shutdown(&self) {
        self.pool.close().await;
        log::info!("Database pool closed");
    }

    fn backend_name(&self) -> &'static str {
        "db"
    }
}

// =============================================================================
// Tests (require running Postgres)
// =============================================================================
