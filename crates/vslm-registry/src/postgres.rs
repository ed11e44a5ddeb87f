//! PostgreSQL storage implementation

use crate::audit::AuditLog;
use crate::error::{RegistryError, Result};
use crate::store::ServerStore;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;
use vslm_types::{
    EventId, EventSeverity, EventType, LifecycleEvent, Server, ServerId, ServerStatus,
};

/// PostgreSQL-backed server store and audit log
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to PostgreSQL and initialize the schema
    pub async fn connect(
        url: &str,
        timezone: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let options = PgConnectOptions::from_str(url)
            .map_err(|e| RegistryError::Connection(e.to_string()))?
            .options([("TimeZone", timezone)]);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| RegistryError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.initialize_schema().await?;
        tracing::info!("Database schema initialized");
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS servers (
                id UUID PRIMARY KEY,
                status TEXT NOT NULL,
                billing_rate DOUBLE PRECISION NOT NULL,
                region TEXT NOT NULL,
                kind TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS server_events (
                id UUID PRIMARY KEY,
                server_id UUID NOT NULL,
                event_type TEXT NOT NULL,
                message TEXT NOT NULL,
                old_status TEXT,
                new_status TEXT,
                severity TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            );
            "#,
            r#"CREATE INDEX IF NOT EXISTS server_events_server_id ON server_events(server_id);"#,
            r#"CREATE INDEX IF NOT EXISTS server_events_created_at ON server_events(created_at DESC);"#,
        ];

        for stmt in statements {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }

        Ok(())
    }

    fn server_from_row(row: &sqlx::postgres::PgRow) -> Result<Server> {
        let id: Uuid = row.try_get("id").map_err(map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(map_sqlx_error)?;
        let status = ServerStatus::from_str(&status)
            .map_err(|e| RegistryError::InvalidData(e.to_string()))?;

        Ok(Server {
            id: ServerId::from_uuid(id),
            status,
            billing_rate: row.try_get("billing_rate").map_err(map_sqlx_error)?,
            region: row.try_get("region").map_err(map_sqlx_error)?,
            kind: row.try_get("kind").map_err(map_sqlx_error)?,
            created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
            updated_at: row.try_get("updated_at").map_err(map_sqlx_error)?,
        })
    }

    fn event_from_row(row: &sqlx::postgres::PgRow) -> Result<LifecycleEvent> {
        let id: Uuid = row.try_get("id").map_err(map_sqlx_error)?;
        let server_id: Uuid = row.try_get("server_id").map_err(map_sqlx_error)?;
        let event_type: String = row.try_get("event_type").map_err(map_sqlx_error)?;
        let severity: String = row.try_get("severity").map_err(map_sqlx_error)?;
        let old_status: Option<String> = row.try_get("old_status").map_err(map_sqlx_error)?;
        let new_status: Option<String> = row.try_get("new_status").map_err(map_sqlx_error)?;

        Ok(LifecycleEvent {
            id: EventId::from_uuid(id),
            server_id: ServerId::from_uuid(server_id),
            event_type: EventType::from_str(&event_type).map_err(RegistryError::InvalidData)?,
            message: row.try_get("message").map_err(map_sqlx_error)?,
            old_status: parse_optional_status(old_status)?,
            new_status: parse_optional_status(new_status)?,
            severity: EventSeverity::from_str(&severity).map_err(RegistryError::InvalidData)?,
            created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
        })
    }
}

fn parse_optional_status(value: Option<String>) -> Result<Option<ServerStatus>> {
    value
        .map(|s| ServerStatus::from_str(&s).map_err(|e| RegistryError::InvalidData(e.to_string())))
        .transpose()
}

fn map_sqlx_error(e: sqlx::Error) -> RegistryError {
    match e {
        sqlx::Error::PoolTimedOut => RegistryError::Timeout("connection pool timed out".into()),
        other => RegistryError::Query(other.to_string()),
    }
}

#[async_trait]
impl ServerStore for PostgresStore {
    async fn insert(&self, server: Server) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO servers (id, status, billing_rate, region, kind, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(server.id.as_uuid())
        .bind(server.status.as_str())
        .bind(server.billing_rate)
        .bind(&server.region)
        .bind(&server.kind)
        .bind(server.created_at)
        .bind(server.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.as_database_error().is_some_and(|d| d.is_unique_violation()) => {
                Err(RegistryError::AlreadyExists(server.id))
            }
            Err(e) => Err(map_sqlx_error(e)),
        }
    }

    async fn get(&self, id: &ServerId) -> Result<Option<Server>> {
        let row = sqlx::query("SELECT * FROM servers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|r| Self::server_from_row(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<Server>> {
        let rows = sqlx::query("SELECT * FROM servers ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(Self::server_from_row).collect()
    }

    async fn save(&self, server: Server) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE servers
            SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(server.id.as_uuid())
        .bind(server.status.as_str())
        .bind(server.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound(server.id));
        }
        Ok(())
    }
}

#[async_trait]
impl AuditLog for PostgresStore {
    async fn append(&self, event: LifecycleEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO server_events
                (id, server_id, event_type, message, old_status, new_status, severity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(event.server_id.as_uuid())
        .bind(event.event_type.as_str())
        .bind(&event.message)
        .bind(event.old_status.map(|s| s.as_str()))
        .bind(event.new_status.map(|s| s.as_str()))
        .bind(event.severity.as_str())
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn events_for_server(&self, id: &ServerId, limit: usize) -> Result<Vec<LifecycleEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM server_events
            WHERE server_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut events: Vec<LifecycleEvent> = rows
            .iter()
            .map(Self::event_from_row)
            .collect::<Result<_>>()?;
        events.reverse();
        Ok(events)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<LifecycleEvent>> {
        let rows = sqlx::query("SELECT * FROM server_events ORDER BY created_at DESC LIMIT $1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut events: Vec<LifecycleEvent> = rows
            .iter()
            .map(Self::event_from_row)
            .collect::<Result<_>>()?;
        events.reverse();
        Ok(events)
    }
}
