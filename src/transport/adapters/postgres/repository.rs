//! `PostgreSQL` repository implementation for transport task storage.

use super::{
    models::{NewTransportBindingRow, TransportTaskRow},
    schema::{transport_task_parcels, transport_tasks},
};
use crate::common::postgres::{AbnormalColumns, PgPool, run_blocking};
use crate::parcel::domain::ParcelId;
use crate::transport::{
    domain::{
        PersistedTransportTaskData, TransportBinding, TransportRoute, TransportStatus,
        TransportTask, TransportTaskId,
    },
    ports::{TransportRepositoryError, TransportRepositoryResult, TransportTaskRepository},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed transport task repository.
#[derive(Debug, Clone)]
pub struct PostgresTransportTaskRepository {
    pool: PgPool,
}

impl PostgresTransportTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransportTaskRepository for PostgresTransportTaskRepository {
    async fn store(&self, task: &TransportTask) -> TransportRepositoryResult<()> {
        let row = to_task_row(task)?;
        let task_id = task.id().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(transport_tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TransportRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TransportRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &TransportTask) -> TransportRepositoryResult<()> {
        let row = to_task_row(task)?;
        let task_id = task.id().clone();
        run_blocking(&self.pool, move |connection| {
            let affected =
                diesel::update(transport_tasks::table.filter(transport_tasks::id.eq(&row.id)))
                    .set(&row)
                    .execute(connection)
                    .map_err(TransportRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TransportRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: &TransportTaskId,
    ) -> TransportRepositoryResult<Option<TransportTask>> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            transport_tasks::table
                .filter(transport_tasks::id.eq(&lookup))
                .select(TransportTaskRow::as_select())
                .first::<TransportTaskRow>(connection)
                .optional()
                .map_err(TransportRepositoryError::persistence)?
                .map(row_to_task)
                .transpose()
        })
        .await
    }

    async fn find_by_driver(
        &self,
        driver_id: &str,
        status: Option<TransportStatus>,
    ) -> TransportRepositoryResult<Vec<TransportTask>> {
        let driver = driver_id.trim().to_owned();
        run_blocking(&self.pool, move |connection| {
            let mut query = transport_tasks::table
                .filter(transport_tasks::driver_id.eq(driver))
                .into_boxed();
            if let Some(wanted) = status {
                query = query.filter(transport_tasks::status.eq(wanted.as_str()));
            }
            query
                .order((transport_tasks::created_at.desc(), transport_tasks::id.desc()))
                .select(TransportTaskRow::as_select())
                .load::<TransportTaskRow>(connection)
                .map_err(TransportRepositoryError::persistence)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn bound_parcel_ids(
        &self,
        id: &TransportTaskId,
    ) -> TransportRepositoryResult<Vec<ParcelId>> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            transport_task_parcels::table
                .filter(transport_task_parcels::task_id.eq(&lookup))
                .order(transport_task_parcels::id.asc())
                .select(transport_task_parcels::parcel_id)
                .load::<String>(connection)
                .map_err(TransportRepositoryError::persistence)?
                .into_iter()
                .map(|raw| ParcelId::new(raw).map_err(TransportRepositoryError::persistence))
                .collect()
        })
        .await
    }

    async fn insert_bindings(
        &self,
        bindings: &[TransportBinding],
    ) -> TransportRepositoryResult<()> {
        let Some(first) = bindings.first() else {
            return Ok(());
        };
        let task_id = first.task_id().clone();
        let rows: Vec<NewTransportBindingRow> = bindings.iter().map(to_binding_row).collect();
        run_blocking(&self.pool, move |connection| {
            connection.transaction(|tx| {
                let candidates: Vec<&str> = rows.iter().map(|row| row.parcel_id.as_str()).collect();
                let existing = transport_task_parcels::table
                    .filter(transport_task_parcels::task_id.eq(task_id.as_str()))
                    .filter(transport_task_parcels::parcel_id.eq_any(&candidates))
                    .select(transport_task_parcels::parcel_id)
                    .first::<String>(tx)
                    .optional()
                    .map_err(TransportRepositoryError::persistence)?;
                if let Some(raw) = existing {
                    return Err(duplicate_binding(task_id.clone(), &raw));
                }
                diesel::insert_into(transport_task_parcels::table)
                    .values(&rows)
                    .execute(tx)
                    .map_err(TransportRepositoryError::persistence)?;
                Ok(())
            })
        })
        .await
    }

    async fn count_bindings(&self, id: &TransportTaskId) -> TransportRepositoryResult<u32> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let count: i64 = transport_task_parcels::table
                .filter(transport_task_parcels::task_id.eq(&lookup))
                .count()
                .get_result(connection)
                .map_err(TransportRepositoryError::persistence)?;
            u32::try_from(count).map_err(TransportRepositoryError::persistence)
        })
        .await
    }
}

impl From<DieselError> for TransportRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn duplicate_binding(task_id: TransportTaskId, raw_parcel_id: &str) -> TransportRepositoryError {
    match ParcelId::new(raw_parcel_id) {
        Ok(parcel_id) => TransportRepositoryError::DuplicateBinding { task_id, parcel_id },
        Err(err) => TransportRepositoryError::persistence(err),
    }
}

fn to_binding_row(binding: &TransportBinding) -> NewTransportBindingRow {
    NewTransportBindingRow {
        task_id: binding.task_id().as_str().to_owned(),
        parcel_id: binding.parcel_id().as_str().to_owned(),
        bound_at: binding.bound_at(),
    }
}

fn to_task_row(task: &TransportTask) -> TransportRepositoryResult<TransportTaskRow> {
    let abnormal = AbnormalColumns::from_info(task.abnormal());
    Ok(TransportTaskRow {
        id: task.id().as_str().to_owned(),
        start_node: task.start_node().to_owned(),
        end_node: task.end_node().to_owned(),
        vehicle_id: task.vehicle_id().to_owned(),
        driver_id: task.driver_id().map(str::to_owned),
        driver_name: task.driver_name().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        bound_count: i32::try_from(task.bound_count())
            .map_err(TransportRepositoryError::persistence)?,
        estimated_arrival: task.estimated_arrival(),
        started_at: task.started_at(),
        arrived_at: task.arrived_at(),
        completed_at: task.completed_at(),
        route_json: task.route().route_json().map(str::to_owned),
        distance_km: task.route().distance_km(),
        abnormal_type: abnormal.abnormal_type,
        abnormal_reason: abnormal.reason,
        abnormal_handler: abnormal.handler,
        abnormal_reported_at: abnormal.reported_at,
        abnormal_handle_result: abnormal.handle_result,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TransportTaskRow) -> TransportRepositoryResult<TransportTask> {
    let id = TransportTaskId::new(row.id).map_err(TransportRepositoryError::persistence)?;
    let status = TransportStatus::try_from(row.status.as_str())
        .map_err(TransportRepositoryError::persistence)?;
    let route = TransportRoute::new(row.route_json.as_deref().unwrap_or_default(), row.distance_km)
        .map_err(TransportRepositoryError::persistence)?;
    let bound_count =
        u32::try_from(row.bound_count).map_err(TransportRepositoryError::persistence)?;
    let abnormal = AbnormalColumns {
        abnormal_type: row.abnormal_type,
        reason: row.abnormal_reason,
        handler: row.abnormal_handler,
        reported_at: row.abnormal_reported_at,
        handle_result: row.abnormal_handle_result,
    }
    .into_info();

    Ok(TransportTask::from_persisted(PersistedTransportTaskData {
        id,
        start_node: row.start_node,
        end_node: row.end_node,
        vehicle_id: row.vehicle_id,
        driver_id: row.driver_id,
        driver_name: row.driver_name,
        status,
        bound_count,
        estimated_arrival: row.estimated_arrival,
        started_at: row.started_at,
        arrived_at: row.arrived_at,
        completed_at: row.completed_at,
        route,
        abnormal,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
