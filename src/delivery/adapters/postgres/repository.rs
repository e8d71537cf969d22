//! `PostgreSQL` repository implementation for delivery task storage.

use super::{
    models::{DeliveryBindingRow, DeliveryTaskRow},
    schema::{delivery_task_parcels, delivery_tasks},
};
use crate::common::postgres::{AbnormalColumns, PgPool, run_blocking};
use crate::delivery::{
    domain::{
        DeliveryBinding, DeliveryStatus, DeliveryTask, DeliveryTaskId,
        PersistedDeliveryBindingData, PersistedDeliveryTaskData, PersistedSignInfo, SignInfo,
        SignType,
    },
    ports::{DeliveryRepositoryError, DeliveryRepositoryResult, DeliveryTaskRepository},
};
use crate::parcel::domain::ParcelId;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed delivery task repository.
#[derive(Debug, Clone)]
pub struct PostgresDeliveryTaskRepository {
    pool: PgPool,
}

impl PostgresDeliveryTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryTaskRepository for PostgresDeliveryTaskRepository {
    async fn store(&self, task: &DeliveryTask) -> DeliveryRepositoryResult<()> {
        let row = to_task_row(task)?;
        let task_id = task.id().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(delivery_tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DeliveryRepositoryError::DuplicateTask(task_id)
                    }
                    _ => DeliveryRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &DeliveryTask) -> DeliveryRepositoryResult<()> {
        let row = to_task_row(task)?;
        let task_id = task.id().clone();
        run_blocking(&self.pool, move |connection| {
            let affected =
                diesel::update(delivery_tasks::table.filter(delivery_tasks::id.eq(&row.id)))
                    .set(&row)
                    .execute(connection)
                    .map_err(DeliveryRepositoryError::persistence)?;
            if affected == 0 {
                return Err(DeliveryRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: &DeliveryTaskId,
    ) -> DeliveryRepositoryResult<Option<DeliveryTask>> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            delivery_tasks::table
                .filter(delivery_tasks::id.eq(&lookup))
                .select(DeliveryTaskRow::as_select())
                .first::<DeliveryTaskRow>(connection)
                .optional()
                .map_err(DeliveryRepositoryError::persistence)?
                .map(row_to_task)
                .transpose()
        })
        .await
    }

    async fn find_by_courier(
        &self,
        courier_id: &str,
        status: Option<DeliveryStatus>,
    ) -> DeliveryRepositoryResult<Vec<DeliveryTask>> {
        let courier = courier_id.trim().to_owned();
        run_blocking(&self.pool, move |connection| {
            let mut query = delivery_tasks::table
                .filter(delivery_tasks::courier_id.eq(courier))
                .into_boxed();
            if let Some(wanted) = status {
                query = query.filter(delivery_tasks::status.eq(wanted.as_str()));
            }
            query
                .order((delivery_tasks::created_at.desc(), delivery_tasks::id.desc()))
                .select(DeliveryTaskRow::as_select())
                .load::<DeliveryTaskRow>(connection)
                .map_err(DeliveryRepositoryError::persistence)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn replace_bindings(
        &self,
        id: &DeliveryTaskId,
        bindings: &[DeliveryBinding],
    ) -> DeliveryRepositoryResult<()> {
        let lookup = id.as_str().to_owned();
        let rows = bindings
            .iter()
            .map(to_binding_row)
            .collect::<DeliveryRepositoryResult<Vec<_>>>()?;
        run_blocking(&self.pool, move |connection| {
            connection.transaction(|tx| {
                diesel::delete(
                    delivery_task_parcels::table.filter(delivery_task_parcels::task_id.eq(&lookup)),
                )
                .execute(tx)?;
                if !rows.is_empty() {
                    diesel::insert_into(delivery_task_parcels::table)
                        .values(&rows)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn bindings_for(
        &self,
        id: &DeliveryTaskId,
    ) -> DeliveryRepositoryResult<Vec<DeliveryBinding>> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            delivery_task_parcels::table
                .filter(delivery_task_parcels::task_id.eq(&lookup))
                .order(delivery_task_parcels::delivery_order.asc())
                .select(DeliveryBindingRow::as_select())
                .load::<DeliveryBindingRow>(connection)
                .map_err(DeliveryRepositoryError::persistence)?
                .into_iter()
                .map(row_to_binding)
                .collect()
        })
        .await
    }

    async fn find_binding(
        &self,
        id: &DeliveryTaskId,
        parcel_id: &ParcelId,
    ) -> DeliveryRepositoryResult<Option<DeliveryBinding>> {
        let task_lookup = id.as_str().to_owned();
        let parcel_lookup = parcel_id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            delivery_task_parcels::table
                .filter(delivery_task_parcels::task_id.eq(&task_lookup))
                .filter(delivery_task_parcels::parcel_id.eq(&parcel_lookup))
                .select(DeliveryBindingRow::as_select())
                .first::<DeliveryBindingRow>(connection)
                .optional()
                .map_err(DeliveryRepositoryError::persistence)?
                .map(row_to_binding)
                .transpose()
        })
        .await
    }

    async fn update_binding(&self, binding: &DeliveryBinding) -> DeliveryRepositoryResult<()> {
        let row = to_binding_row(binding)?;
        let task_id = binding.task_id().clone();
        let parcel_id = binding.parcel_id().clone();
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(
                delivery_task_parcels::table
                    .filter(delivery_task_parcels::task_id.eq(&row.task_id))
                    .filter(delivery_task_parcels::parcel_id.eq(&row.parcel_id)),
            )
            .set(&row)
            .execute(connection)
            .map_err(DeliveryRepositoryError::persistence)?;
            if affected == 0 {
                return Err(DeliveryRepositoryError::BindingNotFound { task_id, parcel_id });
            }
            Ok(())
        })
        .await
    }

    async fn count_bindings(&self, id: &DeliveryTaskId) -> DeliveryRepositoryResult<u32> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let count: i64 = delivery_task_parcels::table
                .filter(delivery_task_parcels::task_id.eq(&lookup))
                .count()
                .get_result(connection)
                .map_err(DeliveryRepositoryError::persistence)?;
            u32::try_from(count).map_err(DeliveryRepositoryError::persistence)
        })
        .await
    }
}

impl From<DieselError> for DeliveryRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn to_task_row(task: &DeliveryTask) -> DeliveryRepositoryResult<DeliveryTaskRow> {
    let abnormal = AbnormalColumns::from_info(task.abnormal());
    Ok(DeliveryTaskRow {
        id: task.id().as_str().to_owned(),
        delivery_area: task.delivery_area().to_owned(),
        courier_id: task.courier_id().to_owned(),
        courier_name: task.courier_name().to_owned(),
        start_node: task.start_node().to_owned(),
        status: task.status().as_str().to_owned(),
        bound_count: i32::try_from(task.bound_count())
            .map_err(DeliveryRepositoryError::persistence)?,
        started_at: task.started_at(),
        completed_at: task.completed_at(),
        abnormal_type: abnormal.abnormal_type,
        abnormal_reason: abnormal.reason,
        abnormal_handler: abnormal.handler,
        abnormal_reported_at: abnormal.reported_at,
        abnormal_handle_result: abnormal.handle_result,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: DeliveryTaskRow) -> DeliveryRepositoryResult<DeliveryTask> {
    let id = DeliveryTaskId::new(row.id).map_err(DeliveryRepositoryError::persistence)?;
    let status = DeliveryStatus::try_from(row.status.as_str())
        .map_err(DeliveryRepositoryError::persistence)?;
    let bound_count =
        u32::try_from(row.bound_count).map_err(DeliveryRepositoryError::persistence)?;
    let abnormal = AbnormalColumns {
        abnormal_type: row.abnormal_type,
        reason: row.abnormal_reason,
        handler: row.abnormal_handler,
        reported_at: row.abnormal_reported_at,
        handle_result: row.abnormal_handle_result,
    }
    .into_info();

    Ok(DeliveryTask::from_persisted(PersistedDeliveryTaskData {
        id,
        delivery_area: row.delivery_area,
        courier_id: row.courier_id,
        courier_name: row.courier_name,
        start_node: row.start_node,
        status,
        bound_count,
        started_at: row.started_at,
        completed_at: row.completed_at,
        abnormal,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn to_binding_row(binding: &DeliveryBinding) -> DeliveryRepositoryResult<DeliveryBindingRow> {
    let sign = binding.sign_info();
    Ok(DeliveryBindingRow {
        task_id: binding.task_id().as_str().to_owned(),
        parcel_id: binding.parcel_id().as_str().to_owned(),
        delivery_order: i32::try_from(binding.delivery_order())
            .map_err(DeliveryRepositoryError::persistence)?,
        signer_name: sign.map(|info| info.signer_name().to_owned()),
        signer_phone: sign.map(|info| info.signer_phone().to_owned()),
        signed_at: sign.map(SignInfo::signed_at),
        sign_type: sign.map(|info| info.sign_type().as_str().to_owned()),
        sign_remark: sign.map(|info| info.remark().to_owned()),
        bound_at: binding.bound_at(),
    })
}

fn row_to_binding(row: DeliveryBindingRow) -> DeliveryRepositoryResult<DeliveryBinding> {
    let sign_info = match (row.signed_at, row.sign_type) {
        (Some(signed_at), Some(raw_type)) => {
            Some(SignInfo::from_persisted(PersistedSignInfo {
                signer_name: row.signer_name.unwrap_or_default(),
                signer_phone: row.signer_phone.unwrap_or_default(),
                signed_at,
                sign_type: SignType::try_from(raw_type.as_str())
                    .map_err(DeliveryRepositoryError::persistence)?,
                remark: row.sign_remark.unwrap_or_default(),
            }))
        }
        _ => None,
    };

    Ok(DeliveryBinding::from_persisted(PersistedDeliveryBindingData {
        task_id: DeliveryTaskId::new(row.task_id).map_err(DeliveryRepositoryError::persistence)?,
        parcel_id: ParcelId::new(row.parcel_id).map_err(DeliveryRepositoryError::persistence)?,
        delivery_order: u32::try_from(row.delivery_order)
            .map_err(DeliveryRepositoryError::persistence)?,
        sign_info,
        bound_at: row.bound_at,
    }))
}
