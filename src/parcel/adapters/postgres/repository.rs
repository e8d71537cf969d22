//! `PostgreSQL` repository implementation for parcel storage.

use super::{
    models::{AbnormalRecordRow, ParcelRow, TraceRow},
    schema::{abnormal_records, parcel_traces, parcels},
};
use crate::common::postgres::{PgPool, run_blocking};
use crate::parcel::{
    domain::{
        AbnormalRecord, AbnormalRecordId, AbnormalRecordStatus, Contact, Dimensions, GeoPoint,
        NodeType, Parcel, ParcelId, ParcelStatus, ParcelStatusUpdate, ParcelTrace,
        PersistedAbnormalRecordData, PersistedParcelData, PersistedTraceData, Region, TraceId,
    },
    ports::{ParcelRepository, ParcelRepositoryError, ParcelRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed parcel repository.
#[derive(Debug, Clone)]
pub struct PostgresParcelRepository {
    pool: PgPool,
}

impl PostgresParcelRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParcelRepository for PostgresParcelRepository {
    async fn store(&self, parcel: &Parcel) -> ParcelRepositoryResult<()> {
        let row = to_parcel_row(parcel);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(parcels::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        duplicate_parcel(&row.id)
                    }
                    _ => ParcelRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, parcel: &Parcel) -> ParcelRepositoryResult<()> {
        let row = to_parcel_row(parcel);
        let id = parcel.id().clone();
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(
                parcels::table
                    .filter(parcels::id.eq(&row.id))
                    .filter(parcels::deleted_at.is_null()),
            )
            .set(&row)
            .execute(connection)
            .map_err(ParcelRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ParcelRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: &ParcelId) -> ParcelRepositoryResult<Option<Parcel>> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            find_live_row(connection, &lookup)?
                .map(row_to_parcel)
                .transpose()
        })
        .await
    }

    async fn update_status(
        &self,
        id: &ParcelId,
        update: &ParcelStatusUpdate,
        at: DateTime<Utc>,
    ) -> ParcelRepositoryResult<()> {
        let parcel_id = id.clone();
        let status_update = update.clone();
        run_blocking(&self.pool, move |connection| {
            connection.transaction(|tx| {
                let row = find_live_row(tx, parcel_id.as_str())?
                    .ok_or_else(|| ParcelRepositoryError::NotFound(parcel_id.clone()))?;
                let mut parcel = row_to_parcel(row)?;
                parcel.apply_status_update(&status_update, at);
                diesel::update(parcels::table.filter(parcels::id.eq(parcel_id.as_str())))
                    .set(&to_parcel_row(&parcel))
                    .execute(tx)
                    .map_err(ParcelRepositoryError::persistence)?;
                Ok(())
            })
        })
        .await
    }

    async fn append_trace(&self, trace: &ParcelTrace) -> ParcelRepositoryResult<()> {
        let row = to_trace_row(trace);
        let trace_id = trace.id().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(parcel_traces::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ParcelRepositoryError::DuplicateTrace(trace_id)
                    }
                    _ => ParcelRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn traces_for(&self, id: &ParcelId) -> ParcelRepositoryResult<Vec<ParcelTrace>> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            parcel_traces::table
                .filter(parcel_traces::parcel_id.eq(&lookup))
                .order(parcel_traces::operated_at.asc())
                .select(TraceRow::as_select())
                .load::<TraceRow>(connection)
                .map_err(ParcelRepositoryError::persistence)?
                .into_iter()
                .map(row_to_trace)
                .collect()
        })
        .await
    }

    async fn store_abnormal_record(&self, record: &AbnormalRecord) -> ParcelRepositoryResult<()> {
        let row = to_abnormal_row(record);
        let record_id = record.id().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(abnormal_records::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ParcelRepositoryError::DuplicateAbnormalRecord(record_id)
                    }
                    _ => ParcelRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_abnormal_record(&self, record: &AbnormalRecord) -> ParcelRepositoryResult<()> {
        let row = to_abnormal_row(record);
        let record_id = record.id().clone();
        run_blocking(&self.pool, move |connection| {
            let affected =
                diesel::update(abnormal_records::table.filter(abnormal_records::id.eq(&row.id)))
                    .set(&row)
                    .execute(connection)
                    .map_err(ParcelRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ParcelRepositoryError::AbnormalRecordNotFound(record_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_abnormal_record(
        &self,
        id: &AbnormalRecordId,
    ) -> ParcelRepositoryResult<Option<AbnormalRecord>> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            abnormal_records::table
                .filter(abnormal_records::id.eq(&lookup))
                .select(AbnormalRecordRow::as_select())
                .first::<AbnormalRecordRow>(connection)
                .optional()
                .map_err(ParcelRepositoryError::persistence)?
                .map(row_to_abnormal_record)
                .transpose()
        })
        .await
    }

    async fn abnormal_records_for(
        &self,
        id: &ParcelId,
    ) -> ParcelRepositoryResult<Vec<AbnormalRecord>> {
        let lookup = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            abnormal_records::table
                .filter(abnormal_records::parcel_id.eq(&lookup))
                .order((abnormal_records::created_at.asc(), abnormal_records::id.asc()))
                .select(AbnormalRecordRow::as_select())
                .load::<AbnormalRecordRow>(connection)
                .map_err(ParcelRepositoryError::persistence)?
                .into_iter()
                .map(row_to_abnormal_record)
                .collect()
        })
        .await
    }
}

impl From<DieselError> for ParcelRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn duplicate_parcel(raw_id: &str) -> ParcelRepositoryError {
    match ParcelId::new(raw_id) {
        Ok(id) => ParcelRepositoryError::DuplicateParcel(id),
        Err(err) => ParcelRepositoryError::persistence(err),
    }
}

fn find_live_row(
    connection: &mut PgConnection,
    id: &str,
) -> ParcelRepositoryResult<Option<ParcelRow>> {
    parcels::table
        .filter(parcels::id.eq(id))
        .filter(parcels::deleted_at.is_null())
        .select(ParcelRow::as_select())
        .first::<ParcelRow>(connection)
        .optional()
        .map_err(ParcelRepositoryError::persistence)
}

fn to_parcel_row(parcel: &Parcel) -> ParcelRow {
    let dimensions = parcel.dimensions();
    ParcelRow {
        id: parcel.id().as_str().to_owned(),
        sender_name: parcel.sender().name().to_owned(),
        sender_phone: parcel.sender().phone().to_owned(),
        sender_address: parcel.sender().address().to_owned(),
        receiver_name: parcel.receiver().name().to_owned(),
        receiver_phone: parcel.receiver().phone().to_owned(),
        receiver_address: parcel.receiver().address().to_owned(),
        receiver_province: parcel.receiver_region().province().to_owned(),
        receiver_city: parcel.receiver_region().city().to_owned(),
        receiver_district: parcel.receiver_region().district().to_owned(),
        weight_kg: dimensions.weight_kg(),
        length_cm: dimensions.length_cm(),
        width_cm: dimensions.width_cm(),
        height_cm: dimensions.height_cm(),
        status: parcel.status().as_str().to_owned(),
        abnormal_reason: parcel.abnormal_reason().map(str::to_owned),
        abnormal_handler: parcel.abnormal_handler().map(str::to_owned),
        created_at: parcel.created_at(),
        updated_at: parcel.updated_at(),
        deleted_at: parcel.deleted_at(),
    }
}

fn row_to_parcel(row: ParcelRow) -> ParcelRepositoryResult<Parcel> {
    let id = ParcelId::new(row.id).map_err(ParcelRepositoryError::persistence)?;
    let sender = Contact::new(row.sender_name, row.sender_phone, row.sender_address)
        .map_err(ParcelRepositoryError::persistence)?;
    let receiver = Contact::new(row.receiver_name, row.receiver_phone, row.receiver_address)
        .map_err(ParcelRepositoryError::persistence)?;
    let receiver_region = Region::new(
        row.receiver_province,
        row.receiver_city,
        row.receiver_district,
    )
    .map_err(ParcelRepositoryError::persistence)?;
    let weighed = Dimensions::weighing(row.weight_kg).map_err(ParcelRepositoryError::persistence)?;
    let dimensions = match (row.length_cm, row.width_cm, row.height_cm) {
        (Some(length), Some(width), Some(height)) => weighed
            .with_size(length, width, height)
            .map_err(ParcelRepositoryError::persistence)?,
        _ => weighed,
    };
    let status =
        ParcelStatus::try_from(row.status.as_str()).map_err(ParcelRepositoryError::persistence)?;

    Ok(Parcel::from_persisted(PersistedParcelData {
        id,
        sender,
        receiver,
        receiver_region,
        dimensions,
        status,
        abnormal_reason: row.abnormal_reason,
        abnormal_handler: row.abnormal_handler,
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
    }))
}

fn to_trace_row(trace: &ParcelTrace) -> TraceRow {
    TraceRow {
        id: trace.id().as_str().to_owned(),
        parcel_id: trace.parcel_id().as_str().to_owned(),
        node_type: trace.node_type().as_str().to_owned(),
        node_name: trace.node_name().to_owned(),
        node_address: trace.node_address().map(str::to_owned),
        longitude: trace.location().longitude(),
        latitude: trace.location().latitude(),
        operator: trace.operator().to_owned(),
        operated_at: trace.operated_at(),
        remark: trace.remark().to_owned(),
    }
}

fn row_to_trace(row: TraceRow) -> ParcelRepositoryResult<ParcelTrace> {
    Ok(ParcelTrace::from_persisted(PersistedTraceData {
        id: TraceId::new(row.id).map_err(ParcelRepositoryError::persistence)?,
        parcel_id: ParcelId::new(row.parcel_id).map_err(ParcelRepositoryError::persistence)?,
        node_type: NodeType::try_from(row.node_type.as_str())
            .map_err(ParcelRepositoryError::persistence)?,
        node_name: row.node_name,
        node_address: row.node_address,
        location: GeoPoint::new(row.longitude, row.latitude),
        operator: row.operator,
        operated_at: row.operated_at,
        remark: row.remark,
    }))
}

fn to_abnormal_row(record: &AbnormalRecord) -> AbnormalRecordRow {
    AbnormalRecordRow {
        id: record.id().as_str().to_owned(),
        parcel_id: record.parcel_id().as_str().to_owned(),
        abnormal_type: record.abnormal_type().to_owned(),
        reason: record.reason().to_owned(),
        processing_method: record.processing_method().map(str::to_owned),
        processor: record.processor().to_owned(),
        processed_at: record.processed_at(),
        status: record.status().as_str().to_owned(),
        created_at: record.created_at(),
        updated_at: record.updated_at(),
    }
}

fn row_to_abnormal_record(row: AbnormalRecordRow) -> ParcelRepositoryResult<AbnormalRecord> {
    Ok(AbnormalRecord::from_persisted(PersistedAbnormalRecordData {
        id: AbnormalRecordId::new(row.id).map_err(ParcelRepositoryError::persistence)?,
        parcel_id: ParcelId::new(row.parcel_id).map_err(ParcelRepositoryError::persistence)?,
        abnormal_type: row.abnormal_type,
        reason: row.reason,
        processing_method: row.processing_method,
        processor: row.processor,
        processed_at: row.processed_at,
        status: AbnormalRecordStatus::try_from(row.status.as_str())
            .map_err(ParcelRepositoryError::persistence)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
