//! Diesel schema for delivery persistence.

diesel::table! {
    /// Delivery tasks.
    delivery_tasks (id) {
        /// Task identifier.
        #[max_length = 32]
        id -> Varchar,
        /// Delivery area.
        #[max_length = 128]
        delivery_area -> Varchar,
        /// Courier identifier.
        #[max_length = 32]
        courier_id -> Varchar,
        /// Courier name.
        #[max_length = 64]
        courier_name -> Varchar,
        /// Start node.
        #[max_length = 64]
        start_node -> Varchar,
        /// Task status.
        #[max_length = 20]
        status -> Varchar,
        /// Number of bound parcels.
        bound_count -> Int4,
        /// Start timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Abnormality category.
        #[max_length = 32]
        abnormal_type -> Nullable<Varchar>,
        /// Abnormality reason.
        #[max_length = 512]
        abnormal_reason -> Nullable<Varchar>,
        /// Abnormality handler.
        #[max_length = 64]
        abnormal_handler -> Nullable<Varchar>,
        /// Abnormality report timestamp.
        abnormal_reported_at -> Nullable<Timestamptz>,
        /// Abnormality handle result.
        #[max_length = 512]
        abnormal_handle_result -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Parcels bound to delivery tasks.
    delivery_task_parcels (id) {
        /// Surrogate key.
        id -> Int8,
        /// Task identifier.
        #[max_length = 32]
        task_id -> Varchar,
        /// Tracking number.
        #[max_length = 32]
        parcel_id -> Varchar,
        /// 1-based position in the round.
        delivery_order -> Int4,
        /// Signer name.
        #[max_length = 64]
        signer_name -> Nullable<Varchar>,
        /// Masked signer phone.
        #[max_length = 20]
        signer_phone -> Nullable<Varchar>,
        /// Signing timestamp.
        signed_at -> Nullable<Timestamptz>,
        /// Sign type.
        #[max_length = 20]
        sign_type -> Nullable<Varchar>,
        /// Signing remark.
        #[max_length = 512]
        sign_remark -> Nullable<Varchar>,
        /// Binding timestamp.
        bound_at -> Timestamptz,
    }
}
