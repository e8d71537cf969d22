//! Diesel schema for transport persistence.

diesel::table! {
    /// Transport tasks.
    transport_tasks (id) {
        /// Task identifier.
        #[max_length = 32]
        id -> Varchar,
        /// Start node.
        #[max_length = 64]
        start_node -> Varchar,
        /// End node.
        #[max_length = 64]
        end_node -> Varchar,
        /// Vehicle identifier.
        #[max_length = 32]
        vehicle_id -> Varchar,
        /// Driver identifier.
        #[max_length = 32]
        driver_id -> Nullable<Varchar>,
        /// Driver name.
        #[max_length = 64]
        driver_name -> Nullable<Varchar>,
        /// Task status.
        #[max_length = 20]
        status -> Varchar,
        /// Number of bound parcels.
        bound_count -> Int4,
        /// Estimated arrival time.
        estimated_arrival -> Nullable<Timestamptz>,
        /// Departure timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Actual arrival timestamp.
        arrived_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// JSON waypoint description.
        route_json -> Nullable<Text>,
        /// Route distance in kilometres.
        distance_km -> Float8,
        /// Abnormality category.
        #[max_length = 32]
        abnormal_type -> Nullable<Varchar>,
        /// Abnormality reason.
        #[max_length = 255]
        abnormal_reason -> Nullable<Varchar>,
        /// Abnormality handler.
        #[max_length = 64]
        abnormal_handler -> Nullable<Varchar>,
        /// Abnormality report timestamp.
        abnormal_reported_at -> Nullable<Timestamptz>,
        /// Abnormality handle result.
        #[max_length = 255]
        abnormal_handle_result -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Parcels bound to transport tasks.
    transport_task_parcels (id) {
        /// Surrogate key preserving binding order.
        id -> Int8,
        /// Task identifier.
        #[max_length = 32]
        task_id -> Varchar,
        /// Tracking number.
        #[max_length = 32]
        parcel_id -> Varchar,
        /// Binding timestamp.
        bound_at -> Timestamptz,
    }
}
