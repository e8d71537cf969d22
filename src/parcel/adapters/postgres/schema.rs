//! Diesel schema for parcel persistence.

diesel::table! {
    /// Parcel records.
    parcels (id) {
        /// Tracking number.
        #[max_length = 32]
        id -> Varchar,
        /// Sender name.
        #[max_length = 64]
        sender_name -> Varchar,
        /// Sender phone.
        #[max_length = 20]
        sender_phone -> Varchar,
        /// Sender address.
        #[max_length = 255]
        sender_address -> Varchar,
        /// Receiver name.
        #[max_length = 64]
        receiver_name -> Varchar,
        /// Receiver phone.
        #[max_length = 20]
        receiver_phone -> Varchar,
        /// Receiver address.
        #[max_length = 255]
        receiver_address -> Varchar,
        /// Receiver province.
        #[max_length = 32]
        receiver_province -> Varchar,
        /// Receiver city.
        #[max_length = 32]
        receiver_city -> Varchar,
        /// Receiver district.
        #[max_length = 32]
        receiver_district -> Varchar,
        /// Weight in kilograms.
        weight_kg -> Float8,
        /// Length in centimetres.
        length_cm -> Nullable<Float8>,
        /// Width in centimetres.
        width_cm -> Nullable<Float8>,
        /// Height in centimetres.
        height_cm -> Nullable<Float8>,
        /// Parcel status.
        #[max_length = 20]
        status -> Varchar,
        /// Abnormal reason.
        #[max_length = 255]
        abnormal_reason -> Nullable<Varchar>,
        /// Abnormal handler.
        #[max_length = 64]
        abnormal_handler -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete marker.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only parcel trace entries.
    parcel_traces (id) {
        /// Trace identifier.
        #[max_length = 32]
        id -> Varchar,
        /// Tracking number.
        #[max_length = 32]
        parcel_id -> Varchar,
        /// Node type.
        #[max_length = 20]
        node_type -> Varchar,
        /// Node name.
        #[max_length = 64]
        node_name -> Varchar,
        /// Node address.
        #[max_length = 255]
        node_address -> Nullable<Varchar>,
        /// Node longitude.
        longitude -> Float8,
        /// Node latitude.
        latitude -> Float8,
        /// Operator.
        #[max_length = 64]
        operator -> Varchar,
        /// Operation timestamp.
        operated_at -> Timestamptz,
        /// Remark.
        #[max_length = 255]
        remark -> Varchar,
    }
}

diesel::table! {
    /// Abnormal records raised against parcels.
    abnormal_records (id) {
        /// Record identifier.
        #[max_length = 32]
        id -> Varchar,
        /// Tracking number.
        #[max_length = 32]
        parcel_id -> Varchar,
        /// Abnormality category.
        #[max_length = 20]
        abnormal_type -> Varchar,
        /// Reason.
        #[max_length = 255]
        reason -> Varchar,
        /// Processing method.
        #[max_length = 255]
        processing_method -> Nullable<Varchar>,
        /// Processor.
        #[max_length = 64]
        processor -> Varchar,
        /// Processing timestamp.
        processed_at -> Nullable<Timestamptz>,
        /// Processing status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
