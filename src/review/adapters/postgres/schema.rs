//! Diesel schema for pull request persistence.

diesel::table! {
    /// Pull request records.
    pull_requests (id) {
        /// External pull request identifier.
        #[max_length = 255]
        id -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Author user identifier.
        #[max_length = 255]
        author_id -> Varchar,
        /// Lifecycle status, `OPEN` or `MERGED`.
        #[max_length = 16]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Merge timestamp, set once on merge.
        merged_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Ordered reviewer slots per pull request.
    pull_request_reviewers (pull_request_id, user_id) {
        /// Owning pull request.
        #[max_length = 255]
        pull_request_id -> Varchar,
        /// Assigned reviewer.
        #[max_length = 255]
        user_id -> Varchar,
        /// Zero-based slot in assignment order.
        position -> Int2,
    }
}
