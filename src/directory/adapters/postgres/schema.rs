//! Diesel schema for directory persistence.

diesel::table! {
    /// Registered team names.
    teams (team_name) {
        /// Unique team name.
        #[max_length = 255]
        team_name -> Varchar,
    }
}

diesel::table! {
    /// Directory users with their current team and activity flag.
    users (user_id) {
        /// Stable user identifier.
        #[max_length = 255]
        user_id -> Varchar,
        /// Display username.
        #[max_length = 255]
        username -> Varchar,
        /// Current team.
        #[max_length = 255]
        team_name -> Varchar,
        /// Whether the user can be assigned reviews.
        is_active -> Bool,
    }
}
