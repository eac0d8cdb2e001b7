pub mod limits {

    pub const USERNAME_MAX_CHARS: usize = 30;

    pub const CHIRP_MAX_CHARS: usize = 140;
}

pub mod session {

    /// Session key holding the authenticated user's id.
    pub const USER_KEY: &str = "user_id";

    /// Two weeks, the original framework's cookie age.
    pub const DEFAULT_EXPIRY_MINUTES: i64 = 14 * 24 * 60;
}

pub mod routes {

    pub const API_PREFIX: &str = "/api";

    /// Returned by login so clients decide whether to navigate.
    pub const HOME_PATH: &str = "/api/home";
}

pub mod messages {

    pub const INVALID_CREDENTIALS: &str = "Invalid username/password.";

    pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";

    pub const NOT_FOUND: &str = "Not found.";

    pub const ALREADY_FOLLOWING: &str = "Already following this user.";

    pub const NOT_FOLLOWING: &str = "Not following this user.";

    pub const DUPLICATE_USERNAME: &str = "This field must be unique.";

    pub const INVALID_USERNAME: &str = "Enter a valid username.";

    pub const BLANK_FIELD: &str = "This field may not be blank.";

    pub const REQUIRED_FIELD: &str = "This field is required.";
}
