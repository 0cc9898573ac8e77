//! Endpoint catalogue for the Taskora REST backend.
//!
//! Paths are relative to [`crate::Config::base_url`]. Parameterized paths
//! are builder functions; fixed paths are constants.

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH: &str = "/auth/refresh";
    pub const VERIFY: &str = "/auth/verify";
    pub const PROFILE: &str = "/auth/profile";
    pub const CHANGE_PASSWORD: &str = "/auth/change-password";
}

pub mod subjects {
    pub const BASE: &str = "/subjects";

    pub fn by_id(id: u64) -> String {
        format!("/subjects/{id}")
    }

    pub fn stats(id: u64) -> String {
        format!("/subjects/{id}/stats")
    }
}

pub mod tasks {
    pub const BASE: &str = "/tasks";
    pub const BULK_CREATE: &str = "/tasks/bulk";

    pub fn by_id(id: u64) -> String {
        format!("/tasks/{id}")
    }

    pub fn by_subject(subject_id: u64) -> String {
        format!("/tasks/subject/{subject_id}")
    }

    pub fn status(id: u64) -> String {
        format!("/tasks/{id}/status")
    }

    pub fn complete(id: u64) -> String {
        format!("/tasks/{id}/complete")
    }
}

pub mod schedules {
    pub const LIST: &str = "/emplois-du-temps/utilisateur";
    pub const UPLOAD: &str = "/emplois-du-temps/upload";
    pub const ANALYZE: &str = "/services/analyser-pdf";
    pub const FREE_SLOTS: &str = "/services/creneaux-libres";

    pub fn by_id(id: u64) -> String {
        format!("/emplois-du-temps/{id}")
    }
}

pub mod sessions {
    pub const BASE: &str = "/sessions";
    pub const STATS: &str = "/sessions/stats";

    pub fn by_id(id: u64) -> String {
        format!("/sessions/{id}")
    }

    pub fn end(id: u64) -> String {
        format!("/sessions/{id}/end")
    }

    pub fn by_subject(subject_id: u64) -> String {
        format!("/sessions/subject/{subject_id}")
    }
}

pub mod notifications {
    pub const BASE: &str = "/notifications";
    pub const UNREAD: &str = "/notifications/unread";
    pub const MARK_ALL_READ: &str = "/notifications/mark-all-read";

    pub fn by_id(id: u64) -> String {
        format!("/notifications/{id}")
    }

    pub fn mark_read(id: u64) -> String {
        format!("/notifications/{id}/read")
    }
}

pub mod planning {
    pub const GENERATE: &str = "/planning/generate";
    pub const OPTIMIZE: &str = "/planning/optimize";
    pub const BY_USER: &str = "/planning/user";

    pub fn by_id(id: u64) -> String {
        format!("/planning/{id}")
    }
}
