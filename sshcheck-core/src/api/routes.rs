macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

pub const ROOT: &str = "/api";

/// Credential registry endpoints.
pub mod creds {
    /// `POST` upsert of a validated credential.
    pub const UPDATE: &str = api_path!("/update_creds");
    /// `POST` prune of entries older than the staleness threshold.
    pub const CLEAR: &str = api_path!("/clear_creds");
    /// `GET` snapshot of every live entry.
    pub const LIST: &str = api_path!("/creds");
}

pub mod service {
    pub const PING: &str = "/ping";
    pub const HEALTH: &str = "/health";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creds_routes_live_under_api_root() {
        for route in [creds::UPDATE, creds::CLEAR, creds::LIST] {
            assert!(route.starts_with(ROOT), "{route} outside {ROOT}");
        }
        assert_eq!(creds::UPDATE, "/api/update_creds");
        assert_eq!(creds::CLEAR, "/api/clear_creds");
        assert_eq!(creds::LIST, "/api/creds");
    }
}
