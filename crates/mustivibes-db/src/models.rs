/// Database row types. These map directly to SQLite rows.
/// Distinct from mustivibes-types API models to keep the DB layer independent.

pub struct SessionRow {
    pub id: String,
    pub admin_id: String,
    pub email: String,
    /// Admin profile exactly as the backend returned it at login.
    pub admin_json: String,
    pub backend_token: String,
    pub created_at: String,
    pub expires_at: String,
}

pub struct PreferencesRow {
    pub admin_id: String,
    pub dark_mode: bool,
    pub sidebar_collapsed: bool,
    pub updated_at: String,
}
