use tabled::{settings::Style, Table, Tabled};
use crate::profile::ServerProfile;
use crate::ui::mask_password;

#[derive(Tabled)]
pub struct ServerRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Host")]
    pub host: String,
    #[tabled(rename = "Port")]
    pub port: i64,
    #[tabled(rename = "Username")]
    pub username: String,
    #[tabled(rename = "Password")]
    pub password: String,
}

impl ServerRow {
    fn from_profile(profile: &ServerProfile, show_password: bool) -> Self {
        let password = if show_password {
            profile.password.clone()
        } else {
            mask_password(&profile.password)
        };
        Self {
            id: profile.id,
            host: profile.host.clone(),
            port: profile.port,
            username: profile.username.clone(),
            password,
        }
    }
}

/// Render profiles as a table; passwords are masked unless `show_password`
pub fn servers_table(servers: &[ServerProfile], show_password: bool) -> String {
    if servers.is_empty() {
        return String::new();
    }

    let rows: Vec<ServerRow> = servers
        .iter()
        .map(|s| ServerRow::from_profile(s, show_password))
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}
