use crate::profile::ServerProfile;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

/// Longest run of `*` shown in place of a password
const MASK_WIDTH: usize = 8;

pub fn header(text: &str) {
    println!("{} {}", Icons::SERVER, text.style(theme().title.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().ok.clone()));
}

/// Hide a password, keeping a hint of its length up to `MASK_WIDTH`
pub fn mask_password(password: &str) -> String {
    "*".repeat(password.chars().count().min(MASK_WIDTH))
}

/// Aligned `label  value` line
pub fn field(label: &str, value: &str) {
    println!("  {:<10} {}", label.style(theme().label.clone()), value);
}

/// Print one profile as a block of fields
pub fn server_details(server: &ServerProfile, show_password: bool) {
    header(&format!("Server #{}", server.id));
    field("host", &server.host.style(theme().host.clone()).to_string());
    field("port", &server.port.to_string());
    field("username", &server.username);

    let password = if show_password {
        server.password.clone()
    } else {
        format!("{} {}", Icons::KEY, mask_password(&server.password))
    };
    field("password", &password.style(theme().secret.clone()).to_string());
}
