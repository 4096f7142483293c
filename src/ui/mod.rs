pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{field, header, mask_password, server_details, success};
pub use table::servers_table;
pub use theme::{theme, Theme};
