pub struct Icons;

impl Icons {
    pub const SERVER: &str = "🖥️";
    pub const CHECK: &str = "✅";
    pub const DEL: &str = "🗑️";
    pub const KEY: &str = "🔑";
    pub const EMPTY: &str = "∅";
}
