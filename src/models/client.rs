#[derive(Debug, Clone, Default, PartialEq)]
pub struct Client {
    pub name: String,
    pub email: String,
    pub address: String,
    pub company: Option<String>,
}

impl Client {
    /// Address split on its embedded line breaks.
    pub fn address_lines(&self) -> Vec<&str> {
        if self.address.is_empty() {
            return Vec::new();
        }
        self.address.lines().collect()
    }
}
