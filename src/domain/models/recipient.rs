use serde::{Deserialize, Serialize};

/// Suffixes the gateway appends to chat identifiers. The outbound request
/// carries group semantics through an explicit flag instead.
const CHAT_SUFFIXES: [&str; 2] = ["@c.us", "@g.us"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipient {
    pub address: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_group: bool,
}

impl Recipient {
    pub fn new(address: impl Into<String>, is_group: bool) -> Self {
        Self {
            address: address.into(),
            display_name: None,
            is_group,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Address in the bare form the gateway expects on `send-message`.
    pub fn normalized_address(&self) -> &str {
        let address = self.address.trim();
        CHAT_SUFFIXES
            .iter()
            .find_map(|suffix| address.strip_suffix(suffix))
            .unwrap_or(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_chat_and_group_suffixes() {
        assert_eq!(Recipient::new("5511999@c.us", false).normalized_address(), "5511999");
        assert_eq!(
            Recipient::new("120363-1699@g.us", true).normalized_address(),
            "120363-1699"
        );
    }

    #[test]
    fn leaves_bare_and_unknown_addresses_alone() {
        assert_eq!(Recipient::new("5511999", false).normalized_address(), "5511999");
        assert_eq!(
            Recipient::new("123@newsletter", false).normalized_address(),
            "123@newsletter"
        );
    }
}
