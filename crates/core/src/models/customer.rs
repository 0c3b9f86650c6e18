//! Buyer contact and delivery details.

use serde::{Deserialize, Serialize};

/// Buyer details captured at checkout.
///
/// Name, email and zip code are required to place an order; everything else
/// may be left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: Address,
}

/// Delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub zip_code: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    /// Two-letter state code (`SP`, `RJ`, ...).
    #[serde(default)]
    pub state: String,
}

/// Address fields returned by a postal-code lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFragment {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl Address {
    /// Overwrite the looked-up fields, keeping zip code, number and complement.
    pub fn apply_lookup(&mut self, fragment: AddressFragment) {
        self.street = fragment.street;
        self.neighborhood = fragment.neighborhood;
        self.city = fragment.city;
        self.state = fragment.state;
    }

    /// One-line rendering, skipping blank parts.
    #[must_use]
    pub fn one_line(&self) -> String {
        let street = [self.street.as_str(), self.number.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let city = [self.city.as_str(), self.state.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        [
            street.as_str(),
            self.complement.as_deref().unwrap_or_default(),
            self.neighborhood.as_str(),
            city.as_str(),
            self.zip_code.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_lookup_keeps_number_and_complement() {
        let mut address = Address {
            zip_code: "01310-100".to_string(),
            street: "typed by hand".to_string(),
            number: "1578".to_string(),
            complement: Some("apto 12".to_string()),
            ..Address::default()
        };

        address.apply_lookup(AddressFragment {
            street: "Avenida Paulista".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        });

        assert_eq!(address.street, "Avenida Paulista");
        assert_eq!(address.number, "1578");
        assert_eq!(address.complement.as_deref(), Some("apto 12"));
        assert_eq!(address.zip_code, "01310-100");
        assert_eq!(address.state, "SP");
    }

    #[test]
    fn test_one_line() {
        let address = Address {
            zip_code: "01310-100".to_string(),
            street: "Avenida Paulista".to_string(),
            number: "1578".to_string(),
            complement: None,
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        };
        assert_eq!(
            address.one_line(),
            "Avenida Paulista, 1578 - Bela Vista - São Paulo/SP - 01310-100"
        );
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = r#"{"name":"Ana","email":"ana@x.com","address":{"zipCode":"01310100"}}"#;
        let info: CustomerInfo = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(info.name, "Ana");
        assert_eq!(info.address.zip_code, "01310100");
        assert!(info.phone.is_empty());
    }
}
