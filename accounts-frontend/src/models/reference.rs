use serde::{Deserialize, Serialize};

/// A link to another record.
///
/// The backend returns either the bare id or, when it populates the
/// relation, an object carrying the id plus display fields. Writes always
/// send the bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Id(String),
    Populated(PopulatedRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
}

impl Reference {
    pub fn id(&self) -> &str {
        match self {
            Reference::Id(id) => id,
            Reference::Populated(populated) => &populated.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::Id(_) => None,
            Reference::Populated(populated) => populated.name.as_deref(),
        }
    }

    pub fn invoice_number(&self) -> Option<&str> {
        match self {
            Reference::Id(_) => None,
            Reference::Populated(populated) => populated.invoice_number.as_deref(),
        }
    }
}

impl From<String> for Reference {
    fn from(id: String) -> Self {
        Reference::Id(id)
    }
}

impl From<&str> for Reference {
    fn from(id: &str) -> Self {
        Reference::Id(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bare_and_populated_forms() {
        let bare: Reference = serde_json::from_str(r#""c1""#).unwrap();
        assert_eq!(bare.id(), "c1");
        assert_eq!(bare.name(), None);

        let populated: Reference =
            serde_json::from_str(r#"{"_id":"c1","name":"Acme Traders"}"#).unwrap();
        assert_eq!(populated.id(), "c1");
        assert_eq!(populated.name(), Some("Acme Traders"));
    }

    #[test]
    fn writes_bare_id() {
        let reference = Reference::from("s9");
        assert_eq!(serde_json::to_string(&reference).unwrap(), r#""s9""#);
    }
}
