use {
    crate::{config::constants::GROUP_ID_PREFIXES, error::IngestError},
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter, EnumString},
};

/// The two independent snapshot categories: individual instruments vs
/// sector/group aggregates. Each owns its own Dataset and storage row.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Default,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    #[default]
    Stock,
    Group,
}

impl Category {
    /// Storage key for the durable snapshot row.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Group => "group",
        }
    }

    /// Classify a file from its first data row id: instrument ids lead with
    /// a digit, group aggregates with one of the known prefix letters.
    pub fn detect(id: &str) -> Result<Self, IngestError> {
        match id.chars().next() {
            Some(c) if c.is_ascii_digit() => Ok(Self::Stock),
            Some(c) if GROUP_ID_PREFIXES.contains(&c) => Ok(Self::Group),
            _ => Err(IngestError::UnknownCategory(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_instrument_ids_by_leading_digit() {
        assert_eq!(Category::detect("2330.TW").unwrap(), Category::Stock);
        assert_eq!(Category::detect("00878").unwrap(), Category::Stock);
    }

    #[test]
    fn detects_group_ids_by_prefix_letter() {
        assert_eq!(Category::detect("M1722").unwrap(), Category::Group);
        assert_eq!(Category::detect("X0055").unwrap(), Category::Group);
    }

    #[test]
    fn rejects_anything_else() {
        assert!(matches!(
            Category::detect("abc"),
            Err(IngestError::UnknownCategory(_))
        ));
        assert!(matches!(
            Category::detect(""),
            Err(IngestError::UnknownCategory(_))
        ));
    }
}
