//! Shop role for seller/shop associations.

use serde::{Deserialize, Serialize};

/// Role a seller holds on a specific shop.
///
/// Stored on the seller/shop association row. A superuser seller holds an
/// implicit [`ShopRole::Admin`] over every shop without any association row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ShopRole {
    /// Full control over the shop, including its encrypted configuration.
    Admin,
    /// Day-to-day shop access without configuration rights.
    Staff,
}

impl ShopRole {
    /// Returns the wire/database representation of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }
}

impl core::fmt::Display for ShopRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShopRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Error returned when parsing an unrecognized role string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown shop role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrip() {
        for role in [ShopRole::Admin, ShopRole::Staff] {
            assert_eq!(role.as_str().parse::<ShopRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role() {
        assert!("owner".parse::<ShopRole>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ShopRole::Admin).unwrap(), "\"admin\"");
        let parsed: ShopRole = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(parsed, ShopRole::Staff);
    }
}
