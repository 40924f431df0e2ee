//! Status enums for the domain entities.
//!
//! The serde/database representations are the French wire values
//! (`en_attente`, `valide`, ...) that existing clients depend on.

use serde::{Deserialize, Serialize};

/// Implement `Display`, `FromStr`, and TEXT-backed sqlx support for a
/// string-valued status enum.
macro_rules! string_enum_impls {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $name {
            /// The wire/database representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                s.parse().map_err(Into::into)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

/// User role: administrators may moderate reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Client,
}

string_enum_impls!(Role {
    Admin => "admin",
    Client => "client",
});

impl Role {
    /// Whether this role carries administrator rights.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Awaiting processing.
    #[default]
    #[serde(rename = "en_attente")]
    Pending,
    /// Shipped to the delivery address.
    #[serde(rename = "expediee")]
    Shipped,
    /// Delivered; only orders in this state qualify a user to review the
    /// items they contain.
    #[serde(rename = "livree")]
    Delivered,
    /// Cancelled.
    #[serde(rename = "annulee")]
    Cancelled,
}

string_enum_impls!(OrderStatus {
    Pending => "en_attente",
    Shipped => "expediee",
    Delivered => "livree",
    Cancelled => "annulee",
});

/// Payment lifecycle status.
///
/// Two states only: a payment is created `en_attente` and flipped to
/// `valide` when the gateway confirms the checkout session. No failed or
/// refunded transitions are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "en_attente")]
    Pending,
    #[serde(rename = "valide")]
    Validated,
}

string_enum_impls!(PaymentStatus {
    Pending => "en_attente",
    Validated => "valide",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"en_attente\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Validated).unwrap(),
            "\"valide\""
        );
    }

    #[test]
    fn test_payment_status_roundtrip() {
        let status: PaymentStatus = "valide".parse().unwrap();
        assert_eq!(status, PaymentStatus::Validated);
        assert_eq!(status.as_str(), "valide");
        assert!("refuse".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_order_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivered).unwrap(),
            "\"livree\""
        );
        let status: OrderStatus = serde_json::from_str("\"expediee\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
    }

    #[test]
    fn test_role() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Client.is_admin());
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"client\"");
    }
}
