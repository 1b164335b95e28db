use crate::store::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Tab order on the list screen.
str_enum!(ConsultationCategory {
    Upcoming => "upcoming",
    Past => "past",
    Canceled => "canceled",
});

impl ConsultationCategory {
    pub const ALL: [ConsultationCategory; 3] = [Self::Upcoming, Self::Past, Self::Canceled];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn consultation_category_round_trip() {
        for (variant, s) in [
            (ConsultationCategory::Upcoming, "upcoming"),
            (ConsultationCategory::Past, "past"),
            (ConsultationCategory::Canceled, "canceled"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ConsultationCategory::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ConsultationCategory::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(ConsultationCategory::from_str("cancelled").is_err());
        assert!(ConsultationCategory::from_str("").is_err());
    }
}
