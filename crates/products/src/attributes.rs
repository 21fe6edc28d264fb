//! Closed attribute sets for catalog products.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use kitshelf_core::DomainError;

macro_rules! closed_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal, [$($variant:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err(DomainError::validation(format!(
                        "{} must be one of: {}",
                        $field,
                        $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))),
                }
            }
        }
    };
}

closed_enum!(
    /// Product brand.
    Brand,
    "brand",
    [Kipsta, Quechua, Artengo]
);

closed_enum!(
    /// Product size.
    Size,
    "size",
    [S, M, L]
);

closed_enum!(
    /// Product color.
    Color,
    "color",
    [Blue, Green, White]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!("Quechua".parse::<Brand>().unwrap(), Brand::Quechua);
        assert_eq!("M".parse::<Size>().unwrap(), Size::M);
        assert_eq!("White".parse::<Color>().unwrap(), Color::White);
    }

    #[test]
    fn rejects_unknown_values_listing_the_allowed_set() {
        let err = "Decathlon".parse::<Brand>().unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("brand must be one of: Kipsta, Quechua, Artengo".to_string())
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!("blue".parse::<Color>().is_err());
        assert!("xl".parse::<Size>().is_err());
    }

    #[test]
    fn display_matches_stored_form() {
        for brand in Brand::ALL {
            assert_eq!(brand.to_string().parse::<Brand>().unwrap(), *brand);
        }
        assert_eq!(serde_json::to_string(&Size::L).unwrap(), "\"L\"");
    }
}
