//! Closed string-literal enums
//!
//! Every enumerated configuration field is decoded through one literal table.
//! The validator and the typed decoder both go through [`FromStr`], so the set
//! of accepted values lives in exactly one place.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A literal that is not a member of its field's closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} {value:?}: expected one of {}", expected.join(", "))]
pub struct InvalidLiteral {
    /// Field the literal was decoded for
    pub field: &'static str,
    /// Offending literal
    pub value: String,
    /// Accepted literals in declaration order
    pub expected: &'static [&'static str],
}

/// A closed set of string literals backing a configuration field
pub trait Literal: FromStr<Err = InvalidLiteral> + Copy + 'static {
    /// Field name used in diagnostics
    const FIELD: &'static str;
    /// Accepted literals in declaration order
    const LITERALS: &'static [&'static str];

    /// Decode an untyped value; non-strings are reported by their JSON text
    ///
    /// # Errors
    /// Returns [`InvalidLiteral`] unless the value is one of [`Self::LITERALS`]
    fn decode(value: &serde_json::Value) -> Result<Self, InvalidLiteral> {
        match value {
            serde_json::Value::String(s) => s.parse(),
            other => Err(InvalidLiteral {
                field: Self::FIELD,
                value: other.to_string(),
                expected: Self::LITERALS,
            }),
        }
    }
}

macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $lit:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical literal for this member
            #[inline]
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $lit),+
                }
            }
        }

        impl Literal for $name {
            const FIELD: &'static str = $field;
            const LITERALS: &'static [&'static str] = &[$($lit),+];
        }

        impl FromStr for $name {
            type Err = InvalidLiteral;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($lit => Ok(Self::$variant),)+
                    other => Err(InvalidLiteral {
                        field: Self::FIELD,
                        value: other.to_string(),
                        expected: Self::LITERALS,
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidLiteral;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl schemars::JsonSchema for $name {
            fn schema_name() -> String {
                stringify!($name).to_string()
            }

            fn json_schema(_gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
                schemars::schema::SchemaObject {
                    instance_type: Some(schemars::schema::InstanceType::String.into()),
                    enum_values: Some(
                        Self::LITERALS
                            .iter()
                            .map(|lit| serde_json::Value::from(*lit))
                            .collect(),
                    ),
                    ..Default::default()
                }
                .into()
            }
        }
    };
}

literal_enum! {
    /// Dashboard orientation
    Layout, field = "layout" {
        /// Boxes laid out side by side
        Horizontal => "horizontal",
        /// Boxes stacked
        Vertical => "vertical",
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::Horizontal
    }
}

literal_enum! {
    /// Named terminal color palette
    BoxColor, field = "background_color" {
        Black => "black",
        Red => "red",
        Green => "green",
        Yellow => "yellow",
        Blue => "blue",
        Magenta => "magenta",
        Cyan => "cyan",
        White => "white",
        Grey => "grey",
        BrightBlack => "bright_black",
        BrightRed => "bright_red",
        BrightGreen => "bright_green",
        BrightYellow => "bright_yellow",
        BrightBlue => "bright_blue",
        BrightMagenta => "bright_magenta",
        BrightCyan => "bright_cyan",
        BrightWhite => "bright_white",
    }
}

impl Default for BoxColor {
    fn default() -> Self {
        Self::Black
    }
}

literal_enum! {
    /// Box display size
    BoxSize, field = "size" {
        Big => "big",
        Small => "small",
    }
}

literal_enum! {
    /// How service ports are presented inside a box
    PortView, field = "port_view" {
        /// Dedicated ports column
        Column => "column",
        /// Ports appended to the service name
        Name => "name",
        /// Ports shown with the status text
        Status => "status",
    }
}

literal_enum! {
    /// Which side of a port mapping is shown
    PortDetail, field = "port_detail" {
        External => "external",
        Internal => "internal",
        Both => "both",
    }
}
