//! Helper macro for enums persisted as TEXT columns.

/// Define a fieldless enum whose variants map one-to-one onto snake_case
/// strings stored in the database and sent over the wire.
///
/// Generates `as_str`, an `ALL` slice in declaration order, `Display`,
/// `FromStr` (rejecting unknown strings with [`CoreError::UnknownValue`]) and
/// serde impls that use the same strings.
///
/// [`CoreError::UnknownValue`]: crate::error::CoreError::UnknownValue
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The persisted string form.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::unknown($field, other)),
                }
            }
        }
    };
}
