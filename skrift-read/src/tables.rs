//! The tables used for glyph rasterization.

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod kern;
pub mod loca;

/// Defines a set of bit flags stored as a big-endian integer.
macro_rules! flag_set {
    (
        $(#[$attr:meta])*
        $name:ident: $inner:ty, $raw:ty {
            $( $(#[$flag_attr:meta])* const $flag:ident = $value:expr; )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name($inner);

        impl $name {
            $( $(#[$flag_attr])* pub const $flag: Self = Self($value); )*

            /// Returns an empty set of flags.
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Returns the raw value of the flags currently stored.
            pub const fn bits(self) -> $inner {
                self.0
            }

            /// Convert from underlying bit representation, dropping any bits
            /// that do not correspond to flags.
            pub const fn from_bits_truncate(bits: $inner) -> Self {
                Self(bits & (0 $(| $value)*))
            }

            /// Returns `true` if all of the flags in `other` are contained
            /// within `self`.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut first = true;
                $(
                    if self.contains(Self::$flag) && Self::$flag.0 != 0 {
                        if !first {
                            f.write_str(" | ")?;
                        }
                        first = false;
                        f.write_str(stringify!($flag))?;
                    }
                )*
                if first {
                    write!(f, "{}(empty)", stringify!($name))?;
                }
                Ok(())
            }
        }

        types::newtype_scalar!($name, $raw);
    };
}

pub(crate) use flag_set;
