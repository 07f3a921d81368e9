//! The fixed set of `p4` operations the dispatcher knows how to run.
//!
//! Each operation has:
//! - `as_str()` returning the `p4` subcommand name
//! - `FromStr` accepting exactly those names
//! - `Display` and `Serialize` as the subcommand name

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::P4Error;

// ---------------------------------------------------------------------------
// Macro: a closed enum whose variants map 1:1 onto subcommand names.
// ---------------------------------------------------------------------------
macro_rules! define_operations {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* ($variant:ident, $str:expr) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every operation, in declaration order.
            pub const ALL: &'static [$name] = &[ $( Self::$variant, )+ ];

            /// Returns the `p4` subcommand name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = P4Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $str => Ok(Self::$variant), )+
                    other => Err(P4Error::UnknownOperation(other.to_owned())),
                }
            }
        }
    };
}

define_operations! {
    /// A logical `p4` operation.
    Operation {
        /// Open a new file for add.
        (Add, "add"),
        /// Open an existing file for edit.
        (Edit, "edit"),
        /// Discard changes to an opened file.
        (Revert, "revert"),
        /// Mark a file for delete.
        (Delete, "delete"),
        /// Unified diff of a client file against the depot.
        (Diff, "diff"),
        /// Client and server information.
        (Info, "info"),
        /// List files opened in pending changelists.
        (Opened, "opened"),
        /// Map a depot path to client and local paths.
        (Where, "where"),
        /// Write a depot file revision to stdout.
        (Print, "print"),
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
