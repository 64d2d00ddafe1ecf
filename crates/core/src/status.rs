//! Status enums mapping to SMALLSERIAL lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table, and its wire name is
//! the upper-snake-case label the API exposes.

use serde::{Deserialize, Serialize};

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Map a database status ID back to its variant.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Upper-snake-case label used on the wire and in logs.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_status_enum! {
    /// Shortlist workflow status. Also used for a version's `status_at_time`.
    ShortlistStatus {
        Draft = 1 => "DRAFT",
        SentToCustomer = 2 => "SENT_TO_CUSTOMER",
        CustomerSubmitted = 3 => "CUSTOMER_SUBMITTED",
        SentBackToCustomer = 4 => "SENT_BACK_TO_CUSTOMER",
        /// Terminal.
        ToBeProcured = 5 => "TO_BE_PROCURED",
    }
}

impl ShortlistStatus {
    /// Statuses in which the customer holds a version of the shortlist.
    pub fn is_customer_facing(self) -> bool {
        matches!(
            self,
            ShortlistStatus::SentToCustomer | ShortlistStatus::CustomerSubmitted
        )
    }
}
