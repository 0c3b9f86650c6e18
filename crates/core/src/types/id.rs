//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use shopkeep_core::define_id;
/// define_id!(UserId);
/// define_id!(TicketId);
///
/// let user_id = UserId::new("1");
/// let ticket_id = TicketId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = ticket_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariationId);
define_id!(CouponId);
define_id!(OrderId);

impl VariationId {
    /// Derive the identity of the variation at `index` within `product_id`.
    ///
    /// Used when a variation row has no identity yet, so re-saving a product
    /// keeps identities stable for slots that did not move.
    #[must_use]
    pub fn derived(product_id: &ProductId, index: usize) -> Self {
        Self(format!("{product_id}_{index}"))
    }
}

impl OrderId {
    /// Number of trailing characters shown in order confirmations.
    pub const SHORT_LEN: usize = 8;

    /// Create a time-derived order ID from epoch milliseconds.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    /// The epoch milliseconds this ID was derived from, if it is time-derived.
    #[must_use]
    pub fn millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Last eight characters of the ID, as shown to buyers (`#12345678`).
    #[must_use]
    pub fn short(&self) -> &str {
        let skip = self.0.chars().count().saturating_sub(Self::SHORT_LEN);
        self.0
            .char_indices()
            .nth(skip)
            .map_or(self.0.as_str(), |(at, _)| &self.0[at..])
    }
}
