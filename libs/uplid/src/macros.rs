//! Macros for defining typed ID types.

/// Macro to define a typed ID with a specific prefix.
///
/// This generates:
/// - A marker type implementing [`Prefix`](crate::Prefix)
/// - A `pub type` alias for [`Id`](crate::Id) over that marker
/// - A compile-time check that the prefix is non-empty lowercase ASCII
///
/// # Example
///
/// ```ignore
/// define_id!(UserId, User, "usr");
/// define_id!(OrderId, Order, "ord");
///
/// let user_id = UserId::new();
/// let parsed: UserId = "usr_2Qm7b0Gd1kYkVN1nuvJYm3k8W1a".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $marker:ident, $prefix:literal) => {
        /// Marker type binding the prefix of this ID type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $marker;

        impl $crate::Prefix for $marker {
            const PREFIX: &'static str = $prefix;
        }

        const _: () = assert!(
            $crate::is_valid_prefix($prefix),
            concat!("invalid ID prefix '", $prefix, "': expected lowercase ASCII letters"),
        );

        /// A typed ID for this entity kind.
        pub type $name = $crate::Id<$marker>;
    };
}

#[cfg(test)]
mod tests {
    use crate::IdError;

    define_id!(UserId, User, "usr");
    define_id!(WorkspaceId, Workspace, "wrkspace");

    #[test]
    fn test_defined_ids_carry_prefix() {
        assert_eq!(UserId::PREFIX, "usr");
        assert_eq!(WorkspaceId::PREFIX, "wrkspace");
        assert!(WorkspaceId::new().to_string().starts_with("wrkspace_"));
    }

    #[test]
    fn test_defined_ids_are_distinct_kinds() {
        let ws = WorkspaceId::new();
        assert!(matches!(
            UserId::parse(&ws.to_string()).unwrap_err(),
            IdError::PrefixMismatch { .. }
        ));
    }
}
