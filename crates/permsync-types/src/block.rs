//! The closed catalogue of permission block kinds.
//!
//! PermSync does not understand arbitrary document schemas. It operates on a
//! fixed set of named permission-block types, each holding simple key/value
//! entries. The tag strings are stable: they appear in rendered documents,
//! cache keys, and remote member listings.

use serde::{Deserialize, Serialize};

/// The kind of a permission block within a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    ApplicationVisibilities,
    CategoryGroupVisibilities,
    ClassAccesses,
    CustomMetadataTypeAccesses,
    CustomPermissions,
    CustomSettingAccesses,
    ExternalDataSourceAccesses,
    FieldPermissions,
    FlowAccesses,
    LayoutAssignments,
    ObjectPermissions,
    PageAccesses,
    RecordTypeVisibilities,
    TabVisibilities,
    UserPermissions,
}

impl BlockKind {
    /// Every block kind, in rendering order.
    pub const ALL: [BlockKind; 15] = [
        BlockKind::ApplicationVisibilities,
        BlockKind::CategoryGroupVisibilities,
        BlockKind::ClassAccesses,
        BlockKind::CustomMetadataTypeAccesses,
        BlockKind::CustomPermissions,
        BlockKind::CustomSettingAccesses,
        BlockKind::ExternalDataSourceAccesses,
        BlockKind::FieldPermissions,
        BlockKind::FlowAccesses,
        BlockKind::LayoutAssignments,
        BlockKind::ObjectPermissions,
        BlockKind::PageAccesses,
        BlockKind::RecordTypeVisibilities,
        BlockKind::TabVisibilities,
        BlockKind::UserPermissions,
    ];

    /// The stable tag string for this kind, as it appears in rendered
    /// documents and member listings.
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::ApplicationVisibilities => "applicationVisibilities",
            BlockKind::CategoryGroupVisibilities => "categoryGroupVisibilities",
            BlockKind::ClassAccesses => "classAccesses",
            BlockKind::CustomMetadataTypeAccesses => "customMetadataTypeAccesses",
            BlockKind::CustomPermissions => "customPermissions",
            BlockKind::CustomSettingAccesses => "customSettingAccesses",
            BlockKind::ExternalDataSourceAccesses => "externalDataSourceAccesses",
            BlockKind::FieldPermissions => "fieldPermissions",
            BlockKind::FlowAccesses => "flowAccesses",
            BlockKind::LayoutAssignments => "layoutAssignments",
            BlockKind::ObjectPermissions => "objectPermissions",
            BlockKind::PageAccesses => "pageAccesses",
            BlockKind::RecordTypeVisibilities => "recordTypeVisibilities",
            BlockKind::TabVisibilities => "tabVisibilities",
            BlockKind::UserPermissions => "userPermissions",
        }
    }

    /// Look up a kind from its tag string. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.tag() == tag)
    }

}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trip_for_all_kinds() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(BlockKind::from_tag("noSuchBlock"), None);
        assert_eq!(BlockKind::from_tag(""), None);
    }

    #[test]
    fn display_matches_tag() {
        assert_eq!(BlockKind::FieldPermissions.to_string(), "fieldPermissions");
    }

    #[test]
    fn catalogue_has_fifteen_kinds() {
        assert_eq!(BlockKind::ALL.len(), 15);
    }
}
