//! The fixed set of logical entities served by the API.
//!
//! Per-entity behavior (table name, path segment, pagination, alias policy,
//! response projection, hidden columns) hangs off this enum so the handlers
//! stay generic.

use crate::project::{Projection, PATHWAY_PROJECTION, POST_PROJECTION};

/// Incoming field name plus column candidates tried in order when the field
/// itself is not a column on the destination table.
pub type FieldAliases = &'static [(&'static str, &'static [&'static str])];

const POST_FIELD_ALIASES: FieldAliases = &[
    ("content", &["body", "text"]),
    ("author_id", &["user_id", "author"]),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Service,
    Booking,
    Category,
    User,
    Profile,
    Post,
    Comment,
    Pathway,
    Step,
}

impl Entity {
    pub const ALL: [Entity; 9] = [
        Entity::Service,
        Entity::Booking,
        Entity::Category,
        Entity::User,
        Entity::Profile,
        Entity::Post,
        Entity::Comment,
        Entity::Pathway,
        Entity::Step,
    ];

    /// Table name in the externally managed database.
    pub fn table(self) -> &'static str {
        match self {
            Entity::Service => "marketplace_service",
            Entity::Booking => "marketplace_booking",
            Entity::Category => "marketplace_category",
            Entity::User => "auth_user",
            Entity::Profile => "users_profile",
            Entity::Post => "blog_post",
            Entity::Comment => "blog_comment",
            Entity::Pathway => "academy_learningpathway",
            Entity::Step => "academy_modulestep",
        }
    }

    /// URL path segment for the collection routes.
    pub fn path_segment(self) -> &'static str {
        match self {
            Entity::Service => "services",
            Entity::Booking => "bookings",
            Entity::Category => "categories",
            Entity::User => "users",
            Entity::Profile => "profiles",
            Entity::Post => "posts",
            Entity::Comment => "comments",
            Entity::Pathway => "pathways",
            Entity::Step => "steps",
        }
    }

    /// Display name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Entity::Service => "Service",
            Entity::Booking => "Booking",
            Entity::Category => "Category",
            Entity::User => "User",
            Entity::Profile => "Profile",
            Entity::Post => "Post",
            Entity::Comment => "Comment",
            Entity::Pathway => "Pathway",
            Entity::Step => "Step",
        }
    }

    pub fn from_path(segment: &str) -> Option<Entity> {
        Entity::ALL.iter().copied().find(|e| e.path_segment() == segment)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Services and bookings page through skip/limit; the rest list everything.
    pub fn paginated(self) -> bool {
        matches!(self, Entity::Service | Entity::Booking)
    }

    /// Bookings are only created nested under a service.
    pub fn top_level_create(self) -> bool {
        !matches!(self, Entity::Booking)
    }

    /// Columns stripped from every response.
    pub fn hidden_columns(self) -> &'static [&'static str] {
        match self {
            Entity::User => &["password"],
            _ => &[],
        }
    }

    /// Incoming-field aliases applied before column filtering on writes.
    pub fn field_aliases(self) -> FieldAliases {
        match self {
            Entity::Post => POST_FIELD_ALIASES,
            _ => &[],
        }
    }

    /// Response projection; entities without one pass rows through.
    pub fn projection(self) -> Option<Projection> {
        match self {
            Entity::Post => Some(POST_PROJECTION),
            Entity::Pathway => Some(PATHWAY_PROJECTION),
            _ => None,
        }
    }
}
