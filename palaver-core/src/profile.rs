/// Display profile attached to a conversation. Seeded at startup; an ad-hoc
/// individual profile can also be synthesized when opening a conversation
/// the directory does not know about.
#[derive(Clone, Debug)]
pub struct Profile {
    pub display_name: String,
    pub avatar_initials: String,
    /// Avatar gradient color stops, as hex strings.
    pub gradient: (String, String),
    /// Presence line shown under the name ("Online", "Last seen …",
    /// "5 members").
    pub status: String,
    pub online: bool,
    pub kind: ProfileKind,
}

#[derive(Clone, Debug)]
pub enum ProfileKind {
    Individual {
        about: Option<String>,
        phone: Option<String>,
    },
    Group {
        description: String,
        member_count: usize,
        members: Vec<GroupMember>,
    },
}

#[derive(Clone, Debug)]
pub struct GroupMember {
    pub name: String,
    pub initials: String,
    pub gradient: (String, String),
    pub status: String,
    pub admin: bool,
}

impl Profile {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ProfileKind::Group { .. })
    }
}
