use std::ops::BitOr;

/// A single collision tag. Every body belongs to exactly one group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollisionGroup(u32);

/// Set of groups a body is willing to touch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollisionMask(u32);

impl CollisionGroup {
    /// Group of bodies that never had one assigned.
    pub const DEFAULT: CollisionGroup = CollisionGroup(1);

    pub(crate) fn from_bit(bit: u32) -> Self {
        Self(1 << bit)
    }

    pub fn bits(self) -> u32 { self.0 }
}

impl CollisionMask {
    pub const NONE: CollisionMask = CollisionMask(0);
    pub const ALL: CollisionMask = CollisionMask(u32::MAX);

    pub fn bits(self) -> u32 { self.0 }

    pub fn contains(self, group: CollisionGroup) -> bool {
        self.0 & group.0 != 0
    }
}

impl From<CollisionGroup> for CollisionMask {
    fn from(group: CollisionGroup) -> Self {
        CollisionMask(group.0)
    }
}

impl<const N: usize> From<[CollisionGroup; N]> for CollisionMask {
    fn from(groups: [CollisionGroup; N]) -> Self {
        groups.iter().fold(CollisionMask::NONE, |mask, &group| mask | group)
    }
}

impl BitOr for CollisionGroup {
    type Output = CollisionMask;

    fn bitor(self, rhs: Self) -> CollisionMask {
        CollisionMask(self.0 | rhs.0)
    }
}

impl BitOr<CollisionGroup> for CollisionMask {
    type Output = CollisionMask;

    fn bitor(self, rhs: CollisionGroup) -> CollisionMask {
        CollisionMask(self.0 | rhs.0)
    }
}

impl BitOr for CollisionMask {
    type Output = CollisionMask;

    fn bitor(self, rhs: Self) -> CollisionMask {
        CollisionMask(self.0 | rhs.0)
    }
}

/// Two bodies are tested against each other only when each one's mask
/// accepts the other's group.
pub fn groups_pair(
    group_a: CollisionGroup,
    mask_a: CollisionMask,
    group_b: CollisionGroup,
    mask_b: CollisionMask
) -> bool {
    mask_a.contains(group_b) && mask_b.contains(group_a)
}
