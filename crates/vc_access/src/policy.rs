//! Per-field traversal decisions taken during analysis.

use bitflags::bitflags;

// -----------------------------------------------------------------------------
// IterPolicy

/// What the analyzer does with one discovered field.
///
/// | Policy                   | Included | Children expanded | Halts level |
/// |--------------------------|----------|-------------------|-------------|
/// | `Take`                   | yes      | yes (if record)   | no          |
/// | `Hide`                   | no       | no                | no          |
/// | `SkipOffspring`          | yes      | no                | no          |
/// | `Skip`                   | no       | no                | no          |
/// | `TakeAndStop`            | yes      | yes (if record)   | yes         |
/// | `HideAndStop`            | no       | no                | yes         |
/// | `SkipOffspringAndStop`   | yes      | no                | yes         |
/// | `SkipAndStop`            | no       | no                | yes         |
///
/// Halting stops the remaining siblings of the same record. Records queued
/// for expansion by earlier siblings are still expanded.
///
/// # Examples
///
/// ```
/// use vc_access::policy::{IterPolicy, PolicyFlags};
///
/// let flags = IterPolicy::SkipOffspringAndStop.flags();
/// assert!(flags.contains(PolicyFlags::INCLUDE | PolicyFlags::HALT));
/// assert!(!flags.contains(PolicyFlags::EXPAND));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IterPolicy {
    /// Take the field and its sub-fields.
    #[default]
    Take,
    /// Leave the field out.
    Hide,
    /// Take the field but not its sub-fields.
    SkipOffspring,
    /// Leave out the field and its sub-fields.
    Skip,
    /// [`Take`](Self::Take), then stop the current level.
    TakeAndStop,
    /// [`Hide`](Self::Hide), then stop the current level.
    HideAndStop,
    /// [`SkipOffspring`](Self::SkipOffspring), then stop the current level.
    SkipOffspringAndStop,
    /// [`Skip`](Self::Skip), then stop the current level.
    SkipAndStop,
}

impl IterPolicy {
    /// Decodes the policy into independent flags.
    #[inline]
    pub const fn flags(self) -> PolicyFlags {
        match self {
            Self::Take => PolicyFlags::TAKE,
            Self::Hide | Self::Skip => PolicyFlags::empty(),
            Self::SkipOffspring => PolicyFlags::INCLUDE,
            Self::TakeAndStop => PolicyFlags::TAKE.union(PolicyFlags::HALT),
            Self::HideAndStop | Self::SkipAndStop => PolicyFlags::HALT,
            Self::SkipOffspringAndStop => PolicyFlags::INCLUDE.union(PolicyFlags::HALT),
        }
    }

    /// Returns `true` if the field appears in the shape.
    #[inline]
    pub const fn includes(self) -> bool {
        self.flags().contains(PolicyFlags::INCLUDE)
    }

    /// Returns `true` if a record element is expanded.
    #[inline]
    pub const fn expands(self) -> bool {
        self.flags().contains(PolicyFlags::EXPAND)
    }

    /// Returns `true` if the remaining siblings are dropped.
    #[inline]
    pub const fn halts(self) -> bool {
        self.flags().contains(PolicyFlags::HALT)
    }
}

// -----------------------------------------------------------------------------
// PolicyFlags

bitflags! {
    /// Decoded form of an [`IterPolicy`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PolicyFlags: u8 {
        /// The field is added to the shape.
        const INCLUDE = 1 << 0;
        /// A record element is queued for expansion.
        const EXPAND  = 1 << 1;
        /// No further sibling is processed.
        const HALT    = 1 << 2;

        const TAKE = Self::INCLUDE.bits() | Self::EXPAND.bits();
    }
}
