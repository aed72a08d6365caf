//! Role-gated pages of the navigation shell.

use crate::program::Category;

/// Public entry view (the login form).
pub const ENTRY_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Trail,
    Morning,
    Afternoon,
    Roster,
}

impl Page {
    pub const ALL: [Self; 4] = [Self::Trail, Self::Morning, Self::Afternoon, Self::Roster];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Trail => "bivak",
            Self::Morning => "program_dop",
            Self::Afternoon => "program_pop",
            Self::Roster => "prijave_vod",
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Trail => "/prijava-bivak",
            Self::Morning => "/prijava-program-dop",
            Self::Afternoon => "/prijava-program-pop",
            Self::Roster => "/prijave-clani",
        }
    }

    #[must_use]
    pub const fn title_key(self) -> &'static str {
        match self {
            Self::Trail => "nav.trail",
            Self::Morning => "nav.morning",
            Self::Afternoon => "nav.afternoon",
            Self::Roster => "nav.roster",
        }
    }

    /// Slovenian label, used where no translation layer is available.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trail => "Bivak trasa",
            Self::Morning => "Dopoldanski program",
            Self::Afternoon => "Prijava na pop program",
            Self::Roster => "Prijave članov - popoldne",
        }
    }

    /// Selection category behind the page; the roster has none.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            Self::Trail => Some(Category::Trail),
            Self::Morning => Some(Category::Morning),
            Self::Afternoon => Some(Category::Afternoon),
            Self::Roster => None,
        }
    }

    /// Leaders run trails, the morning program and the roster; everyone else
    /// applies for the afternoon program.
    #[must_use]
    pub const fn visible_to(self, leader: bool) -> bool {
        match self {
            Self::Trail | Self::Morning | Self::Roster => leader,
            Self::Afternoon => !leader,
        }
    }
}

/// Navigation entries for a role, in display order.
#[must_use]
pub fn pages_for(leader: bool) -> Vec<Page> {
    Page::ALL
        .into_iter()
        .filter(|page| page.visible_to(leader))
        .collect()
}

/// Where a successful login lands.
#[must_use]
pub const fn landing_page(leader: bool) -> Page {
    if leader { Page::Trail } else { Page::Afternoon }
}
