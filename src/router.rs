//! Page routing collaborator.
//!
//! The editing core consumes a `navigate(page)` capability and a
//! `current_page` read; it does not own routing, scrolling, or any
//! rendering. Page names arrive from navigation labels and are matched
//! case-insensitively (the nav bar capitalizes what the router lowercases).

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouterError {
    #[error("unknown page '{0}'")]
    UnknownPage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Projetos,
    Fotos,
    Postagens,
    Sobre,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Projetos,
        Page::Fotos,
        Page::Postagens,
        Page::Sobre,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Projetos => "projetos",
            Page::Fotos => "fotos",
            Page::Postagens => "postagens",
            Page::Sobre => "sobre",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(Page::Home),
            "projetos" => Ok(Page::Projetos),
            "fotos" => Ok(Page::Fotos),
            "postagens" => Ok(Page::Postagens),
            "sobre" => Ok(Page::Sobre),
            other => Err(RouterError::UnknownPage(other.to_string())),
        }
    }
}

/// Holds the current page. Starts at home.
#[derive(Debug, Default)]
pub struct Router {
    current: Page,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> Page {
        self.current
    }

    pub fn navigate(&mut self, page: Page) {
        self.current = page;
    }

    /// Navigate by display name, e.g. `"Postagens"` from a nav label.
    pub fn navigate_to(&mut self, name: &str) -> Result<Page, RouterError> {
        let page = name.parse()?;
        self.current = page;
        Ok(page)
    }

    /// The detail pages' back affordance.
    pub fn back_home(&mut self) {
        self.current = Page::Home;
    }
}
