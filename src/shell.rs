//! Route table, sidebar and top bar around the record panels.

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::debug;

use crate::errors::AdminResult;
use crate::resource::ResourceKind;
use crate::session::{self, SessionStore};

/// Badge count shown next to the bell in the top bar.
pub const NOTIFICATION_COUNT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum Route {
    Login,
    Dashboard,
    Employee,
    Supplier,
    Inventory,
    Quality,
    Sales,
    AddProduct,
    SystemUsers,
    Help,
    Settings,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::Employee => "/employee",
            Self::Supplier => "/supplier",
            Self::Inventory => "/inventory",
            Self::Quality => "/qa",
            Self::Sales => "/sales",
            Self::AddProduct => "/addproduct",
            Self::SystemUsers => "/systemuser",
            Self::Help => "/help",
            Self::Settings => "/settings",
            Self::Profile => "/profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Employee => "Employee",
            Self::Supplier => "Supplier",
            Self::Inventory => "Inventory",
            Self::Quality => "Quality",
            Self::Sales => "Sales",
            Self::AddProduct => "Add Product",
            Self::SystemUsers => "System Users",
            Self::Help => "Help",
            Self::Settings => "Settings",
            Self::Profile => "Profile",
        }
    }

    /// Matches a path case-insensitively, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Self::iter().find(|route| route.path().eq_ignore_ascii_case(normalized))
    }

    /// The record collection a route manages, if any.
    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            Self::Employee => Some(ResourceKind::Employees),
            Self::Supplier => Some(ResourceKind::Suppliers),
            Self::Inventory => Some(ResourceKind::Inventory),
            Self::Quality => Some(ResourceKind::Quality),
            Self::Sales => Some(ResourceKind::Sales),
            Self::AddProduct => Some(ResourceKind::Products),
            Self::SystemUsers => Some(ResourceKind::Users),
            _ => None,
        }
    }

    pub fn in_sidebar(&self) -> bool {
        !matches!(self, Self::Login | Self::Profile)
    }
}

/// Sidebar entries in display order.
pub fn sidebar() -> Vec<Route> {
    Route::iter().filter(Route::in_sidebar).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopBar {
    /// Shown but not wired to anything.
    pub search: String,
    pub notification_count: u32,
}

impl Default for TopBar {
    fn default() -> Self {
        Self {
            search: String::new(),
            notification_count: NOTIFICATION_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMenuAction {
    Profile,
    Logout,
}

#[derive(Debug, Clone)]
pub struct NavigationShell {
    current: Route,
    top_bar: TopBar,
    store: SessionStore,
}

impl NavigationShell {
    pub fn new(store: SessionStore) -> Self {
        Self {
            current: Route::Dashboard,
            top_bar: TopBar::default(),
            store,
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn top_bar(&self) -> &TopBar {
        &self.top_bar
    }

    pub fn navigate(&mut self, route: Route) -> Route {
        debug!(from = %self.current, to = %route, "Navigating");
        self.current = route;
        route
    }

    /// Handles a profile-menu pick. Logging out clears the stored session
    /// and lands on the login route.
    pub fn select(&mut self, action: ProfileMenuAction) -> AdminResult<Route> {
        match action {
            ProfileMenuAction::Profile => Ok(self.navigate(Route::Profile)),
            ProfileMenuAction::Logout => {
                session::logout(&self.store)?;
                Ok(self.navigate(Route::Login))
            }
        }
    }

    /// Sidebar as text, the current route marked with `>`.
    pub fn render_sidebar(&self) -> String {
        sidebar()
            .into_iter()
            .map(|route| {
                let marker = if route == self.current { ">" } else { " " };
                format!("{} {:<14} {}", marker, route.label(), route.path())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
