use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Registration,
    Courses,
    Home,
    Help,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Registration => "/registration",
            Route::Courses => "/courses",
            Route::Home => "/home",
            Route::Help => "/help",
        }
    }

    /// Maps a path to its route. `/` redirects to the login page; unknown
    /// paths resolve to nothing.
    pub fn resolve(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "" | "/" | "/login" => Some(Route::Login),
            "/registration" => Some(Route::Registration),
            "/courses" => Some(Route::Courses),
            "/home" => Some(Route::Home),
            "/help" => Some(Route::Help),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a view wants to go next, optionally after a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub to: Route,
    pub after: Duration,
}

impl Navigation {
    pub fn now(to: Route) -> Self {
        Self {
            to,
            after: Duration::ZERO,
        }
    }

    pub fn after(to: Route, after: Duration) -> Self {
        Self { to, after }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub name: &'static str,
    pub route: Route,
}

pub const NAV_LINKS: [NavLink; 3] = [
    NavLink {
        name: "Courses",
        route: Route::Courses,
    },
    NavLink {
        name: "My Profile",
        route: Route::Home,
    },
    NavLink {
        name: "Help",
        route: Route::Help,
    },
];
