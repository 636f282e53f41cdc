use crate::domain::models::role::{ROLE_ADMIN, ROLE_USER};

/// Where a freshly authenticated session lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    AdminListing,
    UserProfile,
    LoginError,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::AdminListing => "/admin/user-list",
            Destination::UserProfile => "/user",
            Destination::LoginError => "/login?error",
        }
    }
}

pub fn post_login_destination<S: AsRef<str>>(authorities: &[S]) -> Destination {
    let has = |wanted: &str| authorities.iter().any(|a| a.as_ref() == wanted);

    if has(ROLE_ADMIN) {
        Destination::AdminListing
    } else if has(ROLE_USER) {
        Destination::UserProfile
    } else {
        Destination::LoginError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_wins_over_user() {
        let d = post_login_destination(&["ROLE_USER", "ROLE_ADMIN"]);
        assert_eq!(d, Destination::AdminListing);
        assert_eq!(d.path(), "/admin/user-list");
    }

    #[test]
    fn test_user_goes_to_profile() {
        assert_eq!(post_login_destination(&["ROLE_USER"]).path(), "/user");
    }

    #[test]
    fn test_unknown_or_empty_authorities_fall_through() {
        let none: [&str; 0] = [];
        assert_eq!(post_login_destination(&none), Destination::LoginError);
        assert_eq!(post_login_destination(&["ROLE_AUDITOR"]).path(), "/login?error");
    }
}
