use crate::{Page, PageRequest, ReadError};

id!(UserID);

/// Read access to the external user directory.
#[allow(async_fn_in_trait)]
pub trait UserRepository {
    /// Users with an active subscription who hold no incomplete assignment.
    async fn read_available_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, ReadError>;
    async fn read_user(&self, id: UserID) -> Result<User, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait UserService {
    async fn get_available_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, ReadError>;
    async fn get_user(&self, id: UserID) -> Result<User, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub name: String,
    pub email: String,
    pub active_subscriptions: Vec<String>,
}

impl User {
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        !self.active_subscriptions.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct UserFilter {
    pub search: String,
}

impl UserFilter {
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let search = self.search.trim().to_lowercase();
        user.name.to_lowercase().contains(&search) || user.email.to_lowercase().contains(&search)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_user_id_nil() {
        assert!(UserID::nil().is_nil());
        assert_eq!(UserID::nil(), UserID::default());
    }

    #[rstest]
    #[case("", true)]
    #[case("ALICE", true)]
    #[case("example.org", true)]
    #[case("bob", false)]
    fn test_user_filter_matches(#[case] search: &str, #[case] expected: bool) {
        let user = User {
            id: 1.into(),
            name: "Alice Smith".to_string(),
            email: "alice@example.org".to_string(),
            active_subscriptions: vec!["Premium".to_string()],
        };
        assert_eq!(
            UserFilter {
                search: search.to_string()
            }
            .matches(&user),
            expected
        );
        assert!(user.is_subscribed());
    }
}
