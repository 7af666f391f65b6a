use std::{
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use coach_domain::{
    Assignment, AssignmentID, AssignmentService, BatchOutcome, ProgramID, ReadError, User,
    UserFilter, UserID, UserService,
};
use log::warn;

use crate::browser::{AvailableUsers, Browser, UserBrowser};

/// Assigned and assignable users of one program.
pub struct AssignmentBoard<S: UserService> {
    service: Arc<S>,
    program_id: ProgramID,
    assigned: RwLock<Vec<Assignment>>,
    available: UserBrowser<S>,
}

impl<S: AssignmentService + UserService> AssignmentBoard<S> {
    pub fn new(service: Arc<S>, program_id: ProgramID, page_size: u32, quiet: Duration) -> Self {
        Self {
            available: Browser::new(AvailableUsers(service.clone()), page_size, quiet),
            service,
            program_id,
            assigned: RwLock::new(vec![]),
        }
    }

    pub fn assigned(&self) -> Vec<Assignment> {
        self.assigned
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn available(&self) -> Vec<User> {
        self.available.items()
    }

    pub fn users(&self) -> &UserBrowser<S> {
        &self.available
    }

    pub async fn search(&self, filter: UserFilter) -> Result<bool, ReadError> {
        self.available.search(filter).await
    }

    /// Re-reads both lists.
    pub async fn load(&self) -> Result<(), ReadError> {
        let assignments = self.service.get_assignments(self.program_id).await?;
        *self
            .assigned
            .write()
            .unwrap_or_else(PoisonError::into_inner) = assignments;
        self.available.reload().await?;
        Ok(())
    }

    /// Assigns and removes users in one concurrent batch.
    ///
    /// Both lists are re-read afterwards regardless of the outcome, as some operations may
    /// have succeeded while others failed.
    pub async fn apply(
        &self,
        user_ids: Vec<UserID>,
        assignment_ids: Vec<AssignmentID>,
    ) -> BatchOutcome {
        let outcome = self
            .service
            .batch_assign_and_remove_users(self.program_id, user_ids, assignment_ids)
            .await;
        if let Err(err) = self.load().await {
            warn!(
                "failed to reload assignments of program {}: {err}",
                self.program_id
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use coach_domain::{Name, Program, ProgramTree, ProgramType, Service};
    use coach_storage::in_memory::InMemory;
    use pretty_assertions::assert_eq;

    use super::*;

    fn user(id: u128, name: &str, subscribed: bool) -> User {
        User {
            id: id.into(),
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            active_subscriptions: if subscribed {
                vec!["Premium".to_string()]
            } else {
                vec![]
            },
        }
    }

    fn program(id: u128, title: &str) -> ProgramTree {
        ProgramTree {
            program: Program {
                id: id.into(),
                title: Name::new(title).unwrap(),
                description: String::new(),
                program_type: ProgramType::General,
                created_at: DateTime::<Utc>::UNIX_EPOCH,
                updated_at: DateTime::<Utc>::UNIX_EPOCH,
            },
            weeks: vec![],
        }
    }

    fn store() -> InMemory {
        let store = InMemory::new();
        store.insert_program_tree(program(1, "Base")).unwrap();
        store.insert_program_tree(program(2, "Peak")).unwrap();
        for u in [
            user(41, "Alice", true),
            user(42, "Bob", true),
            user(43, "Carol", false),
            user(44, "Dave", true),
        ] {
            store.insert_user(u).unwrap();
        }
        store
    }

    fn board() -> (Arc<Service<InMemory>>, AssignmentBoard<Service<InMemory>>) {
        let service = Arc::new(Service::new(store()));
        let board = AssignmentBoard::new(service.clone(), 1.into(), 20, Duration::ZERO);
        (service, board)
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load() {
        let (_, board) = board();
        board.load().await.unwrap();
        assert_eq!(board.assigned(), vec![]);
        assert_eq!(names(&board.available()), vec!["Alice", "Bob", "Dave"]);
    }

    #[tokio::test]
    async fn test_apply_reloads_both_lists() {
        let (service, board) = board();
        board.load().await.unwrap();

        let outcome = board.apply(vec![41.into(), 42.into()], vec![]).await;
        assert!(outcome.is_success());
        assert_eq!(
            board
                .assigned()
                .iter()
                .map(|a| a.user_id)
                .collect::<std::collections::BTreeSet<_>>(),
            [UserID::from(41), UserID::from(42)].into()
        );
        assert_eq!(names(&board.available()), vec!["Dave"]);

        let other = service
            .assign_user_to_program(44.into(), 2.into())
            .await
            .unwrap();
        let alice = board
            .assigned()
            .into_iter()
            .find(|a| a.user_id == UserID::from(41))
            .unwrap();
        let outcome = board.apply(vec![44.into()], vec![alice.id]).await;
        assert_eq!(outcome.num_failures(), 1);
        assert_eq!(outcome.rejected_users(), vec![UserID::from(44)]);
        assert_eq!(
            board
                .assigned()
                .iter()
                .map(|a| a.user_id)
                .collect::<Vec<_>>(),
            vec![UserID::from(42)]
        );
        assert_eq!(names(&board.available()), vec!["Alice"]);
        assert_eq!(
            service.get_user_assignments(44.into()).await.unwrap(),
            vec![other]
        );
    }

    #[tokio::test]
    async fn test_apply_with_configured_expiry() {
        let settings = crate::Settings {
            assignment_expiry_days: Some(7),
            ..crate::Settings::default()
        };
        let service = Arc::new(
            Service::new(store()).with_assignment_validity(settings.assignment_validity()),
        );
        let board = AssignmentBoard::new(
            service,
            1.into(),
            settings.user_page_size,
            settings.search_debounce(),
        );

        let outcome = board.apply(vec![41.into()], vec![]).await;
        assert!(outcome.is_success());
        let assigned = board.assigned();
        assert_eq!(assigned.len(), 1);
        let expires_at = assigned[0].expires_at.unwrap();
        assert_eq!(expires_at - assigned[0].created_at, chrono::TimeDelta::days(7));
    }

    #[tokio::test]
    async fn test_search() {
        let (_, board) = board();
        board.load().await.unwrap();
        assert!(
            board
                .search(UserFilter {
                    search: "da".to_string()
                })
                .await
                .unwrap()
        );
        assert_eq!(names(&board.available()), vec!["Dave"]);
        assert!(!board.users().has_more());
    }
}
