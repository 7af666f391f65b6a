use chrono::{DateTime, TimeDelta, Utc};

use crate::{CreateError, DeleteError, ProgramID, ReadError, UserID};

id!(AssignmentID);

#[allow(async_fn_in_trait)]
pub trait AssignmentRepository {
    async fn read_assignments(&self, program_id: ProgramID)
    -> Result<Vec<Assignment>, ReadError>;
    async fn read_user_assignments(&self, user_id: UserID) -> Result<Vec<Assignment>, ReadError>;
    /// Creates an incomplete assignment.
    ///
    /// Fails with [`CreateError::UserHasActiveProgram`] if the user already holds an
    /// incomplete assignment in any program. The check and the insert are atomic.
    async fn create_assignment(
        &self,
        user_id: UserID,
        program_id: ProgramID,
        valid_for: Option<TimeDelta>,
    ) -> Result<Assignment, CreateError>;
    async fn delete_assignment(&self, id: AssignmentID) -> Result<AssignmentID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait AssignmentService {
    async fn get_assignments(&self, program_id: ProgramID) -> Result<Vec<Assignment>, ReadError>;
    async fn get_user_assignments(&self, user_id: UserID) -> Result<Vec<Assignment>, ReadError>;
    async fn assign_user_to_program(
        &self,
        user_id: UserID,
        program_id: ProgramID,
    ) -> Result<Assignment, CreateError>;
    async fn remove_user_assignment(&self, id: AssignmentID) -> Result<AssignmentID, DeleteError>;
    /// Issues all assignments and removals concurrently.
    ///
    /// The batch is not transactional. Operations that succeeded are kept even if others
    /// failed, so callers have to re-read the affected lists afterwards.
    async fn batch_assign_and_remove_users(
        &self,
        program_id: ProgramID,
        user_ids: Vec<UserID>,
        assignment_ids: Vec<AssignmentID>,
    ) -> BatchOutcome;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: AssignmentID,
    pub program_id: ProgramID,
    pub user_id: UserID,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Fails if `assignments` contain an incomplete assignment of the user.
pub fn check_assignable(user_id: UserID, assignments: &[Assignment]) -> Result<(), CreateError> {
    if assignments
        .iter()
        .any(|a| a.user_id == user_id && !a.completed)
    {
        return Err(CreateError::UserHasActiveProgram(user_id));
    }
    Ok(())
}

/// Completed assignments are kept as history and cannot be removed.
pub fn check_removable(assignment: &Assignment) -> Result<(), DeleteError> {
    if assignment.completed {
        return Err(DeleteError::AssignmentCompleted(assignment.id));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub assigned: Vec<(UserID, Result<Assignment, CreateError>)>,
    pub removed: Vec<(AssignmentID, Result<AssignmentID, DeleteError>)>,
}

impl BatchOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.assigned.iter().all(|(_, r)| r.is_ok()) && self.removed.iter().all(|(_, r)| r.is_ok())
    }

    #[must_use]
    pub fn num_failures(&self) -> usize {
        self.assigned.iter().filter(|(_, r)| r.is_err()).count()
            + self.removed.iter().filter(|(_, r)| r.is_err()).count()
    }

    #[must_use]
    pub fn rejected_users(&self) -> Vec<UserID> {
        self.assigned
            .iter()
            .filter(|(_, r)| r.is_err())
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn assignment(id: u128, user_id: u128, completed: bool) -> Assignment {
        Assignment {
            id: id.into(),
            program_id: 1.into(),
            user_id: user_id.into(),
            completed,
            completed_at: None,
            expires_at: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[rstest]
    #[case(&[], true)]
    #[case(&[(1, 2, false)], true)]
    #[case(&[(1, 1, true), (2, 1, true)], true)]
    #[case(&[(1, 1, true), (2, 1, false)], false)]
    fn test_check_assignable(#[case] existing: &[(u128, u128, bool)], #[case] expected: bool) {
        let assignments = existing
            .iter()
            .map(|(id, user_id, completed)| assignment(*id, *user_id, *completed))
            .collect::<Vec<_>>();
        let result = check_assignable(1.into(), &assignments);
        assert_eq!(result.is_ok(), expected);
        if !expected {
            assert!(matches!(
                result,
                Err(CreateError::UserHasActiveProgram(user_id)) if user_id == UserID::from(1)
            ));
        }
    }

    #[test]
    fn test_check_removable() {
        assert!(check_removable(&assignment(1, 1, false)).is_ok());
        assert!(matches!(
            check_removable(&assignment(1, 1, true)),
            Err(DeleteError::AssignmentCompleted(id)) if id == AssignmentID::from(1)
        ));
    }

    #[test]
    fn test_assignment_is_expired() {
        let mut a = assignment(1, 1, false);
        assert!(!a.is_expired(DateTime::<Utc>::MAX_UTC));
        a.expires_at = Some(DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(28));
        assert!(!a.is_expired(DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(27)));
        assert!(a.is_expired(DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(28)));
    }

    #[test]
    fn test_batch_outcome() {
        let outcome = BatchOutcome {
            assigned: vec![
                (1.into(), Ok(assignment(10, 1, false))),
                (2.into(), Err(CreateError::UserHasActiveProgram(2.into()))),
            ],
            removed: vec![(11.into(), Err(DeleteError::NotFound))],
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.num_failures(), 2);
        assert_eq!(outcome.rejected_users(), vec![UserID::from(2)]);
        assert!(BatchOutcome::default().is_success());
    }
}
