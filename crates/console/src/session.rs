//! Session-scoped cache of one program tree.
//!
//! Structural changes are never merged into the cache. Every mutation is followed by a refresh
//! of the whole tree. The only local change is the optimistic reordering of a day, which is
//! discarded by a refresh if the store rejects it.

use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

use coach_domain::{
    CloneService, CreateError, Day, DayID, DayOfWeek, DayTree, DeleteError, ExerciseID, Name,
    OrderingService, Prescription, ProgramID, ProgramService, ProgramTree, ReadError,
    UpdateError, Week, WeekID, WeekOrder, WeekTree, WorkoutExercise, WorkoutExerciseID,
};
use log::{debug, warn};

pub struct ProgramSession<S> {
    service: Arc<S>,
    program_id: ProgramID,
    tree: RwLock<Option<Arc<ProgramTree>>>,
}

impl<S> ProgramSession<S> {
    pub fn new(service: Arc<S>, program_id: ProgramID) -> Self {
        Self {
            service,
            program_id,
            tree: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn program_id(&self) -> ProgramID {
        self.program_id
    }

    /// The cached tree, if any.
    pub fn tree(&self) -> Option<Arc<ProgramTree>> {
        self.tree
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, tree: Option<Arc<ProgramTree>>) {
        *self.tree.write().unwrap_or_else(PoisonError::into_inner) = tree;
    }
}

impl<S: ProgramService + OrderingService + CloneService> ProgramSession<S> {
    /// Returns the cached tree or fetches it on first use.
    pub async fn fetch_tree(&self) -> Result<Arc<ProgramTree>, ReadError> {
        if let Some(tree) = self.tree() {
            return Ok(tree);
        }
        self.refresh().await
    }

    /// Fetches the tree and replaces the cached one as a whole.
    pub async fn refresh(&self) -> Result<Arc<ProgramTree>, ReadError> {
        match self.service.get_program_tree(self.program_id).await {
            Ok(tree) => {
                let tree = Arc::new(tree);
                self.replace(Some(tree.clone()));
                debug!("refreshed program {}", self.program_id);
                Ok(tree)
            }
            Err(err) => {
                if matches!(err, ReadError::NotFound) {
                    self.replace(None);
                }
                Err(err)
            }
        }
    }

    async fn refreshed<T, E>(&self, result: Result<T, E>) -> Result<T, E> {
        if let Err(err) = self.refresh().await {
            warn!("failed to refresh program {}: {err}", self.program_id);
            self.replace(None);
        }
        result
    }

    pub async fn create_next_week(&self) -> Result<Week, CreateError> {
        let result = self.service.create_next_week(self.program_id).await;
        self.refreshed(result).await
    }

    pub async fn delete_week(&self, id: WeekID) -> Result<WeekID, DeleteError> {
        let result = self.service.delete_week(id).await;
        self.refreshed(result).await
    }

    pub async fn create_day(
        &self,
        week_id: WeekID,
        day_of_week: DayOfWeek,
        title: String,
    ) -> Result<Day, CreateError> {
        let result = self.service.create_day(week_id, day_of_week, title).await;
        self.refreshed(result).await
    }

    pub async fn update_day_title(&self, id: DayID, title: String) -> Result<Day, UpdateError> {
        let result = self.service.update_day_title(id, title).await;
        self.refreshed(result).await
    }

    pub async fn move_day(&self, id: DayID, day_of_week: DayOfWeek) -> Result<Day, UpdateError> {
        let result = self.service.move_day(id, day_of_week).await;
        self.refreshed(result).await
    }

    pub async fn delete_day(&self, id: DayID) -> Result<DayID, DeleteError> {
        let result = self.service.delete_day(id).await;
        self.refreshed(result).await
    }

    pub async fn add_workout_exercise(
        &self,
        day_id: DayID,
        exercise_id: ExerciseID,
        prescription: Prescription,
    ) -> Result<WorkoutExercise, CreateError> {
        let result = self
            .service
            .add_workout_exercise(day_id, exercise_id, prescription)
            .await;
        self.refreshed(result).await
    }

    pub async fn modify_workout_exercise(
        &self,
        id: WorkoutExerciseID,
        prescription: Prescription,
    ) -> Result<WorkoutExercise, UpdateError> {
        let result = self.service.modify_workout_exercise(id, prescription).await;
        self.refreshed(result).await
    }

    pub async fn set_superset(
        &self,
        id: WorkoutExerciseID,
        partner: Option<WorkoutExerciseID>,
    ) -> Result<WorkoutExercise, UpdateError> {
        let result = self.service.set_superset(id, partner).await;
        self.refreshed(result).await
    }

    pub async fn delete_workout_exercise(
        &self,
        id: WorkoutExerciseID,
    ) -> Result<WorkoutExerciseID, DeleteError> {
        let result = self.service.delete_workout_exercise(id).await;
        self.refreshed(result).await
    }

    /// Reorders the exercises of a day.
    ///
    /// The new order is applied to the cached tree before the store confirms it. If the store
    /// rejects the order, the cached tree is replaced by a fresh copy from the store.
    pub async fn reorder_exercises(
        &self,
        day_id: DayID,
        ids: Vec<WorkoutExerciseID>,
    ) -> Result<BTreeMap<WorkoutExerciseID, u32>, UpdateError> {
        self.apply_locally(day_id, &ids);
        let result = self.service.reorder_exercises(day_id, ids).await;
        if let Err(err) = &result {
            debug!("discarding local order of day {day_id}: {err}");
            if let Err(err) = self.refresh().await {
                warn!("failed to refresh program {}: {err}", self.program_id);
                self.replace(None);
            }
        }
        result
    }

    fn apply_locally(&self, day_id: DayID, ids: &[WorkoutExerciseID]) {
        let Some(tree) = self.tree() else {
            return;
        };
        let mut tree = (*tree).clone();
        if let Some(day) = tree.day_mut(day_id) {
            if day.reorder(ids).is_ok() {
                self.replace(Some(Arc::new(tree)));
            }
        }
    }

    pub async fn clone_program(&self, title: Name) -> Result<ProgramTree, CreateError> {
        let result = self.service.clone_program(self.program_id, title).await;
        self.refreshed(result).await
    }

    pub async fn duplicate_week(
        &self,
        week_id: WeekID,
        destination: WeekOrder,
    ) -> Result<WeekTree, CreateError> {
        let result = self
            .service
            .duplicate_week(week_id, destination, self.program_id)
            .await;
        self.refreshed(result).await
    }

    pub async fn clone_day(
        &self,
        source_week_id: WeekID,
        source_day_of_week: DayOfWeek,
        destination_week_id: WeekID,
        destination_day_of_week: DayOfWeek,
    ) -> Result<DayTree, CreateError> {
        let result = self
            .service
            .clone_day(
                source_week_id,
                source_day_of_week,
                destination_week_id,
                destination_day_of_week,
            )
            .await;
        self.refreshed(result).await
    }

    pub async fn copy_exercise_to_day(
        &self,
        id: WorkoutExerciseID,
        destination_day_id: DayID,
    ) -> Result<WorkoutExercise, CreateError> {
        let result = self
            .service
            .copy_exercise_to_day(id, destination_day_id)
            .await;
        self.refreshed(result).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use coach_domain::{
        Exercise, MuscleGroup, Program, ProgramType, Service, Sets, Time, WorkoutExerciseType,
    };
    use coach_storage::in_memory::InMemory;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const PROGRAM_ID: u128 = 1;
    const WEEK_ID: u128 = 11;
    const DAY_ID: u128 = 21;

    fn prescription() -> Prescription {
        Prescription::new(
            WorkoutExerciseType::Reps,
            Sets::new(3).unwrap(),
            10,
            Time::new(60).unwrap(),
        )
        .unwrap()
    }

    async fn session() -> ProgramSession<Service<InMemory>> {
        let store = InMemory::new();
        for (id, title) in [(1, "Squat"), (2, "Lunge"), (3, "Calf Raise")] {
            store
                .insert_exercise(Exercise {
                    id: id.into(),
                    title: Name::new(title).unwrap(),
                    muscle_group: MuscleGroup::Quads,
                    description: String::new(),
                    video: None,
                    duration: None,
                })
                .unwrap();
        }
        let program = Program {
            id: PROGRAM_ID.into(),
            title: Name::new("Legs").unwrap(),
            description: String::new(),
            program_type: ProgramType::Strength,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let week = Week {
            id: WEEK_ID.into(),
            program_id: program.id,
            order: WeekOrder::new(1).unwrap(),
        };
        let day = Day {
            id: DAY_ID.into(),
            week_id: week.id,
            day_of_week: DayOfWeek::new(1).unwrap(),
            title: "Legs".to_string(),
        };
        let exercises = (1..=3)
            .map(|i: u32| WorkoutExercise {
                id: (30 + u128::from(i)).into(),
                day_id: day.id,
                exercise_id: u128::from(i).into(),
                order: i,
                prescription: prescription(),
                superset: None,
            })
            .collect::<Vec<_>>();
        store
            .insert_program_tree(ProgramTree::assemble(program, [week], [day], exercises))
            .unwrap();
        ProgramSession::new(Arc::new(Service::new(store)), PROGRAM_ID.into())
    }

    fn ids(ids: &[u128]) -> Vec<WorkoutExerciseID> {
        ids.iter().copied().map(WorkoutExerciseID::from).collect()
    }

    fn day_order(tree: &ProgramTree) -> Vec<WorkoutExerciseID> {
        tree.day(DAY_ID.into()).unwrap().exercise_ids()
    }

    #[tokio::test]
    async fn test_fetch_tree_caches() {
        let session = session().await;
        assert_eq!(session.tree(), None);
        let tree = session.fetch_tree().await.unwrap();
        assert_eq!(tree.num_workout_exercises(), 3);
        assert!(Arc::ptr_eq(&tree, &session.fetch_tree().await.unwrap()));
        assert!(!Arc::ptr_eq(&tree, &session.refresh().await.unwrap()));
    }

    #[tokio::test]
    async fn test_fetch_tree_not_found() {
        let session = ProgramSession::new(Arc::new(Service::new(InMemory::new())), 9.into());
        assert!(matches!(
            session.fetch_tree().await,
            Err(ReadError::NotFound)
        ));
        assert_eq!(session.tree(), None);
    }

    #[tokio::test]
    async fn test_mutations_refresh_tree() {
        let session = session().await;
        session.fetch_tree().await.unwrap();

        let week = session.create_next_week().await.unwrap();
        assert_eq!(
            session.tree().unwrap().week_orders(),
            vec![WeekOrder::new(1).unwrap(), week.order]
        );

        let day = session
            .create_day(week.id, DayOfWeek::new(3).unwrap(), "Recovery".to_string())
            .await
            .unwrap();
        let workout_exercise = session
            .add_workout_exercise(day.id, 2.into(), prescription())
            .await
            .unwrap();
        assert_eq!(
            session.tree().unwrap().workout_exercise(workout_exercise.id),
            Some(&workout_exercise)
        );

        session.delete_week(week.id).await.unwrap();
        assert_eq!(session.tree().unwrap().num_weeks(), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_refreshes_tree() {
        let session = session().await;
        session.fetch_tree().await.unwrap();
        assert!(matches!(
            session
                .create_day(WEEK_ID.into(), DayOfWeek::new(1).unwrap(), "Again".to_string())
                .await,
            Err(CreateError::DaySlotTaken(_))
        ));
        assert_eq!(session.tree().unwrap().num_days(), 1);
    }

    #[tokio::test]
    async fn test_clone_operations_refresh_tree() {
        let session = session().await;
        let copy = session
            .clone_program(Name::new("Legs (copy)").unwrap())
            .await
            .unwrap();
        assert_eq!(copy.num_workout_exercises(), 3);
        assert!(copy.ids().is_disjoint(&session.fetch_tree().await.unwrap().ids()));

        let week = session
            .duplicate_week(WEEK_ID.into(), WeekOrder::new(2).unwrap())
            .await
            .unwrap();
        session
            .clone_day(
                WEEK_ID.into(),
                DayOfWeek::new(1).unwrap(),
                week.week.id,
                DayOfWeek::new(5).unwrap(),
            )
            .await
            .unwrap();
        session
            .copy_exercise_to_day(31.into(), DAY_ID.into())
            .await
            .unwrap();

        let tree = session.tree().unwrap();
        assert_eq!(tree.num_weeks(), 2);
        assert_eq!(tree.num_days(), 3);
        assert_eq!(tree.num_workout_exercises(), 10);
    }

    #[tokio::test]
    async fn test_reorder_exercises() {
        let session = session().await;
        session.fetch_tree().await.unwrap();
        let order = session
            .reorder_exercises(DAY_ID.into(), ids(&[33, 31, 32]))
            .await
            .unwrap();
        assert_eq!(
            order,
            BTreeMap::from([
                (WorkoutExerciseID::from(31), 2),
                (WorkoutExerciseID::from(32), 3),
                (WorkoutExerciseID::from(33), 1),
            ])
        );
        assert_eq!(day_order(&session.tree().unwrap()), ids(&[33, 31, 32]));
    }

    #[rstest]
    #[case(&[33, 31])]
    #[case(&[33, 31, 32, 32])]
    #[case(&[33, 31, 32, 99])]
    #[tokio::test]
    async fn test_rejected_reorder_restores_tree(#[case] order: &[u128]) {
        let session = session().await;
        session.fetch_tree().await.unwrap();
        assert!(matches!(
            session.reorder_exercises(DAY_ID.into(), ids(order)).await,
            Err(UpdateError::InvalidInput(_))
        ));
        assert_eq!(day_order(&session.tree().unwrap()), ids(&[31, 32, 33]));
    }

    #[tokio::test]
    async fn test_reorder_applies_locally_before_confirmation() {
        let session = session().await;
        session.fetch_tree().await.unwrap();
        session.apply_locally(DAY_ID.into(), &ids(&[32, 33, 31]));
        assert_eq!(day_order(&session.tree().unwrap()), ids(&[32, 33, 31]));
        session.apply_locally(DAY_ID.into(), &ids(&[32]));
        assert_eq!(day_order(&session.tree().unwrap()), ids(&[32, 33, 31]));
        session.refresh().await.unwrap();
        assert_eq!(day_order(&session.tree().unwrap()), ids(&[31, 32, 33]));
    }
}
