use std::collections::BTreeMap;

use chrono::TimeDelta;
use futures_util::future::{join, join_all};
use log::{debug, error, warn};

use crate::{
    AssetID, AssetRepository, AssetService, Assignment, AssignmentID, AssignmentRepository,
    AssignmentService, BatchOutcome, CloneRepository, CloneService, CreateError, Day, DayID,
    DayOfWeek, DayTree, DeleteError, Exercise, ExerciseChange, ExerciseDraft, ExerciseFilter,
    ExerciseID, ExerciseRepository, ExerciseService, Name, OrderingRepository, OrderingService,
    Page, PageRequest, Prescription, Program, ProgramID, ProgramRepository, ProgramService,
    ProgramTree, ProgramType, ReadError, UpdateError, User, UserFilter, UserID, UserRepository,
    UserService, Week, WeekID, WeekOrder, WeekTree, WorkoutExercise, WorkoutExerciseID,
    check_unique,
};

pub struct Service<R> {
    repository: R,
    assignment_validity: Option<TimeDelta>,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            assignment_validity: None,
        }
    }

    /// Lets new assignments expire after the given time.
    #[must_use]
    pub fn with_assignment_validity(mut self, validity: Option<TimeDelta>) -> Self {
        self.assignment_validity = validity;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ProgramRepository> ProgramService for Service<R> {
    async fn get_programs(&self) -> Result<Vec<Program>, ReadError> {
        log_on_error!(
            self.repository.read_programs(),
            ReadError,
            "get",
            "programs"
        )
    }

    async fn get_program_tree(&self, id: ProgramID) -> Result<ProgramTree, ReadError> {
        log_on_error!(
            self.repository.read_program_tree(id),
            ReadError,
            "get",
            "program tree"
        )
    }

    async fn create_program(
        &self,
        title: Name,
        description: String,
        program_type: ProgramType,
    ) -> Result<Program, CreateError> {
        log_on_error!(
            self.repository
                .create_program(title, description, program_type),
            CreateError,
            "create",
            "program"
        )
    }

    async fn modify_program(
        &self,
        id: ProgramID,
        title: Option<Name>,
        description: Option<String>,
        program_type: Option<ProgramType>,
    ) -> Result<Program, UpdateError> {
        log_on_error!(
            self.repository
                .modify_program(id, title, description, program_type),
            UpdateError,
            "modify",
            "program"
        )
    }

    async fn delete_program(&self, id: ProgramID) -> Result<ProgramID, DeleteError> {
        log_on_error!(
            self.repository.delete_program(id),
            DeleteError,
            "delete",
            "program"
        )
    }
}

impl<R: OrderingRepository + ExerciseRepository> OrderingService for Service<R> {
    async fn create_next_week(&self, program_id: ProgramID) -> Result<Week, CreateError> {
        log_on_error!(
            self.repository.create_next_week(program_id),
            CreateError,
            "create",
            "week"
        )
    }

    async fn delete_week(&self, id: WeekID) -> Result<WeekID, DeleteError> {
        log_on_error!(
            self.repository.delete_week(id),
            DeleteError,
            "delete",
            "week"
        )
    }

    async fn create_day(
        &self,
        week_id: WeekID,
        day_of_week: DayOfWeek,
        title: String,
    ) -> Result<Day, CreateError> {
        log_on_error!(
            self.repository
                .create_day(week_id, day_of_week, title.trim().to_string()),
            CreateError,
            "create",
            "day"
        )
    }

    async fn update_day_title(&self, id: DayID, title: String) -> Result<Day, UpdateError> {
        log_on_error!(
            self.repository
                .modify_day(id, Some(title.trim().to_string()), None),
            UpdateError,
            "rename",
            "day"
        )
    }

    async fn move_day(&self, id: DayID, day_of_week: DayOfWeek) -> Result<Day, UpdateError> {
        log_on_error!(
            self.repository.modify_day(id, None, Some(day_of_week)),
            UpdateError,
            "move",
            "day"
        )
    }

    async fn delete_day(&self, id: DayID) -> Result<DayID, DeleteError> {
        log_on_error!(
            self.repository.delete_day(id),
            DeleteError,
            "delete",
            "day"
        )
    }

    async fn add_workout_exercise(
        &self,
        day_id: DayID,
        exercise_id: ExerciseID,
        prescription: Prescription,
    ) -> Result<WorkoutExercise, CreateError> {
        log_on_error!(
            self.repository.read_exercise(exercise_id),
            ReadError,
            "get",
            "exercise"
        )?;
        log_on_error!(
            self.repository
                .create_workout_exercise(day_id, exercise_id, prescription),
            CreateError,
            "create",
            "workout exercise"
        )
    }

    async fn modify_workout_exercise(
        &self,
        id: WorkoutExerciseID,
        prescription: Prescription,
    ) -> Result<WorkoutExercise, UpdateError> {
        log_on_error!(
            self.repository.modify_workout_exercise(id, prescription),
            UpdateError,
            "modify",
            "workout exercise"
        )
    }

    async fn set_superset(
        &self,
        id: WorkoutExerciseID,
        partner: Option<WorkoutExerciseID>,
    ) -> Result<WorkoutExercise, UpdateError> {
        log_on_error!(
            self.repository.set_superset(id, partner),
            UpdateError,
            "link",
            "superset"
        )
    }

    async fn reorder_exercises(
        &self,
        day_id: DayID,
        ids: Vec<WorkoutExerciseID>,
    ) -> Result<BTreeMap<WorkoutExerciseID, u32>, UpdateError> {
        if let Err(err) = check_unique(&ids) {
            warn!("rejected reordering of day {day_id}: {err}");
            return Err(err.into());
        }
        log_on_error!(
            self.repository.reorder_workout_exercises(day_id, ids),
            UpdateError,
            "reorder",
            "workout exercises"
        )
    }

    async fn delete_workout_exercise(
        &self,
        id: WorkoutExerciseID,
    ) -> Result<WorkoutExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout_exercise(id),
            DeleteError,
            "delete",
            "workout exercise"
        )
    }
}

impl<R: CloneRepository> CloneService for Service<R> {
    async fn clone_program(
        &self,
        source_id: ProgramID,
        title: Name,
    ) -> Result<ProgramTree, CreateError> {
        log_on_error!(
            self.repository.clone_program(source_id, title),
            CreateError,
            "clone",
            "program"
        )
    }

    async fn duplicate_week(
        &self,
        week_id: WeekID,
        destination: WeekOrder,
        program_id: ProgramID,
    ) -> Result<WeekTree, CreateError> {
        log_on_error!(
            self.repository
                .duplicate_week(week_id, destination, program_id),
            CreateError,
            "duplicate",
            "week"
        )
    }

    async fn clone_day(
        &self,
        source_week_id: WeekID,
        source_day_of_week: DayOfWeek,
        destination_week_id: WeekID,
        destination_day_of_week: DayOfWeek,
    ) -> Result<DayTree, CreateError> {
        log_on_error!(
            self.repository.clone_day(
                source_week_id,
                source_day_of_week,
                destination_week_id,
                destination_day_of_week
            ),
            CreateError,
            "clone",
            "day"
        )
    }

    async fn copy_exercise_to_day(
        &self,
        id: WorkoutExerciseID,
        destination_day_id: DayID,
    ) -> Result<WorkoutExercise, CreateError> {
        log_on_error!(
            self.repository
                .copy_workout_exercise(id, destination_day_id),
            CreateError,
            "copy",
            "workout exercise"
        )
    }
}

impl<R: AssignmentRepository> AssignmentService for Service<R> {
    async fn get_assignments(&self, program_id: ProgramID) -> Result<Vec<Assignment>, ReadError> {
        log_on_error!(
            self.repository.read_assignments(program_id),
            ReadError,
            "get",
            "assignments"
        )
    }

    async fn get_user_assignments(&self, user_id: UserID) -> Result<Vec<Assignment>, ReadError> {
        log_on_error!(
            self.repository.read_user_assignments(user_id),
            ReadError,
            "get",
            "user assignments"
        )
    }

    async fn assign_user_to_program(
        &self,
        user_id: UserID,
        program_id: ProgramID,
    ) -> Result<Assignment, CreateError> {
        log_on_error!(
            self.repository
                .create_assignment(user_id, program_id, self.assignment_validity),
            CreateError,
            "create",
            "assignment"
        )
    }

    async fn remove_user_assignment(&self, id: AssignmentID) -> Result<AssignmentID, DeleteError> {
        log_on_error!(
            self.repository.delete_assignment(id),
            DeleteError,
            "delete",
            "assignment"
        )
    }

    async fn batch_assign_and_remove_users(
        &self,
        program_id: ProgramID,
        user_ids: Vec<UserID>,
        assignment_ids: Vec<AssignmentID>,
    ) -> BatchOutcome {
        let assign = join_all(user_ids.into_iter().map(|user_id| async move {
            (
                user_id,
                self.assign_user_to_program(user_id, program_id).await,
            )
        }));
        let remove = join_all(
            assignment_ids
                .into_iter()
                .map(|id| async move { (id, self.remove_user_assignment(id).await) }),
        );
        let (assigned, removed) = join(assign, remove).await;
        let outcome = BatchOutcome { assigned, removed };
        if !outcome.is_success() {
            warn!(
                "{} of {} assignment changes failed",
                outcome.num_failures(),
                outcome.assigned.len() + outcome.removed.len()
            );
        }
        outcome
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(
        &self,
        filter: &ExerciseFilter,
        page: PageRequest,
    ) -> Result<Page<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(filter, page),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        log_on_error!(
            self.repository.read_exercise(id),
            ReadError,
            "get",
            "exercise"
        )
    }

    async fn create_exercise(&self, draft: ExerciseDraft) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository.create_exercise(draft),
            CreateError,
            "create",
            "exercise"
        )
    }

    async fn modify_exercise(
        &self,
        id: ExerciseID,
        change: ExerciseChange,
    ) -> Result<Exercise, UpdateError> {
        log_on_error!(
            self.repository.modify_exercise(id, change),
            UpdateError,
            "modify",
            "exercise"
        )
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(id),
            DeleteError,
            "delete",
            "exercise"
        )
    }
}

impl<R: UserRepository> UserService for Service<R> {
    async fn get_available_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, ReadError> {
        log_on_error!(
            self.repository.read_available_users(filter, page),
            ReadError,
            "get",
            "available users"
        )
    }

    async fn get_user(&self, id: UserID) -> Result<User, ReadError> {
        log_on_error!(self.repository.read_user(id), ReadError, "get", "user")
    }
}

impl<R: AssetRepository> AssetService for Service<R> {
    async fn upload_asset(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<AssetID, CreateError> {
        log_on_error!(
            self.repository.upload_asset(file_name, content),
            CreateError,
            "upload",
            "asset"
        )
    }
}
