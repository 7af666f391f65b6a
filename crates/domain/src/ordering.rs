use std::collections::{BTreeMap, BTreeSet};

use crate::{
    CreateError, Day, DayID, DayOfWeek, DeleteError, ExerciseID, Prescription, ProgramID,
    UpdateError, Week, WeekID, WeekOrder, WorkoutExercise, WorkoutExerciseID,
};

/// Structural mutations of a program tree.
///
/// Implementations are the authority for slot uniqueness and numbering. Every method is
/// atomic: it either applies completely or leaves the tree untouched.
#[allow(async_fn_in_trait)]
pub trait OrderingRepository {
    async fn create_next_week(&self, program_id: ProgramID) -> Result<Week, CreateError>;
    async fn delete_week(&self, id: WeekID) -> Result<WeekID, DeleteError>;
    async fn create_day(
        &self,
        week_id: WeekID,
        day_of_week: DayOfWeek,
        title: String,
    ) -> Result<Day, CreateError>;
    async fn modify_day(
        &self,
        id: DayID,
        title: Option<String>,
        day_of_week: Option<DayOfWeek>,
    ) -> Result<Day, UpdateError>;
    async fn delete_day(&self, id: DayID) -> Result<DayID, DeleteError>;
    async fn create_workout_exercise(
        &self,
        day_id: DayID,
        exercise_id: ExerciseID,
        prescription: Prescription,
    ) -> Result<WorkoutExercise, CreateError>;
    async fn modify_workout_exercise(
        &self,
        id: WorkoutExerciseID,
        prescription: Prescription,
    ) -> Result<WorkoutExercise, UpdateError>;
    async fn set_superset(
        &self,
        id: WorkoutExerciseID,
        partner: Option<WorkoutExerciseID>,
    ) -> Result<WorkoutExercise, UpdateError>;
    async fn reorder_workout_exercises(
        &self,
        day_id: DayID,
        ids: Vec<WorkoutExerciseID>,
    ) -> Result<BTreeMap<WorkoutExerciseID, u32>, UpdateError>;
    async fn delete_workout_exercise(
        &self,
        id: WorkoutExerciseID,
    ) -> Result<WorkoutExerciseID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait OrderingService {
    async fn create_next_week(&self, program_id: ProgramID) -> Result<Week, CreateError>;
    async fn delete_week(&self, id: WeekID) -> Result<WeekID, DeleteError>;
    async fn create_day(
        &self,
        week_id: WeekID,
        day_of_week: DayOfWeek,
        title: String,
    ) -> Result<Day, CreateError>;
    async fn update_day_title(&self, id: DayID, title: String) -> Result<Day, UpdateError>;
    async fn move_day(&self, id: DayID, day_of_week: DayOfWeek) -> Result<Day, UpdateError>;
    async fn delete_day(&self, id: DayID) -> Result<DayID, DeleteError>;
    async fn add_workout_exercise(
        &self,
        day_id: DayID,
        exercise_id: ExerciseID,
        prescription: Prescription,
    ) -> Result<WorkoutExercise, CreateError>;
    async fn modify_workout_exercise(
        &self,
        id: WorkoutExerciseID,
        prescription: Prescription,
    ) -> Result<WorkoutExercise, UpdateError>;
    async fn set_superset(
        &self,
        id: WorkoutExerciseID,
        partner: Option<WorkoutExerciseID>,
    ) -> Result<WorkoutExercise, UpdateError>;
    async fn reorder_exercises(
        &self,
        day_id: DayID,
        ids: Vec<WorkoutExerciseID>,
    ) -> Result<BTreeMap<WorkoutExerciseID, u32>, UpdateError>;
    async fn delete_workout_exercise(
        &self,
        id: WorkoutExerciseID,
    ) -> Result<WorkoutExerciseID, DeleteError>;
}

/// Order for a new week: one past the highest existing order. Gaps are never filled.
///
/// Returns `None` if the highest existing order has no successor.
#[must_use]
pub fn next_week_order(weeks: &[Week]) -> Option<WeekOrder> {
    match weeks.iter().map(|w| w.order).max() {
        Some(order) => order.next(),
        None => Some(WeekOrder::FIRST),
    }
}

/// Order for an exercise appended to a day.
#[must_use]
pub fn next_exercise_order(exercises: &[WorkoutExercise]) -> u32 {
    exercises.iter().map(|e| e.order).max().unwrap_or(0) + 1
}

/// Fails with the requested weekday if another day of the week already occupies it.
pub fn check_day_slot(
    days: &[Day],
    day_of_week: DayOfWeek,
    moving: Option<DayID>,
) -> Result<(), DayOfWeek> {
    if days
        .iter()
        .any(|d| d.day_of_week == day_of_week && Some(d.id) != moving)
    {
        return Err(day_of_week);
    }
    Ok(())
}

/// Computes the new order of all exercises of a day.
///
/// `ids` must contain every exercise of the day exactly once. The result maps each id to
/// its position in `ids`, starting at 1.
pub fn reorder(
    exercises: &[WorkoutExercise],
    ids: &[WorkoutExerciseID],
) -> Result<BTreeMap<WorkoutExerciseID, u32>, ReorderError> {
    let existing = exercises.iter().map(|e| e.id).collect::<BTreeSet<_>>();
    let mut seen = BTreeSet::new();

    for id in ids {
        if !existing.contains(id) {
            return Err(ReorderError::Unknown(*id));
        }
        if !seen.insert(*id) {
            return Err(ReorderError::Duplicate(*id));
        }
    }

    if let Some(missing) = existing.difference(&seen).next() {
        return Err(ReorderError::Missing(*missing));
    }

    Ok(ids.iter().copied().zip(1..).collect())
}

/// Rejects lists that cannot be valid for any day.
pub fn check_unique(ids: &[WorkoutExerciseID]) -> Result<(), ReorderError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(*id) {
            return Err(ReorderError::Duplicate(*id));
        }
    }
    Ok(())
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ReorderError {
    #[error("exercise {0} is missing")]
    Missing(WorkoutExerciseID),
    #[error("exercise {0} does not belong to the day")]
    Unknown(WorkoutExerciseID),
    #[error("exercise {0} is listed more than once")]
    Duplicate(WorkoutExerciseID),
}

impl From<ReorderError> for UpdateError {
    fn from(value: ReorderError) -> Self {
        UpdateError::InvalidInput(value.to_string())
    }
}
