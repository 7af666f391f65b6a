//! Deep copies of program trees.
//!
//! Copies always receive fresh ids from the supplied generator. Order numbers, weekdays
//! and execution parameters are preserved, superset links are remapped to the copied
//! exercises.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    CreateError, Day, DayID, DayOfWeek, DayTree, Name, Program, ProgramID, ProgramTree, Week,
    WeekID, WeekOrder, WeekTree, WorkoutExercise, WorkoutExerciseID, check_day_slot,
    next_exercise_order,
};

/// Copy operations on program trees.
///
/// Each method runs as a single transaction: either the complete copy is stored or
/// nothing is.
#[allow(async_fn_in_trait)]
pub trait CloneRepository {
    async fn clone_program(
        &self,
        source_id: ProgramID,
        title: Name,
    ) -> Result<ProgramTree, CreateError>;
    async fn duplicate_week(
        &self,
        week_id: WeekID,
        destination: WeekOrder,
        program_id: ProgramID,
    ) -> Result<WeekTree, CreateError>;
    async fn clone_day(
        &self,
        source_week_id: WeekID,
        source_day_of_week: DayOfWeek,
        destination_week_id: WeekID,
        destination_day_of_week: DayOfWeek,
    ) -> Result<DayTree, CreateError>;
    async fn copy_workout_exercise(
        &self,
        id: WorkoutExerciseID,
        destination_day_id: DayID,
    ) -> Result<WorkoutExercise, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait CloneService {
    async fn clone_program(
        &self,
        source_id: ProgramID,
        title: Name,
    ) -> Result<ProgramTree, CreateError>;
    async fn duplicate_week(
        &self,
        week_id: WeekID,
        destination: WeekOrder,
        program_id: ProgramID,
    ) -> Result<WeekTree, CreateError>;
    async fn clone_day(
        &self,
        source_week_id: WeekID,
        source_day_of_week: DayOfWeek,
        destination_week_id: WeekID,
        destination_day_of_week: DayOfWeek,
    ) -> Result<DayTree, CreateError>;
    async fn copy_exercise_to_day(
        &self,
        id: WorkoutExerciseID,
        destination_day_id: DayID,
    ) -> Result<WorkoutExercise, CreateError>;
}

/// Copies the exercises of a day into the day `day_id`.
pub fn copy_workout_exercises(
    source: &[WorkoutExercise],
    day_id: DayID,
    new_id: &mut impl FnMut() -> Uuid,
) -> Vec<WorkoutExercise> {
    let ids = source
        .iter()
        .map(|e| (e.id, WorkoutExerciseID::from(new_id())))
        .collect::<BTreeMap<_, _>>();

    source
        .iter()
        .map(|e| WorkoutExercise {
            id: ids[&e.id],
            day_id,
            exercise_id: e.exercise_id,
            order: e.order,
            prescription: e.prescription.clone(),
            superset: e.superset.and_then(|s| ids.get(&s).copied()),
        })
        .collect()
}

pub fn copy_day(
    source: &DayTree,
    week_id: WeekID,
    day_of_week: DayOfWeek,
    new_id: &mut impl FnMut() -> Uuid,
) -> DayTree {
    let day_id = DayID::from(new_id());
    DayTree {
        day: Day {
            id: day_id,
            week_id,
            day_of_week,
            title: source.day.title.clone(),
        },
        exercises: copy_workout_exercises(&source.exercises, day_id, new_id),
    }
}

pub fn copy_week(
    source: &WeekTree,
    program_id: ProgramID,
    order: WeekOrder,
    new_id: &mut impl FnMut() -> Uuid,
) -> WeekTree {
    let week_id = WeekID::from(new_id());
    WeekTree {
        week: Week {
            id: week_id,
            program_id,
            order,
        },
        days: source
            .days
            .iter()
            .map(|d| copy_day(d, week_id, d.day.day_of_week, new_id))
            .collect(),
    }
}

pub fn copy_program(
    source: &ProgramTree,
    title: Name,
    now: DateTime<Utc>,
    new_id: &mut impl FnMut() -> Uuid,
) -> ProgramTree {
    let program_id = ProgramID::from(new_id());
    ProgramTree {
        program: Program {
            id: program_id,
            title,
            description: source.program.description.clone(),
            program_type: source.program.program_type,
            created_at: now,
            updated_at: now,
        },
        weeks: source
            .weeks
            .iter()
            .map(|w| copy_week(w, program_id, w.week.order, new_id))
            .collect(),
    }
}

/// Copies a week into `destination` at the given order.
///
/// Fails if the order is occupied. A free order below the current maximum is filled.
pub fn duplicate_week(
    source: &WeekTree,
    destination: &ProgramTree,
    order: WeekOrder,
    new_id: &mut impl FnMut() -> Uuid,
) -> Result<WeekTree, CreateError> {
    if destination.week_at(order).is_some() {
        return Err(CreateError::WeekSlotTaken(order));
    }
    Ok(copy_week(source, destination.program.id, order, new_id))
}

/// Copies the day at `source_day_of_week` into a free slot of `destination`.
pub fn clone_day(
    source: &WeekTree,
    source_day_of_week: DayOfWeek,
    destination: &WeekTree,
    destination_day_of_week: DayOfWeek,
    new_id: &mut impl FnMut() -> Uuid,
) -> Result<DayTree, CreateError> {
    let Some(day) = source.day_at(source_day_of_week) else {
        return Err(CreateError::NotFound);
    };
    let days = destination
        .days
        .iter()
        .map(|d| d.day.clone())
        .collect::<Vec<_>>();
    check_day_slot(&days, destination_day_of_week, None).map_err(CreateError::DaySlotTaken)?;
    Ok(copy_day(
        day,
        destination.week.id,
        destination_day_of_week,
        new_id,
    ))
}

/// Copies a single exercise to the end of `destination`. Superset links are not copied.
pub fn copy_workout_exercise(
    source: &WorkoutExercise,
    destination: &DayTree,
    new_id: &mut impl FnMut() -> Uuid,
) -> WorkoutExercise {
    WorkoutExercise {
        id: new_id().into(),
        day_id: destination.day.id,
        exercise_id: source.exercise_id,
        order: next_exercise_order(&destination.exercises),
        prescription: source.prescription.clone(),
        superset: None,
    }
}
